//! WCAG relative luminance and the lighter/darker comparisons built on it.
//!
//! Luminance is computed from the RGBA form per WCAG 2.0:
//!
//!   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
//!
//! where each channel is linearized with the 0.03928 breakpoint. Adjustments
//! (`get_lighter_color` / `get_darker_color`) then happen in HSL lightness.

use crate::color::Color;

/// Factor used by [`get_lighter_color`] / [`get_darker_color`] when none is
/// given.
pub const DEFAULT_CONTRAST_FACTOR: f64 = 0.5;

/// Expand one gamma-encoded channel (`0..=255`) to linear light.
#[inline]
#[must_use]
pub fn srgb_to_linear(channel: f64) -> f64 {
    let c = channel / 255.0;
    if c <= 0.039_28 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in `[0, 1]`; 0 is black, 1 is white.
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    let rgba = color.rgba();
    let r = srgb_to_linear(rgba.r());
    let g = srgb_to_linear(rgba.g());
    let b = srgb_to_linear(rgba.b());
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}

/// WCAG contrast ratio in `[1, 21]`, independent of argument order.
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

impl Color {
    /// Relative luminance of this color.
    #[must_use]
    pub fn luminance(self) -> f64 {
        relative_luminance(self)
    }

    /// Strictly higher luminance than `other`.
    #[must_use]
    pub fn is_lighter_than(self, other: Self) -> bool {
        self.luminance() > other.luminance()
    }

    /// Strictly lower luminance than `other`.
    #[must_use]
    pub fn is_darker_than(self, other: Self) -> bool {
        self.luminance() < other.luminance()
    }
}

fn effective_factor(factor: Option<f64>) -> f64 {
    match factor {
        Some(f) if f != 0.0 => f,
        _ => DEFAULT_CONTRAST_FACTOR,
    }
}

/// Return `of` when it is already lighter than `relative`; otherwise lighten
/// it by `factor` scaled to the luminance gap between the two.
#[must_use]
pub fn get_lighter_color(of: Color, relative: Color, factor: Option<f64>) -> Color {
    if of.is_lighter_than(relative) {
        return of;
    }
    let lum_of = of.luminance();
    let lum_relative = relative.luminance();
    if lum_relative <= 0.0 {
        return of;
    }
    let factor = effective_factor(factor) * (lum_relative - lum_of) / lum_relative;
    of.lighten(factor)
}

/// Return `of` when it is already darker than `relative`; otherwise darken
/// it by `factor` scaled to the luminance gap between the two.
#[must_use]
pub fn get_darker_color(of: Color, relative: Color, factor: Option<f64>) -> Color {
    if of.is_darker_than(relative) {
        return of;
    }
    let lum_of = of.luminance();
    let lum_relative = relative.luminance();
    if lum_of <= 0.0 {
        return of;
    }
    let factor = effective_factor(factor) * (lum_of - lum_relative) / lum_of;
    of.darken(factor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
