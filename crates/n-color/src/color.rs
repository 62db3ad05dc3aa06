// SPDX-License-Identifier: MIT
//
// n-color color system — three interconvertible representations behind one
// value type.
//
// Single-character variable names (r, g, b, h, s, l, v, a) are the standard
// mathematical convention in color science. Renaming them would make the
// code harder to compare against the reference HLS/HSV formulas.
//
// Stylesheet colors arrive as hex strings, get adjusted in HSL space
// (lighten/darken) or RGB space (transparency), and leave again as either
// stylesheet text or ARGB hex for palettes:
//
//   hex ──► Rgba ◄──► Hsla        (lighten / darken)
//            ▲  └──► Hsva
//            └─ alpha scaling     (transparent)
//
// Every constructor clamps its components, so a `Color` never holds NaN or
// an out-of-range channel.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// Clamp `v` into `[lo, hi]`, mapping NaN to `lo`.
#[inline]
fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

// ─── Rgba ────────────────────────────────────────────────────────────────────

/// Red, green and blue in `[0, 255]` plus alpha in `[0, 1]`.
///
/// Channels are kept as floats so that conversions from HSL/HSV do not lose
/// precision until the color is formatted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Rgba {
    /// Create an RGBA value, clamping every component into range.
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp(r, 0.0, 255.0),
            g: clamp(g, 0.0, 255.0),
            b: clamp(b, 0.0, 255.0),
            a: clamp(a, 0.0, 1.0),
        }
    }

    /// Opaque color from bytes. Usable in constants.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn r(self) -> f64 {
        self.r
    }

    #[inline]
    #[must_use]
    pub const fn g(self) -> f64 {
        self.g
    }

    #[inline]
    #[must_use]
    pub const fn b(self) -> f64 {
        self.b
    }

    #[inline]
    #[must_use]
    pub const fn a(self) -> f64 {
        self.a
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({:.3}, {:.3}, {:.3}, {:.3})",
            self.r, self.g, self.b, self.a
        )
    }
}

// ─── Hsla ────────────────────────────────────────────────────────────────────

/// Hue in degrees `[0, 360]`, saturation, lightness and alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    a: f64,
}

impl Hsla {
    /// Create an HSLA value, clamping every component into range.
    #[must_use]
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self {
            h: clamp(h, 0.0, 360.0),
            s: clamp(s, 0.0, 1.0),
            l: clamp(l, 0.0, 1.0),
            a: clamp(a, 0.0, 1.0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn h(self) -> f64 {
        self.h
    }

    #[inline]
    #[must_use]
    pub const fn s(self) -> f64 {
        self.s
    }

    #[inline]
    #[must_use]
    pub const fn l(self) -> f64 {
        self.l
    }

    #[inline]
    #[must_use]
    pub const fn a(self) -> f64 {
        self.a
    }
}

impl From<Rgba> for Hsla {
    fn from(rgba: Rgba) -> Self {
        let (h, l, s) = rgb_to_hls(rgba.r / 255.0, rgba.g / 255.0, rgba.b / 255.0);
        Self::new(h * 360.0, s, l, rgba.a)
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        let (r, g, b) = hls_to_rgb(hsla.h / 360.0, hsla.l, hsla.s);
        Self::new(r * 255.0, g * 255.0, b * 255.0, hsla.a)
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({:.3}, {:.3}%, {:.3}%, {:.3})",
            self.h,
            self.s * 100.0,
            self.l * 100.0,
            self.a
        )
    }
}

// ─── Hsva ────────────────────────────────────────────────────────────────────

/// Hue in degrees `[0, 360]`, saturation, value and alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsva {
    h: f64,
    s: f64,
    v: f64,
    a: f64,
}

impl Hsva {
    /// Create an HSVA value, clamping every component into range.
    #[must_use]
    pub fn new(h: f64, s: f64, v: f64, a: f64) -> Self {
        Self {
            h: clamp(h, 0.0, 360.0),
            s: clamp(s, 0.0, 1.0),
            v: clamp(v, 0.0, 1.0),
            a: clamp(a, 0.0, 1.0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn h(self) -> f64 {
        self.h
    }

    #[inline]
    #[must_use]
    pub const fn s(self) -> f64 {
        self.s
    }

    #[inline]
    #[must_use]
    pub const fn v(self) -> f64 {
        self.v
    }

    #[inline]
    #[must_use]
    pub const fn a(self) -> f64 {
        self.a
    }
}

impl From<Rgba> for Hsva {
    fn from(rgba: Rgba) -> Self {
        let (h, s, v) = rgb_to_hsv(rgba.r / 255.0, rgba.g / 255.0, rgba.b / 255.0);
        Self::new(h * 360.0, s, v, rgba.a)
    }
}

impl From<Hsva> for Rgba {
    fn from(hsva: Hsva) -> Self {
        let (r, g, b) = hsv_to_rgb(hsva.h / 360.0, hsva.s, hsva.v);
        Self::new(r * 255.0, g * 255.0, b * 255.0, hsva.a)
    }
}

impl fmt::Display for Hsva {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsva({:.3}, {:.3}%, {:.3}%, {:.3})",
            self.h,
            self.s * 100.0,
            self.v * 100.0,
            self.a
        )
    }
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// The representation a [`Color`] was constructed from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Native {
    Rgba,
    Hsla(Hsla),
    Hsva(Hsva),
}

/// A stylesheet color.
///
/// Holds the RGBA form plus the representation it was built from. Asking for
/// the native representation returns it untouched; the other forms are
/// derived from RGBA on demand. All transforms return a new `Color`.
///
/// # Examples
///
/// ```
/// use n_color::Color;
///
/// let primary = Color::from_hex("#8ab4f7").unwrap();
/// let hover = primary.darken(0.1);
/// let disabled = primary.transparent(0.4);
///
/// assert_eq!(primary.to_hex(), "8ab4f7ff");
/// assert!(hover.is_darker_than(primary));
/// assert_eq!(disabled.to_string(), "rgba(138, 180, 247, 0.400)");
/// ```
#[derive(Clone, Copy)]
pub struct Color {
    rgba: Rgba,
    native: Native,
}

impl Color {
    // ─── Constants ───────────────────────────────────────────────────────

    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    pub const CYAN: Self = Self::opaque(0, 255, 255);
    pub const LIGHT_GREY: Self = Self::opaque(211, 211, 211);

    // ─── Constructors ────────────────────────────────────────────────────

    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgba: Rgba::opaque(r, g, b),
            native: Native::Rgba,
        }
    }

    /// Create a color from 8-bit channels and a `[0, 1]` alpha.
    #[must_use]
    pub fn rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba::new(f64::from(r), f64::from(g), f64::from(b), a).into()
    }

    /// Parse a hex color.
    ///
    /// Supports `RGB`, `RGBA`, `RRGGBB` and `RRGGBBAA`, with or without a
    /// leading `#`. Short forms duplicate each nibble (`c` → `cc`). Alpha
    /// defaults to fully opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] on a wrong length or a non-hex
    /// character.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        parse_hex(s).ok_or_else(|| ColorError::InvalidHex(s.to_owned()))
    }

    // ─── Representations ─────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn rgba(self) -> Rgba {
        self.rgba
    }

    /// The HSLA form. Exact when the color was built from HSLA.
    #[must_use]
    pub fn hsla(self) -> Hsla {
        match self.native {
            Native::Hsla(hsla) => hsla,
            _ => Hsla::from(self.rgba),
        }
    }

    /// The HSVA form. Exact when the color was built from HSVA.
    #[must_use]
    pub fn hsva(self) -> Hsva {
        match self.native {
            Native::Hsva(hsva) => hsva,
            _ => Hsva::from(self.rgba),
        }
    }

    /// Whether alpha is fully opaque.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.rgba.a >= 1.0
    }

    /// Byte-quantized channels (alpha scaled to `0..=255`).
    #[must_use]
    pub fn to_rgba8(self) -> (u8, u8, u8, u8) {
        (
            to_u8(self.rgba.r),
            to_u8(self.rgba.g),
            to_u8(self.rgba.b),
            to_u8(self.rgba.a * 255.0),
        )
    }

    /// Canonical lowercase `rrggbbaa`, every channel zero-padded.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        format!("{r:02x}{g:02x}{b:02x}{a:02x}")
    }

    /// Lowercase `aarrggbb`, the channel order palettes expect.
    #[must_use]
    pub fn to_hex_argb(self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        format!("{a:02x}{r:02x}{g:02x}{b:02x}")
    }

    // ─── Transforms ──────────────────────────────────────────────────────

    /// Raise lightness by `l * factor` (clamped to 1).
    #[must_use]
    pub fn lighten(self, factor: f64) -> Self {
        let hsla = self.hsla();
        Hsla::new(hsla.h, hsla.s, hsla.l.mul_add(factor, hsla.l), hsla.a).into()
    }

    /// Lower lightness by `l * factor` (clamped to 0).
    #[must_use]
    pub fn darken(self, factor: f64) -> Self {
        let hsla = self.hsla();
        Hsla::new(hsla.h, hsla.s, hsla.l.mul_add(-factor, hsla.l), hsla.a).into()
    }

    /// Scale alpha by `factor`.
    #[must_use]
    pub fn transparent(self, factor: f64) -> Self {
        let Rgba { r, g, b, a } = self.rgba;
        Rgba::new(r, g, b, a * factor).into()
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        Self {
            rgba,
            native: Native::Rgba,
        }
    }
}

impl From<Hsla> for Color {
    fn from(hsla: Hsla) -> Self {
        Self {
            rgba: hsla.into(),
            native: Native::Hsla(hsla),
        }
    }
}

impl From<Hsva> for Color {
    fn from(hsva: Hsva) -> Self {
        Self {
            rgba: hsva.into(),
            native: Native::Hsva(hsva),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{})", self.to_hex())
    }
}

/// Stylesheet text: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, _) = self.to_rgba8();
        if self.is_opaque() {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {:.3})", self.rgba.a)
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        // Conversions through HSL leave float noise well below a byte.
        const EPS: f64 = 1e-6;
        let (a, b) = (self.rgba, other.rgba);
        (a.r - b.r).abs() < EPS
            && (a.g - b.g).abs() < EPS
            && (a.b - b.b).abs() < EPS
            && (a.a - b.a).abs() < EPS
    }
}

impl Default for Color {
    /// Default is fully opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Conversion Functions ────────────────────────────────────────────────────
//
// Unit-range HLS/HSV conversions. Hue is a fraction of a turn in [0, 1).

/// RGB → (hue, lightness, saturation).
fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (min + max) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    (hue_fraction(r, g, b, max, delta), l, s)
}

/// (hue, lightness, saturation) → RGB.
fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0f64.mul_add(l, -m2);
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

/// RGB → (hue, saturation, value).
fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, max);
    }
    let delta = max - min;
    (hue_fraction(r, g, b, max, delta), delta / max, max)
}

/// (hue, saturation, value) → RGB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h.mul_add(6.0, -sector);
    let p = v * (1.0 - s);
    let q = v * s.mul_add(-f, 1.0);
    let t = v * s.mul_add(-(1.0 - f), 1.0);
    // `sector` is in [0, 6]; a full turn wraps back to red.
    match (sector as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Shared hue computation for HLS and HSV.
fn hue_fraction(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if (r - max).abs() < f64::EPSILON {
        bc - gc
    } else if (g - max).abs() < f64::EPSILON {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (h / 6.0).rem_euclid(1.0)
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        ((m2 - m1) * hue).mul_add(6.0, m1)
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        ((m2 - m1) * (2.0 / 3.0 - hue)).mul_add(6.0, m1)
    } else {
        m1
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    match bytes.len() {
        // RGB
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Color::rgba8(r << 4 | r, g << 4 | g, b << 4 | b, 1.0))
        }
        // RGBA
        4 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            let a = parse_hex_digit(bytes[3])?;
            Some(Color::rgba8(
                r << 4 | r,
                g << 4 | g,
                b << 4 | b,
                f64::from(a << 4 | a) / 255.0,
            ))
        }
        // RRGGBB
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Color::rgba8(r, g, b, 1.0))
        }
        // RRGGBBAA
        8 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            let a = parse_hex_byte(&bytes[6..8])?;
            Some(Color::rgba8(r, g, b, f64::from(a) / 255.0))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Round a `[0, 255]` float to the nearest byte.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
