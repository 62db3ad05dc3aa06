//! Toolkit palettes — the bridge from color tables to `QPalette`-style roles.
//!
//! Some colors (links, placeholder text) cannot be set from a stylesheet,
//! so the host also needs a palette. Each `(group, role)` slot is filled by
//! rendering a placeholder through the `palette` filter, which yields
//! `#aarrggbb`.

use std::collections::BTreeMap;
use std::fmt;

use n_color::{contrast_ratio, Color};

use crate::error::{Error, Result};
use crate::options::{RenderOptions, Theme};
use crate::table::ColorTable;
use crate::template::Renderer;

// ---------------------------------------------------------------------------
// Groups and roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorGroup {
    Active,
    Inactive,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    // ── Surfaces ──────────────────────────────────────────────
    Window,
    Base,
    AlternateBase,
    Button,
    ToolTipBase,
    // ── Text ──────────────────────────────────────────────────
    WindowText,
    Text,
    ButtonText,
    BrightText,
    ToolTipText,
    PlaceholderText,
    // ── Bevels ────────────────────────────────────────────────
    Light,
    Midlight,
    Mid,
    Dark,
    Shadow,
    // ── Selection and links ───────────────────────────────────
    Highlight,
    HighlightedText,
    Link,
    LinkVisited,
}

impl ColorRole {
    /// Roles a stylesheet has no property for.
    #[must_use]
    pub const fn needs_palette(self) -> bool {
        matches!(self, Self::Link | Self::LinkVisited | Self::PlaceholderText)
    }
}

impl fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

use ColorGroup::{Active, Disabled, Inactive};
use ColorRole as R;

/// Every slot and the placeholder that fills it.
const ENTRIES: &[(ColorGroup, ColorRole, &str)] = &[
    (Active, R::Window, "{{ background|color|palette }}"),
    (Active, R::Base, r#"{{ background|color(state="list")|palette }}"#),
    (Active, R::AlternateBase, r#"{{ background|color(state="popup")|palette }}"#),
    (Active, R::Button, "{{ background|color|palette }}"),
    (Active, R::ToolTipBase, "{{ tooltip|color|palette }}"),
    (Active, R::WindowText, "{{ foreground|color|palette }}"),
    (Active, R::Text, "{{ foreground|color|palette }}"),
    (Active, R::ButtonText, "{{ foreground|color|palette }}"),
    (Active, R::BrightText, "{{ danger|color|palette }}"),
    (Active, R::ToolTipText, r#"{{ tooltip|color(state="foreground")|palette }}"#),
    (Active, R::PlaceholderText, r#"{{ foreground|color(state="input.placeholder")|palette }}"#),
    (Active, R::Light, r#"{{ background|color(state="popup")|palette }}"#),
    (Active, R::Midlight, r#"{{ background|color(state="panel")|palette }}"#),
    (Active, R::Mid, "{{ border|color|palette }}"),
    (Active, R::Dark, r#"{{ background|color(state="title")|palette }}"#),
    (Active, R::Shadow, r#"{{ background|color(state="textarea")|palette }}"#),
    (Active, R::Highlight, "{{ primary|color|palette }}"),
    (Active, R::HighlightedText, r#"{{ primary|color(state="foreground")|palette }}"#),
    (Active, R::Link, "{{ primary|color|palette }}"),
    (Active, R::LinkVisited, "{{ linkVisited|color|palette }}"),
    (Inactive, R::Highlight, r#"{{ primary|color(state="selection.background")|palette }}"#),
    (Inactive, R::HighlightedText, "{{ foreground|color|palette }}"),
    (Disabled, R::WindowText, r#"{{ foreground|color(state="disabled")|palette }}"#),
    (Disabled, R::Text, r#"{{ foreground|color(state="disabled")|palette }}"#),
    (Disabled, R::ButtonText, r#"{{ foreground|color(state="disabled")|palette }}"#),
    (Disabled, R::PlaceholderText, r#"{{ foreground|color(state="disabled")|palette }}"#),
    (Disabled, R::Highlight, r#"{{ primary|color(state="disabled")|palette }}"#),
    (Disabled, R::HighlightedText, r#"{{ foreground|color(state="disabled")|palette }}"#),
    (Disabled, R::Link, r#"{{ primary|color(state="disabled")|palette }}"#),
];

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Resolved `(group, role) → color` slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: BTreeMap<(ColorGroup, ColorRole), Color>,
}

impl Palette {
    #[must_use]
    pub fn get(&self, group: ColorGroup, role: ColorRole) -> Option<Color> {
        self.colors.get(&(group, role)).copied()
    }

    /// `#aarrggbb`, the form toolkits accept.
    #[must_use]
    pub fn argb(&self, group: ColorGroup, role: ColorRole) -> Option<String> {
        self.get(group, role).map(|c| format!("#{}", c.to_hex_argb()))
    }

    /// WCAG contrast between two roles of one group.
    #[must_use]
    pub fn contrast(&self, group: ColorGroup, fg: ColorRole, bg: ColorRole) -> Option<f64> {
        Some(contrast_ratio(self.get(group, fg)?, self.get(group, bg)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorGroup, ColorRole, Color)> + '_ {
        self.colors.iter().map(|(&(group, role), &color)| (group, role, color))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// One `Group:Role #aarrggbb` line per slot.
impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (group, role, color) in self.iter() {
            writeln!(f, "{group}:{role} #{}", color.to_hex_argb())?;
        }
        Ok(())
    }
}

/// Render every palette slot from `table`.
///
/// With `for_stylesheet`, only [`ColorRole::needs_palette`] roles are filled.
///
/// # Errors
///
/// Whatever rendering the slot placeholders returns, e.g.
/// [`Error::InvalidColorId`] when `table` lacks an id the slots use.
pub fn build_palette(renderer: &mut Renderer, table: &ColorTable, theme: Theme, for_stylesheet: bool) -> Result<Palette> {
    let options = RenderOptions {
        theme,
        ..RenderOptions::default()
    };
    let mut colors = BTreeMap::new();
    for &(group, role, placeholder) in ENTRIES {
        if for_stylesheet && !role.needs_palette() {
            continue;
        }
        let argb = renderer.render(placeholder, table, &options)?;
        colors.insert((group, role), parse_argb(&argb)?);
    }
    Ok(Palette { colors })
}

/// `#aarrggbb` back to a color.
fn parse_argb(text: &str) -> Result<Color> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 8 || !hex.is_ascii() {
        return Err(Error::syntax("palette", format!("expected #aarrggbb, got \"{text}\"")));
    }
    let (alpha, rgb) = hex.split_at(2);
    Ok(Color::from_hex(&format!("{rgb}{alpha}"))?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_colors;
    use crate::env::Environment;

    fn palette(theme: Theme, for_stylesheet: bool) -> Palette {
        let tmp = tempfile::tempdir().unwrap();
        let mut renderer = Renderer::new(Environment::default(), tmp.path());
        let table = builtin_colors(theme).unwrap();
        build_palette(&mut renderer, &table, theme, for_stylesheet).unwrap()
    }

    #[test]
    fn full_palette_fills_every_slot() {
        let p = palette(Theme::Dark, false);
        assert_eq!(p.len(), ENTRIES.len());
        assert_eq!(p.argb(Active, R::Window).unwrap(), "#ff202124");
    }

    #[test]
    fn stylesheet_palette_only_has_palette_roles() {
        let p = palette(Theme::Light, true);
        assert!(!p.is_empty());
        assert!(p.iter().all(|(_, role, _)| role.needs_palette()));
        assert!(p.get(Active, R::Link).is_some());
        assert!(p.get(Active, R::Window).is_none());
    }

    #[test]
    fn argb_round_trips() {
        let color = parse_argb("#808ab4f7").unwrap();
        assert_eq!(color.to_hex(), "8ab4f780");
        assert!(parse_argb("#8ab4f7").is_err());
    }

    #[test]
    fn display_lists_slots() {
        let p = palette(Theme::Dark, true);
        let text = p.to_string();
        assert_eq!(text.lines().count(), p.len());
        assert!(text.contains("Active:Link #ff"));
    }

    // ── Readability ─────────────────────────────────────────────────

    #[test]
    fn dark_text_readable() {
        let p = palette(Theme::Dark, false);
        let ratio = p.contrast(Active, R::WindowText, R::Window).unwrap();
        assert!(ratio >= 7.0, "Dark text contrast: {ratio:.2}");
    }

    #[test]
    fn light_text_readable() {
        let p = palette(Theme::Light, false);
        let ratio = p.contrast(Active, R::WindowText, R::Window).unwrap();
        assert!(ratio >= 7.0, "Light text contrast: {ratio:.2}");
    }

    #[test]
    fn highlighted_text_distinguishable() {
        for theme in Theme::ALL {
            let p = palette(theme, false);
            let ratio = p.contrast(Active, R::HighlightedText, R::Highlight).unwrap();
            assert!(ratio >= 3.0, "{theme} highlight contrast: {ratio:.2}");
        }
    }

    #[test]
    fn dark_window_is_darker_than_text() {
        let p = palette(Theme::Dark, false);
        let window = p.get(Active, R::Window).unwrap();
        let text = p.get(Active, R::WindowText).unwrap();
        assert!(window.is_darker_than(text));
    }
}
