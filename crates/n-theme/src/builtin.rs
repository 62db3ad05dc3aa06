//! Builtin color tables, templates and accent presets.
//!
//! The tables and templates are embedded at compile time, so the engine
//! works without any files on disk.

use crate::error::Result;
use crate::options::Theme;
use crate::table::ColorTable;

const DARK_COLORS: &str = include_str!("../themes/dark.json");
const LIGHT_COLORS: &str = include_str!("../themes/light.json");

/// The main widget stylesheet.
pub const STYLESHEET_TEMPLATE: &str = include_str!("../templates/stylesheet.qss");

/// Standard dialog and title bar icons, for hosts that do not install a
/// style of their own.
pub const STANDARD_ICONS_TEMPLATE: &str = include_str!("../templates/standard_icons.qss");

/// Parse the builtin color table for `theme`.
///
/// # Errors
///
/// Only if the embedded JSON is malformed.
pub fn builtin_colors(theme: Theme) -> Result<ColorTable> {
    ColorTable::from_json(match theme {
        Theme::Dark => DARK_COLORS,
        Theme::Light => LIGHT_COLORS,
    })
}

/// List all builtin theme names.
#[must_use]
pub const fn theme_names() -> &'static [&'static str] {
    &["dark", "light"]
}

const DARK_ACCENTS: &[(&str, &str)] = &[
    ("blue", "#8ab4f7"),
    ("graphite", "#898a8f"),
    ("green", "#4caf50"),
    ("orange", "#ff9800"),
    ("pink", "#c7457f"),
    ("purple", "#af52bf"),
    ("red", "#f6685e"),
    ("yellow", "#ffeb3b"),
];

const LIGHT_ACCENTS: &[(&str, &str)] = &[
    ("blue", "#1a73e8"),
    ("graphite", "#898a8f"),
    ("green", "#4caf50"),
    ("orange", "#ff9800"),
    ("pink", "#c7457f"),
    ("purple", "#9c27b0"),
    ("red", "#f44336"),
    ("yellow", "#f4c65f"),
];

/// Accent presets as `(name, hex)` for `theme`.
#[must_use]
pub const fn accents(theme: Theme) -> &'static [(&'static str, &'static str)] {
    match theme {
        Theme::Dark => DARK_ACCENTS,
        Theme::Light => LIGHT_ACCENTS,
    }
}

/// Look up an accent preset by name (case-insensitive).
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn accent_color(theme: Theme, name: &str) -> Option<&'static str> {
    accents(theme)
        .iter()
        .find(|(accent, _)| accent.eq_ignore_ascii_case(name))
        .map(|&(_, hex)| hex)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
