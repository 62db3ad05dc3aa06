//! Theme and corner-shape selectors.
//!
//! These are parsed from user input (CLI flags, config files) via `FromStr`,
//! so invalid names surface as [`Error::UnsupportedTheme`] /
//! [`Error::InvalidCornerShape`] before any rendering starts.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ─── Theme ──────────────────────────────────────────────────────────────────

/// A concrete palette variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Self; 2] = [Self::Dark, Self::Light];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(Error::UnsupportedTheme(other.to_owned())),
        }
    }
}

// ─── ThemeChoice ────────────────────────────────────────────────────────────

/// What the user asked for: a fixed theme, or "follow the OS".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeChoice {
    Fixed(Theme),
    Auto,
}

impl Default for ThemeChoice {
    fn default() -> Self {
        Self::Fixed(Theme::Dark)
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(theme) => theme.fmt(f),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for ThemeChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Fixed)
        }
    }
}

impl From<Theme> for ThemeChoice {
    fn from(theme: Theme) -> Self {
        Self::Fixed(theme)
    }
}

// ─── CornerShape ────────────────────────────────────────────────────────────

/// Global switch between rounded and sharp widget corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CornerShape {
    #[default]
    Rounded,
    Sharp,
}

impl CornerShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rounded => "rounded",
            Self::Sharp => "sharp",
        }
    }
}

impl fmt::Display for CornerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CornerShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rounded" => Ok(Self::Rounded),
            "sharp" => Ok(Self::Sharp),
            other => Err(Error::InvalidCornerShape(other.to_owned())),
        }
    }
}

/// Per-render settings that the template scope and patches depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub corner_shape: CornerShape,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_and_displays() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Light.is_dark());
    }

    #[test]
    fn auto_is_a_choice_not_a_theme() {
        assert_eq!("auto".parse::<ThemeChoice>().unwrap(), ThemeChoice::Auto);
        assert!(matches!(
            "auto".parse::<Theme>(),
            Err(Error::UnsupportedTheme(name)) if name == "auto"
        ));
    }

    #[test]
    fn unknown_theme_is_unsupported() {
        assert!(matches!(
            "solarized".parse::<ThemeChoice>(),
            Err(Error::UnsupportedTheme(_))
        ));
    }

    #[test]
    fn theme_choice_display_round_trips() {
        for text in ["dark", "light", "auto"] {
            assert_eq!(text.parse::<ThemeChoice>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn corner_shape_rejects_unknown() {
        assert_eq!("sharp".parse::<CornerShape>().unwrap(), CornerShape::Sharp);
        assert!(matches!(
            "round".parse::<CornerShape>(),
            Err(Error::InvalidCornerShape(_))
        ));
    }
}
