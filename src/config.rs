// SPDX-License-Identifier: MIT
//
// User configuration file.
//
// A JSON object; every key is optional and command-line flags win over it:
//
//   {
//     "theme": "auto",
//     "default_theme": "light",
//     "corner_shape": "sharp",
//     "accent": "purple",
//     "custom_colors": { "[dark]": { "primary": "#d0bcff" } },
//     "standard_icons": true
//   }

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use n_theme::{CornerShape, CustomColors, Theme, ThemeChoice};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub theme: Option<String>,
    pub default_theme: Option<String>,
    pub corner_shape: Option<String>,
    pub accent: Option<String>,
    pub custom_colors: Option<CustomColors>,
    pub standard_icons: Option<bool>,
}

impl UserConfig {
    /// `<config dir>/n-style/config.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("n-style").join("config.json"))
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn theme(&self) -> Result<Option<ThemeChoice>> {
        Ok(self.theme.as_deref().map(str::parse::<ThemeChoice>).transpose()?)
    }

    pub fn default_theme(&self) -> Result<Option<Theme>> {
        Ok(self.default_theme.as_deref().map(str::parse::<Theme>).transpose()?)
    }

    pub fn corner_shape(&self) -> Result<Option<CornerShape>> {
        Ok(self.corner_shape.as_deref().map(str::parse::<CornerShape>).transpose()?)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
