//! The host environment patches and the `env` filter are evaluated against.

use std::env::consts;

use crate::error::Result;
use crate::version::{Comparison, Version};

/// Binding API assumed when none is given.
pub const DEFAULT_TOOLKIT_API: &str = "Qt6";

/// `std::env::consts::OS` name → the other spelling templates use for it.
const OS_ALIASES: [(&str, &str); 1] = [("macos", "darwin")];

/// Lowercase, with alias spellings folded onto the `consts::OS` name.
fn canonical_os(name: &str) -> String {
    let name = name.trim().to_lowercase();
    OS_ALIASES
        .iter()
        .find(|(_, alias)| *alias == name)
        .map_or(name, |(os, _)| (*os).to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub toolkit_version: Version,
    /// Binding name, e.g. `PySide6`, `PyQt5`, `Qt6`.
    pub toolkit_api: String,
    /// Lowercase OS name as reported by `std::env::consts::OS`.
    pub os_name: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            toolkit_version: Version::latest(),
            toolkit_api: DEFAULT_TOOLKIT_API.to_owned(),
            os_name: consts::OS.to_owned(),
        }
    }
}

impl Environment {
    #[must_use]
    pub fn new(toolkit_version: Version, toolkit_api: impl Into<String>) -> Self {
        Self {
            toolkit_version,
            toolkit_api: toolkit_api.into(),
            ..Self::default()
        }
    }

    /// Override the OS name; `darwin` is stored as `macos`.
    #[must_use]
    pub fn with_os(mut self, os_name: impl AsRef<str>) -> Self {
        self.os_name = canonical_os(os_name.as_ref());
        self
    }

    /// Whether the `|`-separated `os` list names the current OS, under
    /// either of its spellings.
    fn os_listed(&self, os: &str) -> bool {
        let listed = os.to_lowercase();
        let current = canonical_os(&self.os_name);
        listed.contains(&current)
            || OS_ALIASES
                .iter()
                .any(|(name, alias)| *name == current && listed.contains(alias))
    }

    /// Evaluate every given constraint; absent constraints pass.
    ///
    /// - `version`: `<op><version>` against the toolkit version; blank
    ///   counts as absent
    /// - `api`: case-insensitive equality with the toolkit API
    /// - `os`: the current OS name appears (case-insensitively) in `os`,
    ///   so `"linux|darwin"` matches both Linux and macOS
    ///
    /// # Errors
    ///
    /// [`Error::PatchSyntax`](crate::Error::PatchSyntax) for a malformed
    /// version comparison.
    pub fn matches(&self, version: Option<&str>, api: Option<&str>, os: Option<&str>) -> Result<bool> {
        if let Some(version) = version.filter(|v| !v.trim().is_empty()) {
            if !Comparison::parse(version)?.matches(&self.toolkit_version) {
                return Ok(false);
            }
        }
        if let Some(api) = api {
            if !api.eq_ignore_ascii_case(&self.toolkit_api) {
                return Ok(false);
            }
        }
        if let Some(os) = os {
            if !self.os_listed(os) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
