//! Apply user color overrides to a color table.
//!
//! Overrides are `color-id → hex`, optionally scoped to one theme:
//!
//! ```json
//! {
//!   "primary": "#d0bcff",
//!   "[light]": { "primary": "#6750a4", "background>popup": "#fffbfe" }
//! }
//! ```
//!
//! Plain entries apply to every theme; the active theme's block is layered
//! on top and blocks for other themes are ignored. A merge either applies
//! every override or none of them.

use std::collections::BTreeMap;

use n_color::Color;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::options::Theme;
use crate::table::{ColorId, ColorSpec, ColorTable, StateValue};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Hex(String),
    Scoped(BTreeMap<String, String>),
}

/// User overrides, as read from a config file or built in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CustomColors(BTreeMap<String, OverrideValue>);

fn scope_key(theme: Theme) -> String {
    format!("[{theme}]")
}

fn is_scope_key(key: &str) -> bool {
    key.starts_with('[') && key.ends_with(']')
}

impl CustomColors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`Error::Json`] when the text is not an object of strings and
    /// string maps.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override `id` for every theme.
    pub fn insert(&mut self, id: impl Into<String>, hex: impl Into<String>) {
        self.0.insert(id.into(), OverrideValue::Hex(hex.into()));
    }

    /// Override `id` for `theme` only.
    pub fn insert_scoped(&mut self, theme: Theme, id: impl Into<String>, hex: impl Into<String>) {
        let block = self
            .0
            .entry(scope_key(theme))
            .or_insert_with(|| OverrideValue::Scoped(BTreeMap::new()));
        if let OverrideValue::Hex(_) = block {
            *block = OverrideValue::Scoped(BTreeMap::new());
        }
        if let OverrideValue::Scoped(map) = block {
            map.insert(id.into(), hex.into());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten to the `id → hex` pairs that apply under `theme`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOverride`] when a `[theme]` key maps to a string or a
    /// plain id maps to an object.
    pub fn mix(&self, theme: Theme) -> Result<BTreeMap<String, String>> {
        let own_scope = scope_key(theme);
        let mut mixed = BTreeMap::new();
        let mut scoped = None;
        for (key, value) in &self.0 {
            match (is_scope_key(key), value) {
                (false, OverrideValue::Hex(hex)) => {
                    mixed.insert(key.clone(), hex.clone());
                }
                (true, OverrideValue::Scoped(block)) => {
                    if *key == own_scope {
                        scoped = Some(block);
                    }
                }
                (true, OverrideValue::Hex(_)) => {
                    return Err(Error::InvalidOverride(format!(
                        "\"{key}\" must map color ids to hex strings"
                    )));
                }
                (false, OverrideValue::Scoped(_)) => {
                    return Err(Error::InvalidOverride(format!(
                        "\"{key}\" must be a hex string"
                    )));
                }
            }
        }
        if let Some(block) = scoped {
            mixed.extend(block.iter().map(|(id, hex)| (id.clone(), hex.clone())));
        }
        Ok(mixed)
    }

    /// Whether any override that applies under `theme` touches `primary`.
    ///
    /// # Errors
    ///
    /// Same as [`mix`](Self::mix).
    pub fn has_primary_color(&self, theme: Theme) -> Result<bool> {
        Ok(self.mix(theme)?.keys().any(|id| id.contains("primary")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomColors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut colors = Self::new();
        for (id, hex) in iter {
            colors.insert(id, hex);
        }
        colors
    }
}

/// Apply `overrides` to `table` for `theme`.
///
/// Each id must already exist: the parent in the table, and for
/// `parent>state` the state in a structured entry (`base` is always
/// present). Literal entries take no child. Every hex is validated.
///
/// # Errors
///
/// [`Error::InvalidOverride`], [`Error::InvalidColorId`] or
/// [`Error::Format`]; `table` is left untouched on error.
pub fn merge(table: &mut ColorTable, overrides: &CustomColors, theme: Theme) -> Result<()> {
    let mut merged = table.clone();
    for (id, hex) in overrides.mix(theme)? {
        apply(&mut merged, &id, hex)?;
    }
    *table = merged;
    Ok(())
}

fn apply(table: &mut ColorTable, raw_id: &str, hex: String) -> Result<()> {
    let id = ColorId::parse(raw_id)?;
    Color::from_hex(&hex)?;
    let invalid = || Error::InvalidColorId(raw_id.to_owned());
    let spec = table.get_mut(id.parent()).ok_or_else(invalid)?;
    match (spec, id.child()) {
        (ColorSpec::Literal(value), None) => *value = hex,
        (ColorSpec::Literal(_), Some(_)) => return Err(invalid()),
        (ColorSpec::Structured { base, .. }, None | Some("base")) => *base = hex,
        (ColorSpec::Structured { states, .. }, Some(state)) => {
            let slot = states.get_mut(state).ok_or_else(invalid)?;
            *slot = StateValue::Literal(hex);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
