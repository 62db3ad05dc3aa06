//! Color tables: the JSON mapping from color ids to colors and their states.
//!
//! ```json
//! {
//!   "danger": "#f28b82",
//!   "background": {
//!     "base": "#202124",
//!     "textarea": "#1e1e1e",
//!     "hover": { "lighten": 0.15 }
//!   }
//! }
//! ```
//!
//! A string is a [`ColorSpec::Literal`]. An object is
//! [`ColorSpec::Structured`]: it must carry a string `base`, and every other
//! key names a state whose value is either a hex string or a [`Transform`].
//! Ids address entries as `parent` or `parent>state`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use n_color::{Color, ColorCache};
use serde::Deserialize;

use crate::error::{Error, Result};

// ─── ColorId ────────────────────────────────────────────────────────────────

/// `parent` or `parent>child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId {
    parent: String,
    child: Option<String>,
}

impl ColorId {
    /// # Errors
    ///
    /// [`Error::InvalidColorId`] for empty segments or more than one `>`.
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || Error::InvalidColorId(id.to_owned());
        let mut parts = id.split('>');
        let parent = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let child = match parts.next() {
            None => None,
            Some("") => return Err(invalid()),
            Some(child) => Some(child.to_owned()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            parent: parent.to_owned(),
            child,
        })
    }

    #[must_use]
    pub fn parent(&self) -> &str {
        &self.parent
    }

    #[must_use]
    pub fn child(&self) -> Option<&str> {
        self.child.as_deref()
    }
}

impl FromStr for ColorId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.child {
            Some(child) => write!(f, "{}>{child}", self.parent),
            None => f.write_str(&self.parent),
        }
    }
}

// ─── Transform ──────────────────────────────────────────────────────────────

/// A derived state: adjust the base color by one factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transform {
    #[serde(default)]
    pub transparent: Option<f64>,
    #[serde(default)]
    pub darken: Option<f64>,
    #[serde(default)]
    pub lighten: Option<f64>,
}

/// The single adjustment a [`Transform`] performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Transparent(f64),
    Darken(f64),
    Lighten(f64),
}

impl Transform {
    /// The effective adjustment.
    ///
    /// Only the first present, non-zero key applies, in the order
    /// `transparent`, `darken`, `lighten`. Later keys are ignored.
    #[must_use]
    pub fn adjustment(&self) -> Option<Adjustment> {
        let nonzero = |f: Option<f64>| f.filter(|f| *f != 0.0);
        nonzero(self.transparent)
            .map(Adjustment::Transparent)
            .or_else(|| nonzero(self.darken).map(Adjustment::Darken))
            .or_else(|| nonzero(self.lighten).map(Adjustment::Lighten))
    }

    #[must_use]
    pub fn apply(&self, base: Color) -> Color {
        match self.adjustment() {
            Some(Adjustment::Transparent(f)) => base.transparent(f),
            Some(Adjustment::Darken(f)) => base.darken(f),
            Some(Adjustment::Lighten(f)) => base.lighten(f),
            None => base,
        }
    }
}

// ─── ColorSpec ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Literal(String),
    Transform(Transform),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSpec")]
pub enum ColorSpec {
    Literal(String),
    Structured {
        base: String,
        states: BTreeMap<String, StateValue>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Literal(String),
    Structured(BTreeMap<String, serde_json::Value>),
}

impl TryFrom<RawSpec> for ColorSpec {
    type Error = String;

    fn try_from(raw: RawSpec) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSpec::Literal(hex) => Ok(Self::Literal(hex)),
            RawSpec::Structured(mut map) => {
                let base = match map.remove("base") {
                    Some(serde_json::Value::String(base)) => base,
                    Some(_) => return Err("`base` must be a hex string".to_owned()),
                    None => return Err("structured color is missing `base`".to_owned()),
                };
                let states = map
                    .into_iter()
                    .map(|(name, value)| {
                        serde_json::from_value(value)
                            .map(|state| (name.clone(), state))
                            .map_err(|err| format!("state `{name}`: {err}"))
                    })
                    .collect::<std::result::Result<_, _>>()?;
                Ok(Self::Structured { base, states })
            }
        }
    }
}

impl ColorSpec {
    /// The hex string of the base color.
    #[must_use]
    pub fn base(&self) -> &str {
        match self {
            Self::Literal(hex) | Self::Structured { base: hex, .. } => hex,
        }
    }

    /// Resolve to a color, optionally in a named state.
    ///
    /// A literal ignores `state`. A structured spec returns `base` for no
    /// state, the state's hex verbatim, or the state's transform applied to
    /// `base`. `id` only names the entry in errors.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorId`] for an unknown state, [`Error::Format`] for
    /// malformed hex.
    pub fn resolve(&self, id: &str, state: Option<&str>, cache: &mut ColorCache) -> Result<Color> {
        match self {
            Self::Literal(hex) => Ok(cache.from_hex(hex)?),
            Self::Structured { base, states } => {
                let Some(state) = state else {
                    return Ok(cache.from_hex(base)?);
                };
                match states.get(state) {
                    Some(StateValue::Literal(hex)) => Ok(cache.from_hex(hex)?),
                    Some(StateValue::Transform(transform)) => {
                        Ok(transform.apply(cache.from_hex(base)?))
                    }
                    None => Err(Error::InvalidColorId(format!("{id}>{state}"))),
                }
            }
        }
    }
}

// ─── ColorTable ─────────────────────────────────────────────────────────────

/// Ordered `color-id → ColorSpec` map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ColorTable(BTreeMap<String, ColorSpec>);

impl ColorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`Error::Json`] when the text is not a valid color table.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ColorSpec> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ColorSpec> {
        self.0.get_mut(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, spec: ColorSpec) -> Option<ColorSpec> {
        self.0.insert(id.into(), spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorSpec)> {
        self.0.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve `parent` or `parent>state` to a color.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorId`] when the parent or state does not exist.
    pub fn resolve(&self, id: &ColorId, cache: &mut ColorCache) -> Result<Color> {
        let spec = self
            .get(id.parent())
            .ok_or_else(|| Error::InvalidColorId(id.to_string()))?;
        spec.resolve(id.parent(), id.child(), cache)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r##"{
        "danger": "#f28b82",
        "background": {
            "base": "#1e1e1e",
            "popup": "#292a2d",
            "hover": { "darken": 0.1 },
            "shadowed": { "transparent": 0.5, "darken": 0.3 }
        }
    }"##;

    fn table() -> ColorTable {
        ColorTable::from_json(TABLE).unwrap()
    }

    // ── ColorId ─────────────────────────────────────────────────────

    #[test]
    fn id_parent_and_child() {
        let id = ColorId::parse("primary>hover").unwrap();
        assert_eq!(id.parent(), "primary");
        assert_eq!(id.child(), Some("hover"));
        assert_eq!(id.to_string(), "primary>hover");
        assert_eq!(ColorId::parse("primary").unwrap().child(), None);
    }

    #[test]
    fn id_rejects_extra_separators_and_empty_parts() {
        for bad in ["a>b>c", "", ">hover", "primary>"] {
            assert!(
                matches!(ColorId::parse(bad), Err(Error::InvalidColorId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    // ── Deserialization ─────────────────────────────────────────────

    #[test]
    fn literal_and_structured_entries() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("danger"), Some(&ColorSpec::Literal("#f28b82".into())));
        let Some(ColorSpec::Structured { base, states }) = table.get("background") else {
            panic!("background should be structured");
        };
        assert_eq!(base, "#1e1e1e");
        assert_eq!(states.get("popup"), Some(&StateValue::Literal("#292a2d".into())));
        assert!(matches!(states.get("hover"), Some(StateValue::Transform(_))));
    }

    #[test]
    fn structured_without_base_is_rejected() {
        assert!(ColorTable::from_json(r##"{"x": {"hover": "#fff"}}"##).is_err());
    }

    #[test]
    fn unknown_transform_key_is_rejected() {
        assert!(ColorTable::from_json(r##"{"x": {"base": "#fff", "hover": {"blur": 1}}}"##).is_err());
    }

    // ── Resolution ──────────────────────────────────────────────────

    #[test]
    fn structured_resolves_base_state_and_transform() {
        let table = table();
        let mut cache = ColorCache::new();
        let base = Color::from_hex("#1e1e1e").unwrap();

        let id = ColorId::parse("background").unwrap();
        assert_eq!(table.resolve(&id, &mut cache).unwrap(), base);

        let id = ColorId::parse("background>popup").unwrap();
        assert_eq!(table.resolve(&id, &mut cache).unwrap().to_hex(), "292a2dff");

        let id = ColorId::parse("background>hover").unwrap();
        assert_eq!(table.resolve(&id, &mut cache).unwrap(), base.darken(0.1));
    }

    #[test]
    fn first_present_transform_wins() {
        let table = table();
        let mut cache = ColorCache::new();
        let id = ColorId::parse("background>shadowed").unwrap();
        let base = Color::from_hex("#1e1e1e").unwrap();
        assert_eq!(table.resolve(&id, &mut cache).unwrap(), base.transparent(0.5));
    }

    #[test]
    fn zero_factor_falls_through_to_next_key() {
        let t = Transform {
            transparent: Some(0.0),
            darken: Some(0.2),
            lighten: None,
        };
        assert_eq!(t.adjustment(), Some(Adjustment::Darken(0.2)));
        assert_eq!(Transform::default().adjustment(), None);
    }

    #[test]
    fn literal_ignores_state() {
        let mut cache = ColorCache::new();
        let spec = ColorSpec::Literal("#f28b82".into());
        assert_eq!(
            spec.resolve("danger", Some("hover"), &mut cache).unwrap(),
            spec.resolve("danger", None, &mut cache).unwrap()
        );
    }

    #[test]
    fn unknown_state_or_parent_is_invalid_id() {
        let table = table();
        let mut cache = ColorCache::new();
        let id = ColorId::parse("background>pressed").unwrap();
        assert!(matches!(
            table.resolve(&id, &mut cache),
            Err(Error::InvalidColorId(name)) if name == "background>pressed"
        ));
        let id = ColorId::parse("missing").unwrap();
        assert!(matches!(table.resolve(&id, &mut cache), Err(Error::InvalidColorId(_))));
    }

    #[test]
    fn malformed_hex_surfaces_format_error() {
        let mut cache = ColorCache::new();
        let spec = ColorSpec::Literal("#12345".into());
        assert!(matches!(spec.resolve("x", None, &mut cache), Err(Error::Format(_))));
    }
}
