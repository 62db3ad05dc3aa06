//! Placeholder expressions and the filters they chain.
//!
//! ```text
//! {{ background | color(state="hover") | palette }}
//!    ──────────   ─────────────────────   ───────
//!    head         filter call (JSON args)  filter call
//! ```
//!
//! | filter    | input        | args                                  | output                  |
//! |-----------|--------------|---------------------------------------|-------------------------|
//! | `color`   | id / hex     | `state?`                              | color                   |
//! | `corner`  | shape name   | `size`                                | `size` or `"0"`         |
//! | `env`     | text         | `value`, `version?`, `api?`, `os?`    | `value` or `""`         |
//! | `url`     | color        | `icon`, `rotate?`                     | `url(<asset path>)`     |
//! | `palette` | color        |                                       | `#aarrggbb`             |

use std::collections::BTreeMap;
use std::path::Path;

use n_color::{Color, ColorCache};
use serde_json::Value as Json;

use crate::asset::AssetDescriptor;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::table::ColorSpec;

const PLACEHOLDER: &str = "placeholder";

// ─── Expressions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Looked up in the render scope.
    Key(String),
    /// A JSON string literal.
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub args: BTreeMap<String, Json>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub head: Head,
    pub filters: Vec<FilterCall>,
}

impl Expression {
    /// Parse the text between `{{` and `}}`.
    ///
    /// # Errors
    ///
    /// [`Error::PatchSyntax`] for an empty head, a malformed call or an
    /// argument that is not valid JSON.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = split_top_level(text, b'|').into_iter();
        let head = segments.next().map(str::trim).unwrap_or_default();
        let head = if head.starts_with('"') {
            Head::Literal(
                serde_json::from_str(head)
                    .map_err(|err| Error::syntax(PLACEHOLDER, format!("head {head}: {err}")))?,
            )
        } else if !head.is_empty() && head.chars().all(is_key_char) {
            Head::Key(head.to_owned())
        } else {
            return Err(Error::syntax(PLACEHOLDER, format!("invalid head \"{head}\"")));
        };
        let filters = segments.map(FilterCall::parse).collect::<Result<_>>()?;
        Ok(Self { head, filters })
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '>')
}

impl FilterCall {
    fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (name, args) = match text.find('(') {
            None => (text, ""),
            Some(open) => {
                let inner = text[open + 1..].strip_suffix(')').ok_or_else(|| {
                    Error::syntax(PLACEHOLDER, format!("missing `)` in `{text}`"))
                })?;
                (text[..open].trim_end(), inner)
            }
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::syntax(PLACEHOLDER, format!("invalid filter name in `{text}`")));
        }
        let mut parsed = BTreeMap::new();
        for arg in split_top_level(args, b',') {
            let arg = arg.trim();
            if arg.is_empty() {
                continue;
            }
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                Error::syntax(PLACEHOLDER, format!("`{name}` argument `{arg}` must be key=value"))
            })?;
            let value = serde_json::from_str(value.trim()).map_err(|err| {
                Error::syntax(PLACEHOLDER, format!("`{name}` argument `{}`: {err}", key.trim()))
            })?;
            parsed.insert(key.trim().to_owned(), value);
        }
        Ok(Self {
            name: name.to_owned(),
            args: parsed,
        })
    }

    fn arg_text(&self, key: &str) -> Result<Option<String>> {
        match self.args.get(key) {
            None | Some(Json::Null) => Ok(None),
            Some(Json::String(s)) => Ok(Some(s.clone())),
            Some(Json::Number(n)) => Ok(Some(n.to_string())),
            Some(Json::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(Error::syntax(
                self.name.as_str(),
                format!("argument `{key}` must be a scalar, got {other}"),
            )),
        }
    }

    fn required_text(&self, key: &str) -> Result<String> {
        self.arg_text(key)?
            .ok_or_else(|| Error::syntax(self.name.as_str(), format!("missing argument `{key}`")))
    }

    fn arg_int(&self, key: &str, default: i32) -> Result<i32> {
        match self.args.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    Error::syntax(self.name.as_str(), format!("argument `{key}` must be an integer"))
                }),
        }
    }
}

/// Split on `sep` outside JSON strings and parentheses.
fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => depth = depth.saturating_sub(1),
            b if b == sep && !in_string && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

// ─── Values ─────────────────────────────────────────────────────────────────

/// What flows between filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'t> {
    Text(String),
    /// A color table entry, not yet resolved to a state.
    Spec { id: String, spec: &'t ColorSpec },
    Color(Color),
}

impl Value<'_> {
    /// Final text for the stylesheet.
    ///
    /// # Errors
    ///
    /// [`Error::PatchSyntax`] for a structured color that was never passed
    /// through `color`.
    pub fn into_text(self) -> Result<String> {
        match self {
            Value::Text(text) => Ok(text),
            Value::Color(color) => Ok(color.to_string()),
            Value::Spec {
                spec: ColorSpec::Literal(hex),
                ..
            } => Ok(hex.clone()),
            Value::Spec { id, .. } => Err(Error::syntax(
                PLACEHOLDER,
                format!("`{id}` has states; pass it through `color`"),
            )),
        }
    }

    fn into_color(self, filter: &str, colors: &mut ColorCache) -> Result<Color> {
        match self {
            Value::Color(color) => Ok(color),
            Value::Spec { id, spec } => spec.resolve(&id, None, colors),
            Value::Text(text) => Err(Error::syntax(
                filter,
                format!("expected a color, got \"{text}\""),
            )),
        }
    }
}

// ─── Evaluation ─────────────────────────────────────────────────────────────

/// Everything filters may read or record.
pub struct FilterContext<'a> {
    pub colors: &'a mut ColorCache,
    pub env: &'a Environment,
    pub cache_dir: &'a Path,
    /// Assets requested by `url`, emitted once the whole template rendered.
    pub assets: &'a mut Vec<(AssetDescriptor, Color)>,
}

/// Apply one filter call.
///
/// # Errors
///
/// [`Error::PatchSyntax`] for an unknown filter, a missing argument or a
/// wrong input type; color errors from `color`.
pub fn apply<'t>(call: &FilterCall, input: Value<'t>, ctx: &mut FilterContext<'_>) -> Result<Value<'t>> {
    match call.name.as_str() {
        "color" => color(call, input, ctx).map(Value::Color),
        "corner" => corner(call, input).map(Value::Text),
        "env" => env(call, input, ctx.env).map(Value::Text),
        "url" => url(call, input, ctx).map(Value::Text),
        "palette" => palette(input, ctx).map(Value::Text),
        other => Err(Error::syntax(PLACEHOLDER, format!("unknown filter `{other}`"))),
    }
}

fn color(call: &FilterCall, input: Value<'_>, ctx: &mut FilterContext<'_>) -> Result<Color> {
    let state = call.arg_text("state")?;
    match input {
        Value::Text(hex) => Ok(ctx.colors.from_hex(&hex)?),
        Value::Spec { id, spec } => spec.resolve(&id, state.as_deref(), ctx.colors),
        Value::Color(color) => Ok(color),
    }
}

fn corner(call: &FilterCall, input: Value<'_>) -> Result<String> {
    let size = call.required_text("size")?;
    let shape = input.into_text()?;
    Ok(if shape == "rounded" { size } else { "0".to_owned() })
}

fn env(call: &FilterCall, input: Value<'_>, env: &Environment) -> Result<String> {
    let value = call.required_text("value")?;
    let version = call.arg_text("version")?;
    let api = call.arg_text("api")?;
    let os = call.arg_text("os")?;
    if !env.matches(version.as_deref(), api.as_deref(), os.as_deref())? {
        return Ok(String::new());
    }
    Ok(value.replace("${}", &input.into_text()?))
}

fn url(call: &FilterCall, input: Value<'_>, ctx: &mut FilterContext<'_>) -> Result<String> {
    let icon = call.required_text("icon")?;
    let rotate = call.arg_int("rotate", 0)?;
    let color = input.into_color("url", ctx.colors)?;
    let descriptor = AssetDescriptor::new(&icon, &color.to_hex(), rotate, ctx.cache_dir);
    let css = descriptor.css_url();
    ctx.assets.push((descriptor, color));
    Ok(css)
}

fn palette(input: Value<'_>, ctx: &mut FilterContext<'_>) -> Result<String> {
    let color = input.into_color("palette", ctx.colors)?;
    Ok(format!("#{}", color.to_hex_argb()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
