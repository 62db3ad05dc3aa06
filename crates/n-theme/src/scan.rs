//! One-pass tokenizer for template text.
//!
//! ```text
//! QWidget { color: {{ foreground|color }}; }
//! $type_patch{"types": "dark", "value": "border: none;"};
//! QCheckBox::indicator { image: $url{"icon": "check", "id": "primary"}; }
//! ```
//!
//! yields literals interleaved with `Placeholder`, `TypePatch` and `UrlRef`
//! tokens. Directive bodies are parsed as exactly one JSON value, so braces
//! inside JSON strings never end a directive early. Every non-literal token
//! carries its exact source span; concatenating all spans reproduces the
//! input.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

const TYPE_PATCH: &str = "$type_patch";
const ENV_PATCH: &str = "$env_patch";
const URL: &str = "$url";
const OPEN: &str = "{{";

// ─── Directive bodies ───────────────────────────────────────────────────────

/// A string, or lines joined with `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    One(String),
    Lines(Vec<String>),
}

impl PatchValue {
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::One(text) => text.clone(),
            Self::Lines(lines) => lines.join("\n"),
        }
    }
}

/// `$type_patch{"types": "dark|light", "value": ...};`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypePatch {
    pub types: String,
    pub value: PatchValue,
}

/// `$env_patch{"version": ">=6.0.0", "value": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvPatch {
    pub version: String,
    pub value: String,
}

/// `$url{"icon": "check", "id": "primary>hover", "rotate": 90}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlRef {
    pub icon: String,
    pub id: String,
    #[serde(default)]
    pub rotate: i32,
}

// ─── Tokens ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    TypePatch { span: &'a str, patch: TypePatch },
    EnvPatch { span: &'a str, patch: EnvPatch },
    UrlRef { span: &'a str, url: UrlRef },
    /// `{{ ... }}`; `expr` is the text between the braces.
    Placeholder { span: &'a str, expr: &'a str },
}

impl<'a> Token<'a> {
    /// The exact source text this token was scanned from.
    #[must_use]
    pub const fn span(&self) -> &'a str {
        match self {
            Self::Literal(span)
            | Self::TypePatch { span, .. }
            | Self::EnvPatch { span, .. }
            | Self::UrlRef { span, .. }
            | Self::Placeholder { span, .. } => *span,
        }
    }
}

/// Tokenize `text`.
///
/// # Errors
///
/// [`Error::PatchSyntax`] for a malformed directive body, a `$type_patch{}`
/// without its trailing `;`, or an unterminated `{{`.
pub fn scan(text: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(['$', '{']) {
        let start = pos + offset;
        let Some((token, end)) = token_at(text, start)? else {
            pos = start + 1;
            continue;
        };
        if literal_start < start {
            tokens.push(Token::Literal(&text[literal_start..start]));
        }
        tokens.push(token);
        pos = end;
        literal_start = end;
    }
    if literal_start < text.len() {
        tokens.push(Token::Literal(&text[literal_start..]));
    }
    Ok(tokens)
}

/// Try to read a directive or placeholder starting at `start`.
fn token_at(text: &str, start: usize) -> Result<Option<(Token<'_>, usize)>> {
    let rest = &text[start..];
    if rest.starts_with(OPEN) {
        let end = placeholder_end(text, start)
            .ok_or_else(|| Error::syntax("placeholder", "unterminated `{{`"))?;
        let span = &text[start..end];
        let expr = &span[OPEN.len()..span.len() - 2];
        return Ok(Some((Token::Placeholder { span, expr }, end)));
    }
    if rest.starts_with(TYPE_PATCH) && has_body(rest, TYPE_PATCH) {
        let (patch, mut end) = directive_body::<TypePatch>(text, start, TYPE_PATCH)?;
        if !text[end..].starts_with(';') {
            return Err(Error::syntax(TYPE_PATCH, "missing `;` after directive"));
        }
        end += 1;
        return Ok(Some((Token::TypePatch { span: &text[start..end], patch }, end)));
    }
    if rest.starts_with(ENV_PATCH) && has_body(rest, ENV_PATCH) {
        let (patch, end) = directive_body::<EnvPatch>(text, start, ENV_PATCH)?;
        return Ok(Some((Token::EnvPatch { span: &text[start..end], patch }, end)));
    }
    if rest.starts_with(URL) && has_body(rest, URL) {
        let (url, end) = directive_body::<UrlRef>(text, start, URL)?;
        return Ok(Some((Token::UrlRef { span: &text[start..end], url }, end)));
    }
    Ok(None)
}

fn has_body(rest: &str, keyword: &str) -> bool {
    rest[keyword.len()..].starts_with('{')
}

/// Deserialize the JSON object following `keyword`; returns it and the byte
/// offset just past its closing brace.
fn directive_body<T: DeserializeOwned>(text: &str, start: usize, keyword: &str) -> Result<(T, usize)> {
    let body_start = start + keyword.len();
    let mut stream = serde_json::Deserializer::from_str(&text[body_start..]).into_iter::<T>();
    match stream.next() {
        Some(Ok(value)) => Ok((value, body_start + stream.byte_offset())),
        Some(Err(err)) => Err(Error::syntax(keyword, err.to_string())),
        None => Err(Error::syntax(keyword, "missing directive body")),
    }
}

/// Offset just past the `}}` closing the placeholder opened at `start`,
/// skipping over JSON string literals.
fn placeholder_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = start + OPEN.len();
    let mut in_string = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'}' if !in_string && bytes.get(i + 1) == Some(&b'}') => return Some(i + 2),
            _ => {}
        }
        i += 1;
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(text: &str) -> String {
        scan(text).unwrap().iter().map(Token::span).collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        let tokens = scan("QWidget { color: red; }").unwrap();
        assert_eq!(tokens, vec![Token::Literal("QWidget { color: red; }")]);
    }

    #[test]
    fn placeholder_between_literals() {
        let tokens = scan("a {{ primary|color }} b").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal("a "),
                Token::Placeholder {
                    span: "{{ primary|color }}",
                    expr: " primary|color ",
                },
                Token::Literal(" b"),
            ]
        );
    }

    #[test]
    fn placeholder_string_may_contain_braces() {
        let tokens = scan(r#"{{ "x}}y"|env(value="${}") }}"#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0], Token::Placeholder { expr, .. } if expr.contains("x}}y")));
    }

    #[test]
    fn type_patch_consumes_semicolon() {
        let text = r#"x$type_patch{"types": "dark", "value": ["a", "b"]};y"#;
        let tokens = scan(text).unwrap();
        assert_eq!(tokens.len(), 3);
        let Token::TypePatch { span, patch } = &tokens[1] else {
            panic!("expected a type patch, got {tokens:?}");
        };
        assert!(span.ends_with("};"));
        assert_eq!(patch.value.joined(), "a\nb");
        assert_eq!(tokens[2], Token::Literal("y"));
    }

    #[test]
    fn type_patch_without_semicolon_is_error() {
        let err = scan(r#"$type_patch{"types": "dark", "value": "a"}"#).unwrap_err();
        assert!(matches!(err, Error::PatchSyntax { directive, .. } if directive == TYPE_PATCH));
    }

    #[test]
    fn env_patch_body_may_contain_braces() {
        let text = r#"$env_patch{"version": ">=6.0.0", "value": "QMenu { margin: 0; }"}"#;
        let tokens = scan(text).unwrap();
        assert_eq!(tokens.len(), 1);
        let Token::EnvPatch { patch, .. } = &tokens[0] else {
            panic!("expected an env patch");
        };
        assert_eq!(patch.value, "QMenu { margin: 0; }");
    }

    #[test]
    fn url_rotation_defaults_to_zero() {
        let tokens = scan(r#"$url{"icon": "check", "id": "primary"}"#).unwrap();
        assert!(matches!(&tokens[0], Token::UrlRef { url, .. } if url.rotate == 0));
    }

    #[test]
    fn malformed_body_is_error() {
        assert!(scan(r#"$url{"icon": "check""#).is_err());
        assert!(scan(r#"$env_patch{"value": "x"}"#).is_err());
    }

    #[test]
    fn unterminated_placeholder_is_error() {
        assert!(matches!(
            scan("color: {{ primary|color ;"),
            Err(Error::PatchSyntax { .. })
        ));
    }

    #[test]
    fn lone_markers_stay_literal() {
        let text = "$urls are $5 { not } directives";
        assert_eq!(scan(text).unwrap(), vec![Token::Literal(text)]);
    }

    #[test]
    fn spans_reproduce_input() {
        let text = concat!(
            "QWidget { color: {{ foreground|color }}; }\n",
            r#"$type_patch{"types": "dark|light", "value": "b"};"#,
            "\n",
            r#"$url{"icon": "check", "id": "primary", "rotate": 90}"#,
        );
        assert_eq!(spans(text), text);
    }
}
