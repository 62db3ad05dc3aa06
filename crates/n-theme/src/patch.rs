//! Conditional template fragments and `$url{}` directives.
//!
//! Patches are resolved to a span → replacement table and applied in one
//! regex pass. URL directives are resolved from the *patched* text, so an
//! icon referenced only inside a disabled fragment never becomes an asset.

use std::collections::HashMap;
use std::path::Path;

use n_color::{Color, ColorCache};
use regex::{Captures, Regex};

use crate::asset::{AssetDescriptor, AssetSet};
use crate::env::Environment;
use crate::error::Result;
use crate::options::Theme;
use crate::scan::{scan, EnvPatch, Token, TypePatch, UrlRef};
use crate::table::{ColorId, ColorTable};

/// Exact source span → replacement text.
pub type Replacements = HashMap<String, String>;

impl TypePatch {
    /// The joined value when `theme` is in the `|`-separated allowlist,
    /// else `""`.
    #[must_use]
    pub fn resolve(&self, theme: Theme) -> String {
        let allowed = self.types.split('|').any(|t| t.trim() == theme.as_str());
        if allowed {
            self.value.joined()
        } else {
            String::new()
        }
    }
}

impl EnvPatch {
    /// The value when the toolkit version satisfies the comparison (or the
    /// comparison is blank), else `""`.
    ///
    /// # Errors
    ///
    /// [`Error::PatchSyntax`](crate::Error::PatchSyntax) for a malformed
    /// comparison.
    pub fn resolve(&self, env: &Environment) -> Result<String> {
        Ok(if env.matches(Some(self.version.as_str()), None, None)? {
            self.value.clone()
        } else {
            String::new()
        })
    }
}

impl UrlRef {
    /// Asset for this directive drawn in `color`, the resolution of `id`.
    ///
    /// The key carries both the id and the 8-digit hex, so the same id
    /// resolved to another color (other theme, other override) lands in
    /// another file.
    #[must_use]
    pub fn descriptor(&self, dir: &Path, color: Color) -> AssetDescriptor {
        let key = format!("{}_{}", self.id, color.to_hex());
        AssetDescriptor::new(&self.icon, &key, self.rotate, dir)
    }
}

/// Map every `$type_patch{}` / `$env_patch{}` span in `template` to its
/// resolution.
///
/// # Errors
///
/// Scanning errors and malformed version comparisons.
pub fn resolve_patches(template: &str, env: &Environment, theme: Theme) -> Result<Replacements> {
    let mut replacements = Replacements::new();
    for token in scan(template)? {
        match token {
            Token::TypePatch { span, patch } => {
                replacements.insert(span.to_owned(), patch.resolve(theme));
            }
            Token::EnvPatch { span, patch } => {
                replacements.insert(span.to_owned(), patch.resolve(env)?);
            }
            _ => {}
        }
    }
    Ok(replacements)
}

/// Map every `$url{}` span in `text` to `url(<path>)` and collect the
/// distinct assets behind them, with colors resolved against `table`.
///
/// # Errors
///
/// Scanning errors, unknown color ids and malformed hex values.
pub fn resolve_urls(
    text: &str,
    cache_dir: &Path,
    table: &ColorTable,
    colors: &mut ColorCache,
) -> Result<(Replacements, AssetSet)> {
    let mut replacements = Replacements::new();
    let mut assets = AssetSet::new();
    for token in scan(text)? {
        if let Token::UrlRef { span, url } = token {
            let color = table.resolve(&ColorId::parse(&url.id)?, colors)?;
            let descriptor = url.descriptor(cache_dir, color);
            replacements.insert(span.to_owned(), descriptor.css_url());
            assets
                .entry(descriptor.file_name().into_owned())
                .or_insert(descriptor);
        }
    }
    Ok((replacements, assets))
}

/// Replace every key of `replacements` in `target` in one pass.
///
/// Keys are tried longest first, so a key that contains another wins.
///
/// # Errors
///
/// [`Error::Pattern`](crate::Error::Pattern) when the combined pattern
/// exceeds the regex size limit.
pub fn multi_replace(target: &str, replacements: &Replacements) -> Result<String> {
    let mut keys: Vec<&str> = replacements
        .keys()
        .map(String::as_str)
        .filter(|key| !key.is_empty())
        .collect();
    if keys.is_empty() {
        return Ok(target.to_owned());
    }
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&pattern)?;
    let replaced = re.replace_all(target, |caps: &Captures<'_>| {
        replacements.get(&caps[0]).cloned().unwrap_or_default()
    });
    Ok(replaced.into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
