//! The template renderer.
//!
//! ```text
//! template ──resolve_patches──► replacements ──multi_replace──► patched text
//!                                                                   │
//!                                                                  scan
//!                                                                   │
//!          literal ─────────────────────────────────────► copied    │
//!          {{ head | filter… }} ──► scope + filters ────► text      │
//!          $url{…} ──► color table ──► descriptor ──────► url(...)  ▼
//!                                            │                   output
//!                                            └──► AssetEmitter (after the pass)
//! ```
//!
//! The renderer owns the hex cache and the emitter's written set, so
//! repeated renders are cheap and never rewrite an asset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use n_color::{Color, ColorCache};
use tracing::{debug, warn};

use crate::asset::{AssetDescriptor, AssetEmitter, BuiltinIcons, IconSource};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::filter::{self, Expression, FilterContext, Head, Value};
use crate::options::RenderOptions;
use crate::patch::{multi_replace, resolve_patches};
use crate::scan::{scan, Token};
use crate::table::{ColorId, ColorTable};

/// Scope variable holding the corner shape name.
pub const CORNER_SHAPE: &str = "corner-shape";

/// Names a placeholder head can refer to.
struct Scope<'t> {
    table: &'t ColorTable,
    vars: BTreeMap<&'static str, String>,
}

impl<'t> Scope<'t> {
    fn new(table: &'t ColorTable, options: &RenderOptions) -> Self {
        let vars = BTreeMap::from([(CORNER_SHAPE, options.corner_shape.as_str().to_owned())]);
        Self { table, vars }
    }

    fn lookup(&self, head: &Head) -> Result<Value<'t>> {
        match head {
            Head::Literal(text) => Ok(Value::Text(text.clone())),
            Head::Key(key) => {
                if let Some(spec) = self.table.get(key) {
                    return Ok(Value::Spec {
                        id: key.clone(),
                        spec,
                    });
                }
                self.vars
                    .get(key.as_str())
                    .map(|text| Value::Text(text.clone()))
                    .ok_or_else(|| Error::InvalidColorId(key.clone()))
            }
        }
    }
}

pub struct Renderer {
    env: Environment,
    cache_dir: PathBuf,
    icons: Box<dyn IconSource>,
    colors: ColorCache,
    emitter: AssetEmitter,
}

impl Renderer {
    /// A renderer writing assets under `cache_dir` with the builtin icons.
    #[must_use]
    pub fn new(env: Environment, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            env,
            cache_dir: cache_dir.into(),
            icons: Box::new(BuiltinIcons),
            colors: ColorCache::new(),
            emitter: AssetEmitter::new(),
        }
    }

    #[must_use]
    pub fn with_icons(mut self, icons: impl IconSource + 'static) -> Self {
        self.icons = Box::new(icons);
        self
    }

    #[must_use]
    pub const fn env(&self) -> &Environment {
        &self.env
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub const fn color_cache(&self) -> &ColorCache {
        &self.colors
    }

    #[must_use]
    pub const fn emitter(&self) -> &AssetEmitter {
        &self.emitter
    }

    /// Drop memoized colors and the record of written assets.
    pub fn reset_caches(&mut self) {
        self.colors.clear();
        self.emitter.reset();
    }

    /// Render `template` against `table`.
    ///
    /// Output is produced in full before any asset is written, so a
    /// template error never leaves partial assets behind.
    ///
    /// # Errors
    ///
    /// Syntax, color id, hex and unknown-icon errors. Asset write failures
    /// are logged and skipped.
    pub fn render(&mut self, template: &str, table: &ColorTable, options: &RenderOptions) -> Result<String> {
        let patches = resolve_patches(template, &self.env, options.theme)?;
        let patched = multi_replace(template, &patches)?;
        debug!(patches = patches.len(), theme = %options.theme, "resolved template patches");

        let scope = Scope::new(table, options);
        let mut pending = Vec::new();
        let mut out = String::with_capacity(patched.len());
        for token in scan(&patched)? {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder { expr, .. } => {
                    let expr = Expression::parse(expr)?;
                    out.push_str(&self.evaluate(&expr, &scope, &mut pending)?);
                }
                Token::UrlRef { url, .. } => {
                    let id = ColorId::parse(&url.id)?;
                    let color = table.resolve(&id, &mut self.colors)?;
                    let descriptor = url.descriptor(&self.cache_dir, color);
                    out.push_str(&descriptor.css_url());
                    pending.push((descriptor, color));
                }
                // Only reachable when a patch value itself contains a patch.
                Token::TypePatch { patch, .. } => out.push_str(&patch.resolve(options.theme)),
                Token::EnvPatch { patch, .. } => out.push_str(&patch.resolve(&self.env)?),
            }
        }

        self.emit_all(&pending)?;
        Ok(out)
    }

    fn evaluate<'t>(
        &mut self,
        expr: &Expression,
        scope: &Scope<'t>,
        pending: &mut Vec<(AssetDescriptor, Color)>,
    ) -> Result<String> {
        let mut ctx = FilterContext {
            colors: &mut self.colors,
            env: &self.env,
            cache_dir: &self.cache_dir,
            assets: pending,
        };
        let value = expr
            .filters
            .iter()
            .try_fold(scope.lookup(&expr.head)?, |value, call| {
                filter::apply(call, value, &mut ctx)
            })?;
        value.into_text()
    }

    fn emit_all(&mut self, pending: &[(AssetDescriptor, Color)]) -> Result<()> {
        for (descriptor, color) in pending {
            match self.emitter.emit(descriptor, *color, self.icons.as_ref()) {
                Ok(_) => {}
                Err(err @ Error::AssetWrite { .. }) => warn!("{err}"),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
