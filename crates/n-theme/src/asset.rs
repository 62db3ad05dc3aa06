//! Colored, rotated SVG icons written next to the generated stylesheet.
//!
//! Stylesheets cannot tint images, so every `(icon, color, rotation)` triple
//! a template references becomes its own file. The resolved color is part of
//! every name, so a file on disk is never stale and can be skipped:
//!
//! ```text
//! <cache-root>/v0.1.0/
//!   check_primary_8ab4f7ff_0.svg   ← $url{"icon": "check", "id": "primary"}
//!   chevron_down_e4e7ebff_90.svg   ← {{ foreground|color|url(icon="chevron_down", rotate=90) }}
//! ```
//!
//! Icon sources carry `fill="currentColor"`; the emitter swaps that for the
//! concrete fill, opacity and a rotation about the view box center.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use n_color::Color;
use tracing::{debug, info};

use crate::error::{Error, Result};

const FILL_MARKER: &str = r#"fill="currentColor""#;

// ─── Descriptors ────────────────────────────────────────────────────────────

/// One generated asset: which icon, which color key, how rotated, and where.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetDescriptor {
    pub icon: String,
    /// `{id}_{hex}` (`$url{}` directives) or 8-digit hex (`url` filter).
    pub color_key: String,
    pub rotation: i32,
    pub path: PathBuf,
}

/// Descriptors keyed by file name.
pub type AssetSet = BTreeMap<String, AssetDescriptor>;

impl AssetDescriptor {
    #[must_use]
    pub fn new(icon: &str, color_key: &str, rotation: i32, dir: &Path) -> Self {
        let path = dir.join(asset_file_name(icon, color_key, rotation));
        Self {
            icon: icon.to_owned(),
            color_key: color_key.to_owned(),
            rotation,
            path,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map_or(Cow::Borrowed(""), |name| name.to_string_lossy())
    }

    /// `url(<path>)` with forward slashes on every platform.
    #[must_use]
    pub fn css_url(&self) -> String {
        format!("url({})", self.path.to_string_lossy().replace('\\', "/"))
    }
}

/// `{icon}_{key}_{rotation}.svg`, with `.svg` dropped from the icon name and
/// `>` in the key replaced by `-`.
#[must_use]
pub fn asset_file_name(icon: &str, color_key: &str, rotation: i32) -> String {
    let icon = icon.strip_suffix(".svg").unwrap_or(icon);
    format!("{icon}_{}_{rotation}.svg", color_key.replace('>', "-"))
}

// ─── Icon sources ───────────────────────────────────────────────────────────

/// Where SVG sources come from.
pub trait IconSource {
    /// SVG text for `icon` (with or without a `.svg` suffix).
    fn svg(&self, icon: &str) -> Option<Cow<'_, str>>;
}

/// The icons the builtin templates reference, embedded at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIcons;

impl BuiltinIcons {
    pub const NAMES: [&'static str; 9] = [
        "check",
        "chevron_down",
        "circle",
        "close",
        "dash",
        "error",
        "info",
        "warning",
        "window_minimize",
    ];
}

impl IconSource for BuiltinIcons {
    fn svg(&self, icon: &str) -> Option<Cow<'_, str>> {
        let svg = match icon.strip_suffix(".svg").unwrap_or(icon) {
            "check" => include_str!("../icons/check.svg"),
            "chevron_down" => include_str!("../icons/chevron_down.svg"),
            "circle" => include_str!("../icons/circle.svg"),
            "close" => include_str!("../icons/close.svg"),
            "dash" => include_str!("../icons/dash.svg"),
            "error" => include_str!("../icons/error.svg"),
            "info" => include_str!("../icons/info.svg"),
            "warning" => include_str!("../icons/warning.svg"),
            "window_minimize" => include_str!("../icons/window_minimize.svg"),
            _ => return None,
        };
        Some(Cow::Borrowed(svg))
    }
}

/// In-memory icon set, keyed by name without `.svg`.
impl IconSource for HashMap<String, String> {
    fn svg(&self, icon: &str) -> Option<Cow<'_, str>> {
        self.get(icon.strip_suffix(".svg").unwrap_or(icon))
            .map(|svg| Cow::Borrowed(svg.as_str()))
    }
}

// ─── SVG rewriting ──────────────────────────────────────────────────────────

/// Replace every `fill="currentColor"` with a concrete fill, opacity and
/// rotation about the icon center.
#[must_use]
pub fn recolor(svg: &str, color: Color, rotation: i32) -> String {
    let (r, g, b, _) = color.to_rgba8();
    let alpha = color.rgba().a();
    let (cx, cy) = icon_center(svg);
    let attrs = format!(
        r#"fill="rgb({r}, {g}, {b})" fill-opacity="{alpha}" transform="rotate({rotation}, {cx}, {cy})""#
    );
    svg.replace(FILL_MARKER, &attrs)
}

/// Center of the `viewBox`, else of `width`/`height`, else of 24×24.
fn icon_center(svg: &str) -> (f64, f64) {
    if let Some(view_box) = attribute(svg, "viewBox") {
        let nums: Vec<f64> = view_box
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let [x, y, w, h] = nums[..] {
            return (w.mul_add(0.5, x), h.mul_add(0.5, y));
        }
    }
    let dimension = |name| {
        attribute(svg, name)
            .and_then(|v| v.trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(24.0)
    };
    (dimension("width") / 2.0, dimension("height") / 2.0)
}

/// Value of the first `name="..."` attribute on the root `<svg>` element.
fn attribute<'s>(svg: &'s str, name: &str) -> Option<&'s str> {
    let root_start = svg.find("<svg")?;
    let root = &svg[root_start..];
    let root = &root[..root.find('>')?];
    let needle = format!(" {name}=\"");
    let value_start = root.find(&needle)? + needle.len();
    let value = &root[value_start..];
    Some(&value[..value.find('"')?])
}

// ─── Emitter ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    Written,
    /// Already written in this process or already on disk.
    Skipped,
}

/// Writes asset files, remembering what it has written.
#[derive(Debug, Default)]
pub struct AssetEmitter {
    written: HashSet<PathBuf>,
}

impl AssetEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `descriptor` in `color`, unless it already exists.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownIcon`] when `icons` has no such icon;
    /// [`Error::AssetWrite`] when the file cannot be written.
    pub fn emit(&mut self, descriptor: &AssetDescriptor, color: Color, icons: &dyn IconSource) -> Result<Emitted> {
        let path = &descriptor.path;
        if self.written.contains(path) || path.exists() {
            self.written.insert(path.clone());
            return Ok(Emitted::Skipped);
        }
        let source = icons
            .svg(&descriptor.icon)
            .ok_or_else(|| Error::UnknownIcon(descriptor.icon.clone()))?;
        let svg = recolor(&source, color, descriptor.rotation);
        write_creating_parent(path, &svg).map_err(|source| Error::AssetWrite {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote icon asset");
        self.written.insert(path.clone());
        Ok(Emitted::Written)
    }

    /// Number of distinct paths written or found on disk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.written.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Forget what has been written; files on disk are still skipped.
    pub fn reset(&mut self) {
        self.written.clear();
    }
}

fn write_creating_parent(path: &Path, contents: &str) -> io::Result<()> {
    match fs::write(path, contents) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)
        }
        other => other,
    }
}

// ─── Cache directory ────────────────────────────────────────────────────────

/// `<cache dir>/n-style`, or the system temp dir when there is no cache dir.
#[must_use]
pub fn default_cache_base() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("n-style")
}

/// Per-version asset directory under `base`.
#[must_use]
pub fn cache_root(base: &Path) -> PathBuf {
    base.join(concat!("v", env!("CARGO_PKG_VERSION")))
}

/// Delete `dir` and everything in it. Returns whether anything was removed.
///
/// # Errors
///
/// [`Error::Io`] for failures other than the directory being absent.
pub fn clear_cache(dir: &Path) -> Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            info!(path = %dir.display(), "deleted asset cache");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %dir.display(), "no asset cache to delete");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
