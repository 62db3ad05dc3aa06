//! The top-level API: turn user choices into a stylesheet or palette.
//!
//! ```text
//! ThemeChoice ──(auto? SystemAppearance)──► Theme
//!                                             │
//! builtin table ◄── merge ◄── CustomColors (+ OS accent for auto)
//!       │
//!       ▼
//! Renderer::render(template)  /  build_palette
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::asset::{self, IconSource};
use crate::builtin::{self, accent_color, STANDARD_ICONS_TEMPLATE, STYLESHEET_TEMPLATE};
use crate::env::Environment;
use crate::error::Result;
use crate::merge::{merge, CustomColors};
use crate::options::{CornerShape, RenderOptions, Theme, ThemeChoice};
use crate::palette::{build_palette, Palette};
use crate::table::ColorTable;
use crate::template::Renderer;

// ─── System appearance ──────────────────────────────────────────────────────

/// OS theme and accent detection, consulted for [`ThemeChoice::Auto`].
pub trait SystemAppearance {
    /// The OS theme, or `None` when it cannot be determined.
    fn theme(&self) -> Option<Theme>;

    /// Name of the OS accent (`"blue"`, `"pink"`, ...), if any.
    fn accent(&self) -> Option<String> {
        None
    }
}

/// Never detects anything; `auto` always falls back to the default theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetection;

impl SystemAppearance for NoDetection {
    fn theme(&self) -> Option<Theme> {
        None
    }
}

/// Fixed answers, for hosts that detect the appearance themselves.
#[derive(Debug, Clone, Default)]
pub struct FixedAppearance {
    pub theme: Option<Theme>,
    pub accent: Option<String>,
}

impl SystemAppearance for FixedAppearance {
    fn theme(&self) -> Option<Theme> {
        self.theme
    }

    fn accent(&self) -> Option<String> {
        self.accent.clone()
    }
}

// ─── Options ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StylesheetOptions {
    pub theme: ThemeChoice,
    pub corner_shape: CornerShape,
    pub custom_colors: Option<CustomColors>,
    /// Used when `theme` is `auto` and detection fails.
    pub default_theme: Theme,
    /// Append icons for standard dialogs and title bars.
    pub standard_icons: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PaletteOptions {
    pub theme: ThemeChoice,
    pub custom_colors: Option<CustomColors>,
    pub default_theme: Theme,
    /// Only the roles a stylesheet cannot express.
    pub for_stylesheet: bool,
}

// ─── Loader ─────────────────────────────────────────────────────────────────

pub struct StyleLoader {
    renderer: Renderer,
    appearance: Box<dyn SystemAppearance>,
}

impl StyleLoader {
    /// A loader writing assets under `cache_dir`, without OS detection.
    #[must_use]
    pub fn new(env: Environment, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer: Renderer::new(env, cache_dir),
            appearance: Box::new(NoDetection),
        }
    }

    #[must_use]
    pub fn with_appearance(mut self, appearance: impl SystemAppearance + 'static) -> Self {
        self.appearance = Box::new(appearance);
        self
    }

    #[must_use]
    pub fn with_icons(mut self, icons: impl IconSource + 'static) -> Self {
        self.renderer = self.renderer.with_icons(icons);
        self
    }

    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        self.renderer.cache_dir()
    }

    /// Names accepted for a fixed theme.
    #[must_use]
    pub const fn themes() -> &'static [&'static str] {
        builtin::theme_names()
    }

    /// Render the builtin stylesheet.
    ///
    /// # Errors
    ///
    /// Override, color id and template errors; see [`Error`](crate::Error).
    pub fn load_stylesheet(&mut self, options: &StylesheetOptions) -> Result<String> {
        let (theme, custom) = self.resolve(options.theme, options.default_theme, options.custom_colors.as_ref())?;
        let table = colors_for(theme, custom.as_ref())?;

        if let Err(err) = fs::create_dir_all(self.cache_dir()) {
            debug!(path = %self.cache_dir().display(), "cannot create asset cache: {err}");
        }

        let mut template = STYLESHEET_TEMPLATE.to_owned();
        if options.standard_icons {
            template.push_str(STANDARD_ICONS_TEMPLATE);
        }
        let render = RenderOptions {
            theme,
            corner_shape: options.corner_shape,
        };
        self.renderer.render(&template, &table, &render)
    }

    /// Build the toolkit palette.
    ///
    /// # Errors
    ///
    /// Override and color id errors; see [`Error`](crate::Error).
    pub fn load_palette(&mut self, options: &PaletteOptions) -> Result<Palette> {
        let (theme, custom) = self.resolve(options.theme, options.default_theme, options.custom_colors.as_ref())?;
        let table = colors_for(theme, custom.as_ref())?;
        build_palette(&mut self.renderer, &table, theme, options.for_stylesheet)
    }

    /// Delete generated assets and forget what was written.
    ///
    /// # Errors
    ///
    /// I/O failures other than the cache being absent.
    pub fn clear_cache(&mut self) -> Result<bool> {
        self.renderer.reset_caches();
        asset::clear_cache(self.renderer.cache_dir())
    }

    /// Pick the concrete theme and the overrides that go with it.
    fn resolve(
        &self,
        choice: ThemeChoice,
        default_theme: Theme,
        custom: Option<&CustomColors>,
    ) -> Result<(Theme, Option<CustomColors>)> {
        match choice {
            ThemeChoice::Fixed(theme) => Ok((theme, custom.cloned())),
            ThemeChoice::Auto => {
                let theme = self.detect_theme(default_theme);
                Ok((theme, self.with_os_accent(custom, theme)?))
            }
        }
    }

    fn detect_theme(&self, default_theme: Theme) -> Theme {
        self.appearance.theme().unwrap_or_else(|| {
            info!(theme = %default_theme, "could not detect the OS theme; using the default");
            default_theme
        })
    }

    /// Set `primary` to the OS accent unless the user already chose one.
    fn with_os_accent(&self, custom: Option<&CustomColors>, theme: Theme) -> Result<Option<CustomColors>> {
        let Some(hex) = self
            .appearance
            .accent()
            .and_then(|name| accent_color(theme, &name))
        else {
            return Ok(custom.cloned());
        };
        let mut custom = custom.cloned().unwrap_or_default();
        if !custom.has_primary_color(theme)? {
            debug!(accent = hex, "using the OS accent as primary");
            custom.insert("primary", hex);
        }
        Ok(Some(custom))
    }
}

fn colors_for(theme: Theme, custom: Option<&CustomColors>) -> Result<ColorTable> {
    let mut table = builtin::builtin_colors(theme)?;
    if let Some(custom) = custom {
        merge(&mut table, custom, theme)?;
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
