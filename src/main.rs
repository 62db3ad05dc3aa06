// SPDX-License-Identifier: MIT
//
// n-style — themed widget stylesheets from the command line.
//
// This is the main binary that wires together the crates:
//
//   n-color → color model, hex codec, contrast
//   n-theme → color tables, overrides, patches, templates, icon assets
//
// Every generating command flows through:
//
//   config file + flags → StylesheetOptions / PaletteOptions
//   StyleLoader (theme, accent, merge) → Renderer → stdout / --output
//
// Icons are written to `<cache>/n-style/v<version>/`; `clear-cache` removes
// that directory.

mod config;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use n_theme::asset::{cache_root, default_cache_base};
use n_theme::builtin::{accent_color, accents};
use n_theme::env::DEFAULT_TOOLKIT_API;
use n_theme::{
    ColorGroup, ColorRole, CornerShape, CustomColors, Environment, FixedAppearance,
    PaletteOptions, StyleLoader, StylesheetOptions, Theme, ThemeChoice, Version,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::UserConfig;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "n-style", version)]
#[command(about = "Generate themed widget stylesheets, palettes and icons", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/n-style/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base directory for generated icons
    #[arg(long, global = true, env = "N_STYLE_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Toolkit version patches are evaluated against (e.g. 6.5.2)
    #[arg(long, global = true, env = "N_STYLE_TOOLKIT_VERSION", value_name = "VERSION")]
    toolkit_version: Option<Version>,

    /// Toolkit binding name (e.g. PySide6, PyQt5)
    #[arg(long, global = true, env = "N_STYLE_TOOLKIT_API", value_name = "API")]
    toolkit_api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the stylesheet
    Stylesheet {
        #[command(flatten)]
        theme: ThemeArgs,

        /// rounded or sharp
        #[arg(long, value_name = "SHAPE")]
        corner_shape: Option<CornerShape>,

        /// Also style standard dialog and title bar icons
        #[arg(long)]
        standard_icons: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the toolkit palette as `Group:Role #aarrggbb`
    Palette {
        #[command(flatten)]
        theme: ThemeArgs,

        /// Only the roles a stylesheet cannot set
        #[arg(long)]
        for_stylesheet: bool,

        /// Also print text/background contrast ratios
        #[arg(long)]
        contrast: bool,
    },
    /// List theme names
    Themes,
    /// List accent presets
    Accents {
        /// dark or light
        #[arg(long, default_value = "dark")]
        theme: Theme,
    },
    /// Delete generated icons
    ClearCache,
}

#[derive(Args, Debug, Clone)]
struct ThemeArgs {
    /// dark, light or auto
    #[arg(long)]
    theme: Option<ThemeChoice>,

    /// Theme used when auto detection fails
    #[arg(long, value_name = "THEME")]
    default_theme: Option<Theme>,

    /// Accent preset for primary (see `accents`)
    #[arg(long, value_name = "NAME")]
    accent: Option<String>,

    /// Override a color, e.g. --color primary=#ff0000 (repeatable)
    #[arg(long = "color", value_name = "ID=HEX", value_parser = parse_override)]
    colors: Vec<(String, String)>,
}

fn parse_override(arg: &str) -> Result<(String, String), String> {
    let (id, hex) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=HEX, got \"{arg}\""))?;
    if id.is_empty() || hex.is_empty() {
        return Err(format!("expected ID=HEX, got \"{arg}\""));
    }
    Ok((id.to_owned(), hex.to_owned()))
}

// ─── Resolved settings ──────────────────────────────────────────────────────

/// Theme settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeSettings {
    theme: ThemeChoice,
    default_theme: Theme,
    accent: Option<String>,
    custom_colors: Option<CustomColors>,
}

impl ThemeSettings {
    fn resolve(args: ThemeArgs, config: &UserConfig) -> Result<Self> {
        let theme = match args.theme {
            Some(theme) => theme,
            None => config.theme()?.unwrap_or_default(),
        };
        let default_theme = match args.default_theme {
            Some(theme) => theme,
            None => config.default_theme()?.unwrap_or_default(),
        };
        let accent = args.accent.or_else(|| config.accent.clone());
        let mut custom_colors = config.custom_colors.clone();
        if !args.colors.is_empty() {
            let custom = custom_colors.get_or_insert_with(CustomColors::new);
            for (id, hex) in args.colors {
                custom.insert(id, hex);
            }
        }
        Ok(Self {
            theme,
            default_theme,
            accent,
            custom_colors,
        })
    }

    /// Apply a fixed theme's accent as a `primary` override, unless the
    /// user already set one. For `auto` the accent is returned as the
    /// appearance hint instead, since the theme is not known yet.
    fn apply_accent(mut self) -> Result<(Self, Option<String>)> {
        let Some(name) = self.accent.take() else {
            return Ok((self, None));
        };
        let ThemeChoice::Fixed(theme) = self.theme else {
            check_accent(Theme::Dark, &name)?;
            return Ok((self, Some(name)));
        };
        let hex = check_accent(theme, &name)?;
        let mut custom = self.custom_colors.take().unwrap_or_default();
        if !custom.has_primary_color(theme)? {
            custom.insert("primary", hex);
        }
        self.custom_colors = Some(custom);
        Ok((self, None))
    }
}

fn check_accent(theme: Theme, name: &str) -> Result<&'static str> {
    accent_color(theme, name).ok_or_else(|| {
        let names: Vec<_> = accents(theme).iter().map(|(n, _)| *n).collect();
        anyhow!("unknown accent \"{name}\" (expected one of: {})", names.join(", "))
    })
}

fn environment(cli: &Cli) -> Environment {
    let toolkit_version = cli.toolkit_version.clone().unwrap_or_else(|| {
        let latest = Version::latest();
        warn!(version = %latest, "toolkit version not given; assuming the latest");
        latest
    });
    let api = cli.toolkit_api.as_deref().unwrap_or(DEFAULT_TOOLKIT_API);
    Environment::new(toolkit_version, api)
}

fn loader(cli: &Cli, env: Environment, accent: Option<String>) -> StyleLoader {
    let base = cli.cache_dir.clone().unwrap_or_else(default_cache_base);
    let loader = StyleLoader::new(env, cache_root(&base));
    match accent {
        Some(accent) => loader.with_appearance(FixedAppearance {
            theme: None,
            accent: Some(accent),
        }),
        None => loader,
    }
}

fn load_config(cli: &Cli) -> Result<UserConfig> {
    match cli.config.clone().or_else(UserConfig::default_path) {
        Some(path) => UserConfig::load(&path),
        None => Ok(UserConfig::default()),
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

const CONTRAST_PAIRS: [(ColorGroup, ColorRole, ColorRole); 3] = [
    (ColorGroup::Active, ColorRole::WindowText, ColorRole::Window),
    (ColorGroup::Active, ColorRole::Text, ColorRole::Base),
    (ColorGroup::Active, ColorRole::HighlightedText, ColorRole::Highlight),
];

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Stylesheet {
            ref theme,
            corner_shape,
            standard_icons,
            ref output,
        } => {
            let (settings, accent) = ThemeSettings::resolve(theme.clone(), &config)?.apply_accent()?;
            let options = StylesheetOptions {
                theme: settings.theme,
                corner_shape: match corner_shape {
                    Some(shape) => shape,
                    None => config.corner_shape()?.unwrap_or_default(),
                },
                custom_colors: settings.custom_colors,
                default_theme: settings.default_theme,
                standard_icons: standard_icons || config.standard_icons.unwrap_or(false),
            };
            let stylesheet = loader(&cli, environment(&cli), accent).load_stylesheet(&options)?;
            match output {
                Some(path) => {
                    fs::write(path, &stylesheet)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), bytes = stylesheet.len(), "wrote stylesheet");
                }
                None => out.write_all(stylesheet.as_bytes())?,
            }
        }
        Commands::Palette {
            ref theme,
            for_stylesheet,
            contrast,
        } => {
            let (settings, accent) = ThemeSettings::resolve(theme.clone(), &config)?.apply_accent()?;
            let options = PaletteOptions {
                theme: settings.theme,
                custom_colors: settings.custom_colors,
                default_theme: settings.default_theme,
                for_stylesheet,
            };
            let palette = loader(&cli, environment(&cli), accent).load_palette(&options)?;
            write!(out, "{palette}")?;
            if contrast {
                for (group, fg, bg) in CONTRAST_PAIRS {
                    if let Some(ratio) = palette.contrast(group, fg, bg) {
                        writeln!(out, "{group}: {fg}/{bg} {ratio:.2}:1")?;
                    }
                }
            }
        }
        Commands::Themes => {
            for name in StyleLoader::themes() {
                writeln!(out, "{name}")?;
            }
            writeln!(out, "auto")?;
        }
        Commands::Accents { theme } => {
            for (name, hex) in accents(theme) {
                writeln!(out, "{name:<10} {hex}")?;
            }
        }
        Commands::ClearCache => {
            if !loader(&cli, Environment::default(), None).clear_cache()? {
                writeln!(out, "nothing to clear")?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    run(Cli::parse())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("n-style").chain(args.iter().copied())).unwrap()
    }

    fn theme_args(cli: Cli) -> ThemeArgs {
        match cli.command {
            Commands::Stylesheet { theme, .. } | Commands::Palette { theme, .. } => theme,
            other => panic!("no theme args on {other:?}"),
        }
    }

    // ── Parsing ───────────────────────────────────────────────────────────

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn stylesheet_flags_parse() {
        let cli = parse(&[
            "stylesheet",
            "--theme",
            "auto",
            "--corner-shape",
            "sharp",
            "--color",
            "primary=#ff0000",
            "--toolkit-version",
            "5.15.2",
        ]);
        assert_eq!(cli.toolkit_version, Some(Version::new([5, 15, 2])));
        let Commands::Stylesheet { ref theme, corner_shape, .. } = cli.command else {
            panic!("expected stylesheet");
        };
        assert_eq!(theme.theme, Some(ThemeChoice::Auto));
        assert_eq!(corner_shape, Some(CornerShape::Sharp));
        assert_eq!(theme.colors, vec![("primary".to_owned(), "#ff0000".to_owned())]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = ["n-style", "stylesheet"];
        for extra in [
            ["--theme", "solarized"],
            ["--corner-shape", "round"],
            ["--color", "primary"],
            ["--toolkit-version", "six"],
        ] {
            let args = base.iter().chain(extra.iter());
            assert!(Cli::try_parse_from(args).is_err(), "{extra:?}");
        }
    }

    // ── Settings ──────────────────────────────────────────────────────────

    #[test]
    fn flags_override_config() {
        let config = UserConfig {
            theme: Some("light".into()),
            default_theme: Some("light".into()),
            custom_colors: Some([("background", "#000000")].into_iter().collect()),
            ..UserConfig::default()
        };
        let args = theme_args(parse(&["palette", "--theme", "dark", "--color", "primary=#123456"]));
        let settings = ThemeSettings::resolve(args, &config).unwrap();
        assert_eq!(settings.theme, ThemeChoice::Fixed(Theme::Dark));
        assert_eq!(settings.default_theme, Theme::Light);
        let mixed = settings.custom_colors.unwrap().mix(Theme::Dark).unwrap();
        assert_eq!(mixed["primary"], "#123456");
        assert_eq!(mixed["background"], "#000000");
    }

    #[test]
    fn accent_becomes_primary_for_fixed_theme() {
        let args = theme_args(parse(&["stylesheet", "--theme", "light", "--accent", "purple"]));
        let (settings, hint) = ThemeSettings::resolve(args, &UserConfig::default())
            .unwrap()
            .apply_accent()
            .unwrap();
        assert!(hint.is_none());
        let mixed = settings.custom_colors.unwrap().mix(Theme::Light).unwrap();
        assert_eq!(mixed["primary"], "#9c27b0");
    }

    #[test]
    fn accent_is_a_hint_for_auto() {
        let args = theme_args(parse(&["stylesheet", "--theme", "auto", "--accent", "green"]));
        let (settings, hint) = ThemeSettings::resolve(args, &UserConfig::default())
            .unwrap()
            .apply_accent()
            .unwrap();
        assert_eq!(hint.as_deref(), Some("green"));
        assert!(settings.custom_colors.is_none());
    }

    #[test]
    fn explicit_primary_beats_accent() {
        let args = theme_args(parse(&[
            "stylesheet",
            "--theme",
            "dark",
            "--accent",
            "red",
            "--color",
            "primary=#00ff00",
        ]));
        let (settings, _) = ThemeSettings::resolve(args, &UserConfig::default())
            .unwrap()
            .apply_accent()
            .unwrap();
        let mixed = settings.custom_colors.unwrap().mix(Theme::Dark).unwrap();
        assert_eq!(mixed["primary"], "#00ff00");
    }

    #[test]
    fn unknown_accent_is_error() {
        let args = theme_args(parse(&["stylesheet", "--accent", "teal"]));
        let err = ThemeSettings::resolve(args, &UserConfig::default())
            .unwrap()
            .apply_accent()
            .unwrap_err();
        assert!(err.to_string().contains("teal"));
    }

    // ── End to end ────────────────────────────────────────────────────────

    #[test]
    fn stylesheet_command_writes_output_file() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("style.qss");
        let cache = tmp.path().join("cache");
        let config = tmp.path().join("absent.json");
        let cli = parse(&[
            "--config",
            config.to_str().unwrap(),
            "--cache-dir",
            cache.to_str().unwrap(),
            "--toolkit-version",
            "6.5.0",
            "stylesheet",
            "--output",
            output.to_str().unwrap(),
        ]);
        run(cli).unwrap();
        let css = fs::read_to_string(&output).unwrap();
        assert!(css.contains("QWidget"));
        assert!(cache_root(&cache).join("check_primary_8ab4f7ff_0.svg").exists());
    }
}
