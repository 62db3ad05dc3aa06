//! End-to-end rendering through the public API.

use std::collections::HashMap;
use std::fs;

use n_color::Color;
use n_theme::{
    ColorTable, CornerShape, CustomColors, Environment, Error, RenderOptions, Renderer,
    StyleLoader, StylesheetOptions, Theme, ThemeChoice, Version,
};
use pretty_assertions::assert_eq;

const TABLE: &str = r##"{
    "primary": "#8ab4f7",
    "background": { "base": "#1e1e1e", "hover": { "darken": 0.1 } }
}"##;

fn env(version: &str) -> Environment {
    Environment::new(version.parse::<Version>().unwrap(), "PySide6").with_os("linux")
}

#[test]
fn primary_and_hover_state() {
    let tmp = tempfile::tempdir().unwrap();
    let mut renderer = Renderer::new(env("6.5.0"), tmp.path());
    let table = ColorTable::from_json(TABLE).unwrap();
    let out = renderer
        .render(
            r#"{{ primary|color }} {{ background|color(state="hover") }}"#,
            &table,
            &RenderOptions::default(),
        )
        .unwrap();
    let hover = Color::from_hex("#1e1e1e").unwrap().darken(0.1);
    assert_eq!(out, format!("#8ab4f7 {hover}"));
    let base_l = Color::from_hex("#1e1e1e").unwrap().hsla().l();
    assert!((hover.hsla().l() - base_l * 0.9).abs() < 1e-12);
}

#[test]
fn env_patch_gates_on_toolkit_version() {
    let tmp = tempfile::tempdir().unwrap();
    let table = ColorTable::from_json(TABLE).unwrap();
    let template = r#"$env_patch{"version": ">=5.0.0", "value": "X"}"#;
    let mut new = Renderer::new(env("5.2.0"), tmp.path());
    let mut old = Renderer::new(env("4.9.0"), tmp.path());
    assert_eq!(new.render(template, &table, &RenderOptions::default()).unwrap(), "X");
    assert_eq!(old.render(template, &table, &RenderOptions::default()).unwrap(), "");
}

#[test]
fn merge_then_render() {
    let tmp = tempfile::tempdir().unwrap();
    let mut table = ColorTable::from_json(TABLE).unwrap();
    let overrides: CustomColors = [("primary", "#ff0000")].into_iter().collect();
    n_theme::merge(&mut table, &overrides, Theme::Dark).unwrap();
    let mut renderer = Renderer::new(env("6.5.0"), tmp.path());
    let out = renderer
        .render("{{ primary|color|palette }}", &table, &RenderOptions::default())
        .unwrap();
    assert_eq!(out, "#ffff0000");

    let bad: CustomColors = [("primary>hover", "#ff0000")].into_iter().collect();
    assert!(matches!(
        n_theme::merge(&mut table, &bad, Theme::Dark),
        Err(Error::InvalidColorId(_))
    ));
}

#[test]
fn rerender_with_same_colors_reuses_assets() {
    let tmp = tempfile::tempdir().unwrap();
    let mut loader = StyleLoader::new(env("6.5.0"), tmp.path());
    let options = StylesheetOptions {
        theme: ThemeChoice::Fixed(Theme::Light),
        corner_shape: CornerShape::Sharp,
        standard_icons: true,
        ..StylesheetOptions::default()
    };
    let first = loader.load_stylesheet(&options).unwrap();
    let written = loader.renderer().emitter().len();
    assert!(written > 0);

    // Same name means same color, so an existing file is left alone.
    let check = tmp.path().join("check_primary_1a73e8ff_0.svg");
    fs::write(&check, "marker").unwrap();

    let second = loader.load_stylesheet(&options).unwrap();
    assert_eq!(first, second);
    assert_eq!(loader.renderer().emitter().len(), written);
    assert_eq!(fs::read_to_string(&check).unwrap(), "marker");

    let mut fresh = StyleLoader::new(env("6.5.0"), tmp.path());
    assert_eq!(fresh.load_stylesheet(&options).unwrap(), first);
    assert_eq!(fs::read_to_string(&check).unwrap(), "marker");
}

/// Paths inside every `url(...)` of `css`.
fn url_paths(css: &str) -> Vec<&str> {
    let mut paths = Vec::new();
    let mut rest = css;
    while let Some(start) = rest.find("url(") {
        let after = &rest[start + 4..];
        let end = after.find(')').unwrap();
        paths.push(&after[..end]);
        rest = &after[end..];
    }
    paths
}

#[test]
fn same_id_in_new_color_gets_its_own_asset() {
    let tmp = tempfile::tempdir().unwrap();
    let mut renderer = Renderer::new(env("6.5.0"), tmp.path());
    let template = r#"$url{"icon": "check", "id": "primary"}"#;
    let mut table = ColorTable::from_json(TABLE).unwrap();
    let blue = renderer.render(template, &table, &RenderOptions::default()).unwrap();

    let red: CustomColors = [("primary", "#ff0000")].into_iter().collect();
    n_theme::merge(&mut table, &red, Theme::Dark).unwrap();
    let red = renderer.render(template, &table, &RenderOptions::default()).unwrap();

    assert_ne!(blue, red);
    let blue_svg = fs::read_to_string(url_paths(&blue)[0]).unwrap();
    let red_svg = fs::read_to_string(url_paths(&red)[0]).unwrap();
    assert!(blue_svg.contains("rgb(138, 180, 247)"));
    assert!(red_svg.contains("rgb(255, 0, 0)"));
}

#[test]
fn theme_switch_on_shared_cache_uses_each_themes_colors() {
    let tmp = tempfile::tempdir().unwrap();
    let render = |theme: Theme| {
        StyleLoader::new(env("6.5.0"), tmp.path())
            .load_stylesheet(&StylesheetOptions {
                theme: theme.into(),
                ..StylesheetOptions::default()
            })
            .unwrap()
    };
    let dark = render(Theme::Dark);
    let light = render(Theme::Light);

    let check = |css: &str| {
        let path = url_paths(css)
            .into_iter()
            .find(|path| path.contains("check_primary_"))
            .unwrap()
            .to_owned();
        fs::read_to_string(path).unwrap()
    };
    assert!(check(&dark).contains("rgb(138, 180, 247)"));
    assert!(check(&light).contains("rgb(26, 115, 232)"));
}

#[test]
fn macos_gets_its_toolbar_spacing() {
    let tmp = tempfile::tempdir().unwrap();
    let render = |os: &str| {
        let env = Environment::new(Version::new([6, 5, 0]), "PySide6").with_os(os);
        StyleLoader::new(env, tmp.path())
            .load_stylesheet(&StylesheetOptions::default())
            .unwrap()
    };
    let mac = render("macos");
    assert!(mac.contains("QToolBar { spacing: 4px; }"));
    assert!(!mac.contains("QToolBar { spacing: 2px; }"));
    assert!(render("darwin").contains("QToolBar { spacing: 4px; }"));
    assert!(render("linux").contains("QToolBar { spacing: 2px; }"));
}

#[test]
fn every_url_in_the_stylesheet_exists_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let mut loader = StyleLoader::new(env("6.5.0"), tmp.path());
    for theme in Theme::ALL {
        let css = loader
            .load_stylesheet(&StylesheetOptions {
                theme: theme.into(),
                standard_icons: true,
                ..StylesheetOptions::default()
            })
            .unwrap();
        let paths = url_paths(&css);
        for path in &paths {
            assert!(std::path::Path::new(path).exists(), "{theme}: missing {path}");
        }
        assert!(paths.len() > 10, "{theme}: only {} urls", paths.len());
    }
}

#[test]
fn toolkit_version_changes_output() {
    let tmp = tempfile::tempdir().unwrap();
    let mut qt6 = StyleLoader::new(env("6.5.0"), tmp.path());
    let mut qt5 = StyleLoader::new(env("5.15.2"), tmp.path());
    let css6 = qt6.load_stylesheet(&StylesheetOptions::default()).unwrap();
    let css5 = qt5.load_stylesheet(&StylesheetOptions::default()).unwrap();
    assert!(css6.contains("padding: 2px 0;"));
    assert!(!css5.contains("padding: 2px 0;"));
    assert!(css5.contains("QMenu::icon { padding-left: 4px; }"));
}

#[test]
fn corner_shape_controls_radius() {
    let tmp = tempfile::tempdir().unwrap();
    let mut loader = StyleLoader::new(env("6.5.0"), tmp.path());
    let rounded = loader.load_stylesheet(&StylesheetOptions::default()).unwrap();
    let sharp = loader
        .load_stylesheet(&StylesheetOptions {
            corner_shape: CornerShape::Sharp,
            ..StylesheetOptions::default()
        })
        .unwrap();
    assert!(rounded.contains("border-radius: 4px;"));
    assert!(!sharp.contains("border-radius: 4px;"));
    assert!(sharp.contains("border-radius: 0;"));
}

#[test]
fn custom_icon_source() {
    let tmp = tempfile::tempdir().unwrap();
    let icons = HashMap::from([(
        "dot".to_owned(),
        r#"<svg viewBox="0 0 10 10"><circle fill="currentColor" cx="5" cy="5" r="2"/></svg>"#
            .to_owned(),
    )]);
    let mut renderer = Renderer::new(env("6.5.0"), tmp.path()).with_icons(icons);
    let table = ColorTable::from_json(TABLE).unwrap();
    renderer
        .render(
            r#"$url{"icon": "dot.svg", "id": "primary", "rotate": 45}"#,
            &table,
            &RenderOptions::default(),
        )
        .unwrap();
    let svg = fs::read_to_string(tmp.path().join("dot_primary_8ab4f7ff_45.svg")).unwrap();
    assert!(svg.contains(r#"transform="rotate(45, 5, 5)""#));
}
