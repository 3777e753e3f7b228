use std::io::Write;

use hero_cube::config::{HeroConfig, DEFAULT_LOGO};
use hero_cube::error::CubeError;
use hero_cube::logo::LogoSource;
use hero_cube::tier::{DeviceTier, RenderTierConfig};

#[test]
fn empty_object_is_the_default_config() {
    let config = HeroConfig::from_json("{}").unwrap();
    assert_eq!(config, HeroConfig::default());
    assert_eq!(config.logo.as_deref(), Some(DEFAULT_LOGO));
    assert_eq!(config.page_color, [0x0A, 0x1A, 0x2F]);
    assert_eq!(config.tier, None);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = HeroConfig::from_json(
        r#"{
            "window": { "title": "Landing" },
            "logo": "https://example.com/logo.svg",
            "tier": "desktop",
            "debounce_ms": 250
        }"#,
    )
    .unwrap();
    assert_eq!(config.window.title, "Landing");
    assert_eq!(config.window.width, 800);
    assert_eq!(config.tier, Some(DeviceTier::Desktop));
    assert_eq!(config.debounce_ms, 250.0);
    assert_eq!(
        config.logo_source(),
        Some(LogoSource::Url("https://example.com/logo.svg".into()))
    );
}

#[test]
fn tier_overrides_replace_presets() {
    let config = HeroConfig::from_json(
        r#"{
            "tiers": {
                "mobile": {
                    "max_dimension_px": 240,
                    "texture_resolution_px": 64,
                    "target_fps": 24,
                    "pixel_ratio_cap": 1.0,
                    "antialiasing": false,
                    "rotation_period_ms": 30000
                }
            }
        }"#,
    )
    .unwrap();
    let mobile = config.tier_config(DeviceTier::Mobile);
    assert_eq!(mobile.max_dimension_px, 240);
    assert_eq!(mobile.target_fps, Some(24));
    assert_eq!(config.tier_config(DeviceTier::Desktop), RenderTierConfig::DESKTOP);
}

#[test]
fn invalid_configs_are_rejected() {
    for text in [
        r#"{ "debounce_ms": -1 }"#,
        r#"{ "window": { "width": 0 } }"#,
        r#"{ "tier": "tablet" }"#,
        r#"{ "tiers": { "desktop": { "max_dimension_px": 0, "texture_resolution_px": 256,
             "target_fps": null, "pixel_ratio_cap": 2.0, "antialiasing": true,
             "rotation_period_ms": 20000 } } }"#,
        "not json",
    ] {
        assert!(
            matches!(HeroConfig::from_json(text), Err(CubeError::Config(_))),
            "accepted {text}"
        );
    }
}

#[test]
fn blank_logo_means_no_logo() {
    let config = HeroConfig {
        logo: Some("   ".into()),
        ..HeroConfig::default()
    };
    assert_eq!(config.logo_source(), None);
}

#[test]
fn clear_color_is_linear_page_color() {
    let config = HeroConfig {
        page_color: [255, 0, 128],
        ..HeroConfig::default()
    };
    let color = config.clear_color();
    assert!((color.r - 1.0).abs() < 1e-9);
    assert_eq!(color.g, 0.0);
    assert!((color.b - 0.2158605).abs() < 1e-4);
    assert_eq!(color.a, 1.0);
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "reduced_motion": true, "page_color": [0, 0, 0] }}"#).unwrap();

    let config = HeroConfig::load(file.path()).unwrap();
    assert!(config.reduced_motion);
    assert_eq!(config.page_color, [0, 0, 0]);

    let missing = HeroConfig::load(std::path::Path::new("/nonexistent/hero.json"));
    assert!(matches!(missing, Err(CubeError::Io(_))));
}
