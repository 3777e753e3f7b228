use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CubeError;
use crate::lifecycle::DEFAULT_DEBOUNCE_MS;
use crate::logo::LogoSource;
use crate::tier::{DeviceTier, RenderTierConfig};

pub const DEFAULT_LOGO: &str = "assets/logo.svg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hero Cube".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Per-tier replacements for the built-in presets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierOverrides {
    pub mobile: Option<RenderTierConfig>,
    pub desktop: Option<RenderTierConfig>,
}

/// Everything a host can tune. Every field has a default, so an empty JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub window: WindowConfig,
    /// Filesystem path or http(s) URL; `None` keeps the gradient faces.
    pub logo: Option<String>,
    pub debounce_ms: f64,
    /// Page colour behind the cube, `[r, g, b]`.
    pub page_color: [u8; 3],
    /// Skips classification when set.
    pub tier: Option<DeviceTier>,
    pub reduced_motion: bool,
    pub tiers: TierOverrides,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            logo: Some(DEFAULT_LOGO.to_string()),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_color: [0x0A, 0x1A, 0x2F],
            tier: None,
            reduced_motion: false,
            tiers: TierOverrides::default(),
        }
    }
}

impl HeroConfig {
    pub fn from_json(text: &str) -> Result<Self, CubeError> {
        let config: HeroConfig =
            serde_json::from_str(text).map_err(|e| CubeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CubeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), CubeError> {
        if !(self.debounce_ms.is_finite() && self.debounce_ms >= 0.0) {
            return Err(CubeError::Config(
                "debounce_ms must be a non-negative number".into(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(CubeError::Config("window size must be non-zero".into()));
        }
        for tier_config in [&self.tiers.mobile, &self.tiers.desktop].into_iter().flatten() {
            tier_config.validate()?;
        }
        Ok(())
    }

    pub fn tier_config(&self, tier: DeviceTier) -> RenderTierConfig {
        let overridden = match tier {
            DeviceTier::Mobile => self.tiers.mobile,
            DeviceTier::Desktop => self.tiers.desktop,
        };
        overridden.unwrap_or_else(|| RenderTierConfig::for_tier(tier))
    }

    pub fn logo_source(&self) -> Option<LogoSource> {
        self.logo
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(LogoSource::parse)
    }

    /// Page colour in linear space, for clearing an sRGB surface.
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.page_color.map(|c| srgb_to_linear(c as f64 / 255.0));
        wgpu::Color { r, g, b, a: 1.0 }
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
