//! Device-tier classification.
//!
//! The client is classified exactly once per mounted instance. Later viewport
//! changes never move an instance to another tier, so a live renderer is never
//! torn down and rebuilt mid-interaction.

use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CubeError;

/// Viewports narrower than this are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: f32 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Mobile,
    Desktop,
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceTier::Mobile => f.write_str("mobile"),
            DeviceTier::Desktop => f.write_str("desktop"),
        }
    }
}

impl FromStr for DeviceTier {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(DeviceTier::Mobile),
            "desktop" => Ok(DeviceTier::Desktop),
            other => Err(CubeError::Config(format!("unknown tier '{other}'"))),
        }
    }
}

/// Read-only view of the host environment. Every signal is optional; a probe
/// that cannot tell returns `None`.
pub trait EnvironmentProbe {
    fn viewport_width(&self) -> Option<f32>;
    fn touch_capable(&self) -> Option<bool>;
    fn device_pixel_ratio(&self) -> f32;

    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

/// Plain captured values. Hosts build one from whatever they can query;
/// tests build them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSnapshot {
    pub viewport_width: Option<f32>,
    pub touch_capable: Option<bool>,
    pub device_pixel_ratio: f32,
    pub reduced_motion: bool,
}

impl ProbeSnapshot {
    pub fn new(viewport_width: f32, touch_capable: bool) -> Self {
        Self {
            viewport_width: Some(viewport_width),
            touch_capable: Some(touch_capable),
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }

    pub fn unknown() -> Self {
        Self {
            viewport_width: None,
            touch_capable: None,
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }
}

impl EnvironmentProbe for ProbeSnapshot {
    fn viewport_width(&self) -> Option<f32> {
        self.viewport_width
    }

    fn touch_capable(&self) -> Option<bool> {
        self.touch_capable
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// Pure classification of a single probe reading.
///
/// `Desktop` requires both signals to be present and both to point at a
/// desktop client. A missing signal falls back to `Mobile`, the cheaper tier.
pub fn classify(probe: &dyn EnvironmentProbe) -> DeviceTier {
    classify_signals(probe.viewport_width(), probe.touch_capable())
}

fn classify_signals(viewport_width: Option<f32>, touch_capable: Option<bool>) -> DeviceTier {
    match (viewport_width, touch_capable) {
        (Some(width), Some(false)) if width >= MOBILE_BREAKPOINT_PX => DeviceTier::Desktop,
        _ => DeviceTier::Mobile,
    }
}

/// Classifies once and remembers the answer.
#[derive(Debug, Default)]
pub struct TierSelector {
    tier: OnceCell<DeviceTier>,
}

impl TierSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector that never consults a probe.
    pub fn forced(tier: DeviceTier) -> Self {
        let selector = Self::default();
        let _ = selector.tier.set(tier);
        selector
    }

    pub fn select(&self, probe: &dyn EnvironmentProbe) -> DeviceTier {
        *self.tier.get_or_init(|| {
            let width = probe.viewport_width();
            let touch = probe.touch_capable();
            let tier = classify_signals(width, touch);
            log::info!("classified client as {tier} (viewport {width:?}, touch {touch:?})");
            tier
        })
    }

    pub fn selected(&self) -> Option<DeviceTier> {
        self.tier.get().copied()
    }
}

/// Rendering parameters bundled per tier. Immutable for the lifetime of a
/// mounted instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderTierConfig {
    pub max_dimension_px: u32,
    pub texture_resolution_px: u32,
    /// `None` renders on every host frame.
    pub target_fps: Option<u32>,
    pub pixel_ratio_cap: f32,
    pub antialiasing: bool,
    pub rotation_period_ms: f64,
}

impl RenderTierConfig {
    pub const MOBILE: RenderTierConfig = RenderTierConfig {
        max_dimension_px: 300,
        texture_resolution_px: 128,
        target_fps: Some(30),
        pixel_ratio_cap: 1.5,
        antialiasing: false,
        rotation_period_ms: 25_000.0,
    };

    pub const DESKTOP: RenderTierConfig = RenderTierConfig {
        max_dimension_px: 400,
        texture_resolution_px: 256,
        target_fps: None,
        pixel_ratio_cap: 2.0,
        antialiasing: true,
        rotation_period_ms: 20_000.0,
    };

    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Mobile => Self::MOBILE,
            DeviceTier::Desktop => Self::DESKTOP,
        }
    }

    pub fn validate(&self) -> Result<(), CubeError> {
        if self.max_dimension_px == 0 {
            return Err(CubeError::Config("max_dimension_px must be positive".into()));
        }
        if self.texture_resolution_px < 8 {
            return Err(CubeError::Config(
                "texture_resolution_px must be at least 8".into(),
            ));
        }
        if self.target_fps == Some(0) {
            return Err(CubeError::Config(
                "target_fps must be positive; omit it to render every frame".into(),
            ));
        }
        if !(self.rotation_period_ms.is_finite() && self.rotation_period_ms > 0.0) {
            return Err(CubeError::Config(
                "rotation_period_ms must be a positive number".into(),
            ));
        }
        if !(self.pixel_ratio_cap.is_finite() && self.pixel_ratio_cap > 0.0) {
            return Err(CubeError::Config(
                "pixel_ratio_cap must be a positive number".into(),
            ));
        }
        Ok(())
    }
}
