//! A slowly turning, tilted cube for a landing page hero, tuned per device
//! tier and torn down cleanly when its host goes away.

pub mod anim;
pub mod app;
pub mod camera;
pub mod config;
pub mod cube;
pub mod error;
pub mod gpu;
pub mod lifecycle;
pub mod logo;
pub mod renderer;
pub mod scheduler;
pub mod texture_bake;
pub mod tier;
pub mod utils;

pub use app::run_app;
pub use config::HeroConfig;
pub use error::CubeError;
pub use lifecycle::{HeroCube, LifecycleState, MountTarget};
pub use renderer::{CubeRenderer, FrameOutcome, RenderBackend};
pub use tier::{DeviceTier, RenderTierConfig};
