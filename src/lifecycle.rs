use log::{debug, info, warn};

use crate::config::HeroConfig;
use crate::error::CubeError;
use crate::logo::LogoLoader;
use crate::renderer::{CubeRenderer, DisplayInfo, FrameOutcome, RenderBackend};
use crate::scheduler::FrameScheduler;
use crate::tier::{DeviceTier, EnvironmentProbe, RenderTierConfig, TierSelector};
use crate::utils::{OutputSize, Size};

pub const DEFAULT_DEBOUNCE_MS: f64 = 100.0;

/// Trailing-edge debounce driven by explicit timestamps. Each push restarts
/// the quiet window and replaces the pending value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms + self.window_ms));
    }

    /// Yields the latest value once the window has passed without a push.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now_ms => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Watches the container's box size and coalesces bursts of changes.
#[derive(Debug, Clone)]
pub struct ResizeWatcher {
    debouncer: Debouncer<Size>,
    last_seen: Option<Size>,
    connected: bool,
}

impl ResizeWatcher {
    pub fn new(initial: Size, debounce_ms: f64) -> Self {
        Self {
            debouncer: Debouncer::new(debounce_ms),
            last_seen: Some(initial),
            connected: true,
        }
    }

    pub fn observe(&mut self, size: Size, now_ms: f64) {
        if !self.connected || self.last_seen == Some(size) {
            return;
        }
        self.last_seen = Some(size);
        self.debouncer.push(size, now_ms);
    }

    pub fn poll(&mut self, now_ms: f64) -> Option<Size> {
        if !self.connected {
            return None;
        }
        self.debouncer.poll(now_ms)
    }

    /// Stops observing and drops any pending resize.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.debouncer.cancel();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Initializing,
    Animating,
    Disposed,
}

/// Where and how to mount the cube.
#[derive(Debug, Clone, Copy)]
pub struct MountTarget {
    pub container: Size,
}

/// The mounted component: tier chosen once, renderer, resize watcher, and
/// the teardown that ties them together.
pub struct HeroCube<B: RenderBackend> {
    state: LifecycleState,
    tier: DeviceTier,
    renderer: CubeRenderer<B>,
    watcher: ResizeWatcher,
}

impl<B: RenderBackend> HeroCube<B> {
    /// Classifies the client, builds the backend for the chosen tier, bakes
    /// placeholder faces, starts the logo load and requests the first frame.
    pub fn mount<F>(
        target: MountTarget,
        probe: &dyn EnvironmentProbe,
        settings: &HeroConfig,
        make_backend: F,
        scheduler: Box<dyn FrameScheduler>,
        loader: &dyn LogoLoader,
    ) -> Result<Self, CubeError>
    where
        F: FnOnce(&RenderTierConfig) -> Result<B, CubeError>,
    {
        let selector = match settings.tier {
            Some(tier) => TierSelector::forced(tier),
            None => TierSelector::new(),
        };
        let tier = selector.select(probe);
        let config = settings.tier_config(tier);
        let display = DisplayInfo {
            device_pixel_ratio: probe.device_pixel_ratio(),
            reduced_motion: settings.reduced_motion || probe.prefers_reduced_motion(),
        };

        let backend = make_backend(&config)?;
        let ticket = settings.logo_source().map(|source| {
            debug!("loading logo from {source}");
            loader.load(&source)
        });
        let renderer =
            CubeRenderer::new(target.container, config, display, backend, scheduler, ticket)?;
        let watcher = ResizeWatcher::new(target.container, settings.debounce_ms);

        let mut hero = Self {
            state: LifecycleState::Initializing,
            tier,
            renderer,
            watcher,
        };
        hero.renderer.start();
        hero.state = LifecycleState::Animating;
        info!("hero cube mounted as {tier}");
        Ok(hero)
    }

    /// Host frame callback: applies a settled resize, then ticks the loop.
    pub fn frame(&mut self, now_ms: f64) -> Result<FrameOutcome, CubeError> {
        if self.state == LifecycleState::Disposed {
            return Ok(FrameOutcome::Stopped);
        }
        if let Some(size) = self.watcher.poll(now_ms) {
            if let Err(e) = self.renderer.resize(size) {
                warn!(
                    "resize to {}x{} failed, keeping previous size: {e}",
                    size.width, size.height
                );
            }
        }
        self.renderer.tick(now_ms)
    }

    /// Container box changed. Never re-classifies the tier.
    pub fn container_resized(&mut self, size: Size, now_ms: f64) {
        if self.state != LifecycleState::Disposed {
            self.watcher.observe(size, now_ms);
        }
    }

    /// The host display's pixel ratio changed. Refits the surface at once.
    pub fn scale_factor_changed(&mut self, ratio: f32) -> Result<Option<OutputSize>, CubeError> {
        if self.state == LifecycleState::Disposed {
            return Ok(None);
        }
        self.renderer.set_device_pixel_ratio(ratio).map(Some)
    }

    /// Applies any debounced resize without ticking the loop.
    pub fn flush_resize(&mut self, now_ms: f64) -> Result<Option<OutputSize>, CubeError> {
        if self.state == LifecycleState::Disposed {
            return Ok(None);
        }
        match self.watcher.poll(now_ms) {
            Some(size) => self.renderer.resize(size).map(Some),
            None => Ok(None),
        }
    }

    /// Disconnects the watcher (dropping any pending resize) and destroys the
    /// renderer. Terminal.
    pub fn unmount(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.watcher.disconnect();
        self.renderer.destroy();
        self.state = LifecycleState::Disposed;
        info!("hero cube unmounted");
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == LifecycleState::Animating
    }

    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    pub fn renderer(&self) -> &CubeRenderer<B> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut CubeRenderer<B> {
        &mut self.renderer
    }

    pub fn watcher(&self) -> &ResizeWatcher {
        &self.watcher
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.renderer.backend_mut()
    }
}

impl<B: RenderBackend> Drop for HeroCube<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
