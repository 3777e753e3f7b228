use std::sync::Arc;
use std::time::Instant;

use log::{error, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::config::HeroConfig;
use crate::gpu::WgpuBackend;
use crate::lifecycle::{HeroCube, MountTarget};
use crate::logo::ThreadLogoLoader;
use crate::renderer::FrameOutcome;
use crate::scheduler::RedrawScheduler;
use crate::tier::ProbeSnapshot;
use crate::utils::Size;

const TOUCH_PLATFORM: bool = cfg!(any(target_os = "android", target_os = "ios"));

/// Desktop host: one window, whose client area is the cube's container.
pub struct HeroApp {
    config: HeroConfig,
    hero: Option<HeroCube<WgpuBackend>>,
    window: Option<Arc<Window>>,
    started: Instant,
    failure: Option<anyhow::Error>,
}

impl HeroApp {
    pub fn new(config: HeroConfig) -> Self {
        Self {
            config,
            hero: None,
            window: None,
            started: Instant::now(),
            failure: None,
        }
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn container_of(window: &Window) -> Size {
        let logical: LogicalSize<f32> = window.inner_size().to_logical(window.scale_factor());
        Size::new(logical.width, logical.height)
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let container = Self::container_of(&window);
        let probe = ProbeSnapshot::new(container.width, TOUCH_PLATFORM)
            .with_pixel_ratio(window.scale_factor() as f32);
        let clear_color = self.config.clear_color();
        let backend_window = window.clone();

        let hero = HeroCube::mount(
            MountTarget { container },
            &probe,
            &self.config,
            |tier| WgpuBackend::new(backend_window, tier, clear_color),
            Box::new(RedrawScheduler::new(window.clone())),
            &ThreadLogoLoader,
        )?;
        self.hero = Some(hero);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler<()> for HeroApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.hero.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            error!("cannot mount hero cube: {e:#}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let now = self.now_ms();
        match event {
            WindowEvent::RedrawRequested => {
                let Some(hero) = self.hero.as_mut().filter(|hero| hero.is_animating()) else {
                    return;
                };
                match hero.frame(now) {
                    Ok(FrameOutcome::Rendered | FrameOutcome::Skipped) => {}
                    Ok(FrameOutcome::Stopped) => warn!("redraw after the cube stopped"),
                    Err(e) => error!("frame failed: {e}"),
                }
            }
            WindowEvent::Resized(new_size) => {
                let (Some(hero), Some(window)) = (self.hero.as_mut(), self.window.as_ref()) else {
                    return;
                };
                hero.backend_mut().configure_window(
                    new_size.width,
                    new_size.height,
                    window.scale_factor() as f32,
                );
                hero.container_resized(Self::container_of(window), now);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let (Some(hero), Some(window)) = (self.hero.as_mut(), self.window.as_ref()) else {
                    return;
                };
                let size = window.inner_size();
                hero.backend_mut()
                    .configure_window(size.width, size.height, scale_factor as f32);
                if let Err(e) = hero.scale_factor_changed(scale_factor as f32) {
                    error!("cannot refit cube for scale factor {scale_factor}: {e}");
                }
            }
            WindowEvent::CloseRequested => {
                if let Some(mut hero) = self.hero.take() {
                    hero.unmount();
                }
                event_loop.exit();
            }
            _ => (),
        }
    }
}

pub fn run_app(config: HeroConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = HeroApp::new(config);

    event_loop.run_app(&mut app)?;
    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

