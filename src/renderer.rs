use glam::Mat4;
use log::{debug, info, warn};
use tiny_skia::Pixmap;
use uuid::Uuid;

use crate::anim::AnimationClock;
use crate::camera::Camera;
use crate::cube::{model_matrix, CubeFace, CubeGeometry};
use crate::error::CubeError;
use crate::logo::{LogoOutcome, LogoTicket};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::texture_bake::{bake_face, bake_placeholder};
use crate::tier::RenderTierConfig;
use crate::utils::{OutputSize, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub Uuid);

/// One face as submitted to the backend.
#[derive(Debug, Clone, Copy)]
pub struct FaceDraw {
    pub face: CubeFace,
    pub material: MaterialId,
    /// Places the unit quad on its face, in cube space.
    pub transform: Mat4,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub geometry: GeometryId,
    pub view_projection: Mat4,
    pub model: Mat4,
    pub faces: &'a [FaceDraw],
}

/// GPU-side resources and the drawing surface. The renderer owns one backend
/// and is the only caller; every resource it creates is disposed exactly once.
pub trait RenderBackend {
    /// Unit quad shared by all six faces.
    fn create_geometry(&mut self) -> Result<GeometryId, CubeError>;
    fn upload_texture(&mut self, pixmap: &Pixmap) -> Result<TextureId, CubeError>;
    fn create_material(&mut self, texture: TextureId) -> Result<MaterialId, CubeError>;
    /// Points a material at another texture and marks it for re-upload.
    fn set_material_texture(&mut self, material: MaterialId, texture: TextureId);
    fn resize_output(&mut self, size: OutputSize) -> Result<(), CubeError>;
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), CubeError>;

    fn dispose_geometry(&mut self, geometry: GeometryId);
    fn dispose_texture(&mut self, texture: TextureId);
    fn dispose_material(&mut self, material: MaterialId);
    fn dispose_context(&mut self);
    fn surface_attached(&self) -> bool;
    fn detach_surface(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct Material {
    id: MaterialId,
    texture: TextureId,
}

/// What a host tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    Skipped,
    Stopped,
}

/// Display facts the renderer needs besides the tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInfo {
    pub device_pixel_ratio: f32,
    pub reduced_motion: bool,
}

impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }
}

/// Owns the scene (camera, cube, six materials), the drawing surface through
/// its backend, and the animation loop.
pub struct CubeRenderer<B: RenderBackend> {
    backend: B,
    scheduler: Box<dyn FrameScheduler>,
    config: RenderTierConfig,
    display: DisplayInfo,
    camera: Camera,
    cube: CubeGeometry,
    geometry: GeometryId,
    materials: Vec<(CubeFace, Material)>,
    draws: Vec<FaceDraw>,
    clock: AnimationClock,
    container: Size,
    output: OutputSize,
    frame: Option<FrameHandle>,
    pending_logo: Option<LogoTicket>,
    logo_applied: bool,
    alive: bool,
}

impl<B: RenderBackend> CubeRenderer<B> {
    /// Builds the scene with placeholder faces and sizes the surface. Returns
    /// without waiting for the logo; call [`CubeRenderer::start`] to run.
    pub fn new(
        container: Size,
        config: RenderTierConfig,
        display: DisplayInfo,
        mut backend: B,
        scheduler: Box<dyn FrameScheduler>,
        logo: Option<LogoTicket>,
    ) -> Result<Self, CubeError> {
        config.validate()?;
        let cube = CubeGeometry::default();
        let geometry = backend.create_geometry()?;

        let placeholder = bake_placeholder(config.texture_resolution_px)?;
        let mut materials = Vec::with_capacity(CubeFace::ALL.len());
        for face in CubeFace::ALL {
            let texture = backend.upload_texture(&placeholder)?;
            let id = backend.create_material(texture)?;
            materials.push((face, Material { id, texture }));
        }
        let draws = materials
            .iter()
            .map(|(face, material)| FaceDraw {
                face: *face,
                material: material.id,
                transform: cube.face_transform(*face),
            })
            .collect();

        let clock = if display.reduced_motion {
            AnimationClock::frozen(config.target_fps)
        } else {
            AnimationClock::new(config.rotation_period_ms, config.target_fps)
        };
        let output = OutputSize::fit(
            container,
            config.max_dimension_px,
            display.device_pixel_ratio,
            config.pixel_ratio_cap,
        );
        backend.resize_output(output)?;
        info!(
            "cube renderer ready: {}px ({}px backing), {}px textures, fps cap {:?}",
            output.side_px, output.physical_px, config.texture_resolution_px, config.target_fps
        );

        Ok(Self {
            backend,
            scheduler,
            config,
            display,
            camera: Camera::default(),
            cube,
            geometry,
            materials,
            draws,
            clock,
            container,
            output,
            frame: None,
            pending_logo: logo,
            logo_applied: false,
            alive: true,
        })
    }

    /// Requests the first frame.
    pub fn start(&mut self) {
        if self.alive && self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    /// Runs one host frame callback at `now_ms`. The next frame is requested
    /// even when this one fails, so a transient error costs one frame at most.
    pub fn tick(&mut self, now_ms: f64) -> Result<FrameOutcome, CubeError> {
        if !self.alive {
            return Ok(FrameOutcome::Stopped);
        }
        // the callback that brought us here has fired
        self.frame = None;
        let outcome = self.draw(now_ms);
        self.frame = Some(self.scheduler.request_frame());
        outcome
    }

    fn draw(&mut self, now_ms: f64) -> Result<FrameOutcome, CubeError> {
        if let Some(outcome) = self.pending_logo.as_ref().and_then(LogoTicket::try_take) {
            self.pending_logo = None;
            self.resolve_logo(outcome)?;
        }

        if !self.clock.advance(now_ms) {
            return Ok(FrameOutcome::Skipped);
        }
        let frame = Frame {
            geometry: self.geometry,
            view_projection: self.camera.view_projection(),
            model: model_matrix(self.clock.angle()),
            faces: &self.draws,
        };
        self.backend.render(&frame)?;
        Ok(FrameOutcome::Rendered)
    }

    /// Applies a finished logo load. At most one load ever changes the faces;
    /// anything arriving after [`CubeRenderer::destroy`] is ignored. The six
    /// faces swap together or not at all.
    pub fn resolve_logo(&mut self, outcome: LogoOutcome) -> Result<(), CubeError> {
        if !self.alive {
            debug!("logo resolved after teardown; ignoring");
            return Ok(());
        }
        if self.logo_applied {
            return Ok(());
        }
        self.pending_logo = None;

        let logo = match outcome {
            Ok(logo) => logo,
            Err(e) => {
                warn!("logo unavailable, keeping gradient faces: {e}");
                return Ok(());
            }
        };

        let baked = bake_face(self.config.texture_resolution_px, &logo)?;
        let mut uploaded = Vec::with_capacity(self.materials.len());
        for _ in &self.materials {
            match self.backend.upload_texture(&baked) {
                Ok(texture) => uploaded.push(texture),
                Err(e) => {
                    warn!("logo upload failed, keeping gradient faces: {e}");
                    for texture in uploaded {
                        self.backend.dispose_texture(texture);
                    }
                    return Err(e);
                }
            }
        }

        for ((_, material), texture) in self.materials.iter_mut().zip(uploaded) {
            self.backend.set_material_texture(material.id, texture);
            self.backend.dispose_texture(material.texture);
            material.texture = texture;
        }
        self.logo_applied = true;
        debug!("logo faces swapped in");
        Ok(())
    }

    /// Refits the drawing surface to `container` without touching the scene.
    pub fn resize(&mut self, container: Size) -> Result<OutputSize, CubeError> {
        if !self.alive {
            return Ok(self.output);
        }
        self.container = container;
        self.refit()
    }

    /// The display moved to a screen with another pixel ratio.
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) -> Result<OutputSize, CubeError> {
        if !self.alive {
            return Ok(self.output);
        }
        self.display.device_pixel_ratio = ratio;
        self.refit()
    }

    fn refit(&mut self) -> Result<OutputSize, CubeError> {
        let output = OutputSize::fit(
            self.container,
            self.config.max_dimension_px,
            self.display.device_pixel_ratio,
            self.config.pixel_ratio_cap,
        );
        if output != self.output {
            self.backend.resize_output(output)?;
            self.output = output;
            debug!("cube resized to {}px ({}px backing)", output.side_px, output.physical_px);
        }
        Ok(output)
    }

    /// Releases everything, once. Later calls do nothing.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;

        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.pending_logo = None;

        self.backend.dispose_geometry(self.geometry);
        for (_, material) in self.materials.drain(..) {
            self.backend.dispose_material(material.id);
            self.backend.dispose_texture(material.texture);
        }
        self.draws.clear();
        self.backend.dispose_context();
        if self.backend.surface_attached() {
            self.backend.detach_surface();
        }
        debug!("cube renderer destroyed");
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn logo_pending(&self) -> bool {
        self.pending_logo.is_some()
    }

    pub fn config(&self) -> &RenderTierConfig {
        &self.config
    }

    pub fn output_size(&self) -> OutputSize {
        self.output
    }

    pub fn angle(&self) -> f32 {
        self.clock.angle()
    }

    pub fn cube(&self) -> &CubeGeometry {
        &self.cube
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for CubeRenderer<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
