#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Mat4;
use hero_cube::config::HeroConfig;
use hero_cube::error::CubeError;
use hero_cube::lifecycle::{HeroCube, MountTarget};
use hero_cube::logo::{logo_channel, LogoLoader, LogoResolver, LogoSource, LogoTicket};
use hero_cube::renderer::{Frame, GeometryId, MaterialId, RenderBackend, TextureId};
use hero_cube::scheduler::ManualScheduler;
use hero_cube::texture_bake::LogoImage;
use hero_cube::tier::{ProbeSnapshot, RenderTierConfig};
use hero_cube::utils::{OutputSize, Size};
use tiny_skia::{Color, Pixmap};
use uuid::Uuid;

/// Everything a [`RecordingBackend`] saw, shared with the test body.
#[derive(Debug, Default)]
pub struct ResourceLog {
    pub geometries: Vec<GeometryId>,
    pub textures: Vec<TextureId>,
    pub materials: Vec<MaterialId>,
    pub disposals: HashMap<Uuid, usize>,
    pub material_textures: HashMap<MaterialId, TextureId>,
    pub renders: usize,
    pub last_model: Option<Mat4>,
    pub resizes: Vec<OutputSize>,
    pub context_disposals: usize,
    pub surface_attached: bool,
    pub surface_detaches: usize,
    pub tier: Option<RenderTierConfig>,
    /// The next this-many renders fail.
    pub failing_renders: usize,
    /// The next this-many output resizes fail.
    pub failing_resizes: usize,
    /// Uploads fail once this many textures exist.
    pub texture_limit: Option<usize>,
}

impl ResourceLog {
    pub fn dispose_count(&self, id: Uuid) -> usize {
        self.disposals.get(&id).copied().unwrap_or(0)
    }

    pub fn live_textures(&self) -> Vec<TextureId> {
        self.textures
            .iter()
            .copied()
            .filter(|t| self.dispose_count(t.0) == 0)
            .collect()
    }

    pub fn all_ids(&self) -> Vec<Uuid> {
        self.geometries
            .iter()
            .map(|g| g.0)
            .chain(self.textures.iter().map(|t| t.0))
            .chain(self.materials.iter().map(|m| m.0))
            .collect()
    }
}

/// Backend that draws nothing and records every call.
pub struct RecordingBackend {
    log: Rc<RefCell<ResourceLog>>,
}

impl RecordingBackend {
    pub fn new() -> (Self, Rc<RefCell<ResourceLog>>) {
        let log = Rc::new(RefCell::new(ResourceLog {
            surface_attached: true,
            ..ResourceLog::default()
        }));
        (Self { log: log.clone() }, log)
    }

    fn dispose(&mut self, id: Uuid) {
        *self.log.borrow_mut().disposals.entry(id).or_insert(0) += 1;
    }
}

impl RenderBackend for RecordingBackend {
    fn create_geometry(&mut self) -> Result<GeometryId, CubeError> {
        let id = GeometryId(Uuid::new_v4());
        self.log.borrow_mut().geometries.push(id);
        Ok(id)
    }

    fn upload_texture(&mut self, _pixmap: &Pixmap) -> Result<TextureId, CubeError> {
        let mut log = self.log.borrow_mut();
        if log.texture_limit.is_some_and(|limit| log.textures.len() >= limit) {
            return Err(CubeError::Gpu("out of texture memory".into()));
        }
        let id = TextureId(Uuid::new_v4());
        log.textures.push(id);
        Ok(id)
    }

    fn create_material(&mut self, texture: TextureId) -> Result<MaterialId, CubeError> {
        let id = MaterialId(Uuid::new_v4());
        let mut log = self.log.borrow_mut();
        log.materials.push(id);
        log.material_textures.insert(id, texture);
        Ok(id)
    }

    fn set_material_texture(&mut self, material: MaterialId, texture: TextureId) {
        self.log
            .borrow_mut()
            .material_textures
            .insert(material, texture);
    }

    fn resize_output(&mut self, size: OutputSize) -> Result<(), CubeError> {
        let mut log = self.log.borrow_mut();
        if log.failing_resizes > 0 {
            log.failing_resizes -= 1;
            return Err(CubeError::Gpu("surface busy".into()));
        }
        log.resizes.push(size);
        Ok(())
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), CubeError> {
        let mut log = self.log.borrow_mut();
        if log.failing_renders > 0 {
            log.failing_renders -= 1;
            return Err(CubeError::Gpu("device lost".into()));
        }
        log.renders += 1;
        log.last_model = Some(frame.model);
        Ok(())
    }

    fn dispose_geometry(&mut self, geometry: GeometryId) {
        self.dispose(geometry.0);
    }

    fn dispose_texture(&mut self, texture: TextureId) {
        self.dispose(texture.0);
    }

    fn dispose_material(&mut self, material: MaterialId) {
        self.dispose(material.0);
    }

    fn dispose_context(&mut self) {
        self.log.borrow_mut().context_disposals += 1;
    }

    fn surface_attached(&self) -> bool {
        self.log.borrow().surface_attached
    }

    fn detach_surface(&mut self) {
        let mut log = self.log.borrow_mut();
        log.surface_attached = false;
        log.surface_detaches += 1;
    }
}

/// Loader that never finishes on its own; the test resolves each load.
#[derive(Default)]
pub struct ManualLogoLoader {
    pending: RefCell<Vec<(LogoSource, LogoResolver)>>,
}

impl ManualLogoLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn take_resolver(&self) -> Option<LogoResolver> {
        self.pending.borrow_mut().pop().map(|(_, resolver)| resolver)
    }
}

impl LogoLoader for ManualLogoLoader {
    fn load(&self, source: &LogoSource) -> LogoTicket {
        let (resolver, ticket) = logo_channel();
        self.pending.borrow_mut().push((source.clone(), resolver));
        ticket
    }
}

/// A small opaque red logo.
pub fn red_logo() -> LogoImage {
    let mut pixmap = Pixmap::new(4, 4).expect("pixmap");
    pixmap.fill(Color::from_rgba8(255, 0, 0, 255));
    LogoImage::from_pixmap(pixmap)
}

pub fn desktop_probe() -> ProbeSnapshot {
    ProbeSnapshot::new(1440.0, false)
}

pub fn mobile_probe() -> ProbeSnapshot {
    ProbeSnapshot::new(390.0, true).with_pixel_ratio(3.0)
}

pub struct Mounted {
    pub hero: HeroCube<RecordingBackend>,
    pub log: Rc<RefCell<ResourceLog>>,
    pub scheduler: ManualScheduler,
    pub loader: ManualLogoLoader,
}

pub fn mount(probe: &ProbeSnapshot, config: &HeroConfig, container: Size) -> Mounted {
    let (backend, log) = RecordingBackend::new();
    let scheduler = ManualScheduler::new();
    let loader = ManualLogoLoader::new();
    let tier_log = log.clone();
    let hero = HeroCube::mount(
        MountTarget { container },
        probe,
        config,
        move |tier| {
            tier_log.borrow_mut().tier = Some(*tier);
            Ok(backend)
        },
        Box::new(scheduler.clone()),
        &loader,
    )
    .expect("mount");
    Mounted {
        hero,
        log,
        scheduler,
        loader,
    }
}

/// Default config with the logo pointing somewhere harmless; loads are
/// resolved by hand anyway.
pub fn test_config() -> HeroConfig {
    HeroConfig {
        logo: Some("logo.png".into()),
        ..HeroConfig::default()
    }
}
