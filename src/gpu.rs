use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use pollster::block_on;
use tiny_skia::Pixmap;
use uuid::Uuid;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::CubeError;
use crate::renderer::{Frame, GeometryId, MaterialId, RenderBackend, TextureId};
use crate::tier::RenderTierConfig;
use crate::utils::{OutputSize, TransformUniform, Vertex, QUAD_INDICES, QUAD_VERTICES};

const MSAA_SAMPLES: u32 = 4;

struct QuadGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl QuadGeometry {
    fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: QUAD_INDICES.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

struct FaceTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    texture: Uuid,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    texture_bind_group: Option<wgpu::BindGroup>,
    needs_update: bool,
}

/// Offscreen square the cube is drawn into, then composited onto the window.
struct Canvas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    bind_group: wgpu::BindGroup,
}

impl Canvas {
    fn destroy(&self) {
        self.texture.destroy();
        if let Some((msaa, _)) = &self.msaa {
            msaa.destroy();
        }
    }
}

/// Pipelines, layouts and the sampler: the rendering context proper.
struct GpuContext {
    texture_bind_group_layout: wgpu::BindGroupLayout,
    transform_bind_group_layout: wgpu::BindGroupLayout,
    face_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    blit_geometry: QuadGeometry,
    blit_transform_buffer: wgpu::Buffer,
    blit_transform_bind_group: wgpu::BindGroup,
}

impl GpuContext {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let transform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("transform_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<TransformUniform>() as _,
                        ),
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/cube.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&texture_bind_group_layout, &transform_bind_group_layout],
            push_constant_ranges: &[],
        });

        // faces are convex and outward-facing, so culling back faces is enough
        // to get the ordering right without a depth buffer
        let face_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            sample_count,
            Some(wgpu::Face::Back),
            "face-pipeline",
        );
        let blit_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            1,
            None,
            "blit-pipeline",
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let blit_transform_buffer = create_transform_buffer(device, Mat4::IDENTITY);
        let blit_transform_bind_group = create_transform_bind_group(
            device,
            &blit_transform_buffer,
            &transform_bind_group_layout,
        );

        Self {
            texture_bind_group_layout,
            transform_bind_group_layout,
            face_pipeline,
            blit_pipeline,
            sampler,
            blit_geometry: QuadGeometry::new(device),
            blit_transform_buffer,
            blit_transform_bind_group,
        }
    }

    fn destroy(&self) {
        self.blit_geometry.destroy();
        self.blit_transform_buffer.destroy();
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    sample_count: u32,
    cull_mode: Option<wgpu::Face>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            front_face: wgpu::FrontFace::Cw,
            cull_mode,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}

fn create_transform_buffer(device: &wgpu::Device, matrix: Mat4) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Transform Uniform Buffer"),
        contents: bytemuck::bytes_of(&TransformUniform::from(matrix)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_transform_bind_group(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("Transform Bind Group"),
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("texture_bind_group"),
    })
}

/// Copies pixmap rows into a buffer whose row stride meets wgpu's copy
/// alignment. Returns the buffer and the padded stride.
fn padded_rows(pixmap: &Pixmap) -> (Vec<u8>, u32) {
    let bytes_per_pixel = 4;
    let unpadded_bytes_per_row = pixmap.width() as usize * bytes_per_pixel;
    let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(alignment) * alignment;

    let mut padded = vec![0u8; padded_bytes_per_row * pixmap.height() as usize];
    for y in 0..pixmap.height() as usize {
        let dst_start = y * padded_bytes_per_row;
        let src_start = y * unpadded_bytes_per_row;
        padded[dst_start..dst_start + unpadded_bytes_per_row]
            .copy_from_slice(&pixmap.data()[src_start..src_start + unpadded_bytes_per_row]);
    }
    (padded, padded_bytes_per_row as u32)
}

/// wgpu implementation of [`RenderBackend`], presenting into a winit window.
pub struct WgpuBackend {
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    scale_factor: f32,
    sample_count: u32,
    clear_color: wgpu::Color,
    context: Option<GpuContext>,
    geometries: HashMap<Uuid, QuadGeometry>,
    textures: HashMap<Uuid, FaceTexture>,
    materials: HashMap<Uuid, GpuMaterial>,
    canvas: Option<Canvas>,
    output: Option<OutputSize>,
}

impl WgpuBackend {
    pub fn new(
        window: Arc<Window>,
        tier: &RenderTierConfig,
        clear_color: wgpu::Color,
    ) -> Result<Self, CubeError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| CubeError::Gpu(format!("cannot create surface: {e}")))?;

        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or_else(|| CubeError::Gpu("no adapter can present to this window".into()))?;

        let (device, queue) = block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hero-cube-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| CubeError::Gpu(format!("cannot create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| CubeError::Gpu("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let sample_count = if tier.antialiasing {
            let flags = adapter.get_texture_format_features(format).flags;
            if flags.sample_count_supported(MSAA_SAMPLES) {
                MSAA_SAMPLES
            } else {
                warn!("{MSAA_SAMPLES}x MSAA unsupported for {format:?}; rendering aliased");
                1
            }
        } else {
            1
        };

        let context = GpuContext::new(&device, format, sample_count);
        info!(
            "wgpu backend on {} ({:?}), format {format:?}, {sample_count} sample(s)",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self {
            surface: Some(surface),
            device,
            queue,
            surface_config,
            scale_factor: window.scale_factor() as f32,
            sample_count,
            clear_color,
            context: Some(context),
            geometries: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            canvas: None,
            output: None,
        })
    }

    /// Follows the window's own size; the cube's canvas is resized separately.
    pub fn configure_window(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.scale_factor = scale_factor;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
    }

    fn create_canvas(&self, context: &GpuContext, side: u32) -> Canvas {
        let extent = wgpu::Extent3d {
            width: side,
            height: side,
            depth_or_array_layers: 1,
        };
        let format = self.surface_config.format;
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cube-canvas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let msaa = (self.sample_count > 1).then(|| {
            let msaa = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("cube-canvas-msaa"),
                size: extent,
                mip_level_count: 1,
                sample_count: self.sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let msaa_view = msaa.create_view(&wgpu::TextureViewDescriptor::default());
            (msaa, msaa_view)
        });
        let bind_group = create_texture_bind_group(
            &self.device,
            &view,
            &context.sampler,
            &context.texture_bind_group_layout,
        );
        Canvas {
            texture,
            view,
            msaa,
            bind_group,
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn create_geometry(&mut self) -> Result<GeometryId, CubeError> {
        let key = Uuid::new_v4();
        self.geometries.insert(key, QuadGeometry::new(&self.device));
        Ok(GeometryId(key))
    }

    fn upload_texture(&mut self, pixmap: &Pixmap) -> Result<TextureId, CubeError> {
        let size = wgpu::Extent3d {
            width: pixmap.width(),
            height: pixmap.height(),
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Face Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[wgpu::TextureFormat::Rgba8UnormSrgb],
        });

        let (padded, padded_bytes_per_row) = padded_rows(pixmap);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Face Pixel Buffer"),
                contents: &padded,
                usage: wgpu::BufferUsages::COPY_SRC,
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Texture Copy Encoder"),
            });
        encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(pixmap.height()),
                },
            },
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            size,
        );
        self.queue.submit(std::iter::once(encoder.finish()));
        buffer.destroy();

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let key = Uuid::new_v4();
        self.textures.insert(key, FaceTexture { texture, view });
        Ok(TextureId(key))
    }

    fn create_material(&mut self, texture: TextureId) -> Result<MaterialId, CubeError> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| CubeError::Gpu("rendering context already disposed".into()))?;
        let face = self
            .textures
            .get(&texture.0)
            .ok_or_else(|| CubeError::Gpu(format!("unknown texture {}", texture.0)))?;

        let transform_buffer = create_transform_buffer(&self.device, Mat4::IDENTITY);
        let transform_bind_group = create_transform_bind_group(
            &self.device,
            &transform_buffer,
            &context.transform_bind_group_layout,
        );
        let texture_bind_group = create_texture_bind_group(
            &self.device,
            &face.view,
            &context.sampler,
            &context.texture_bind_group_layout,
        );

        let key = Uuid::new_v4();
        self.materials.insert(
            key,
            GpuMaterial {
                texture: texture.0,
                transform_buffer,
                transform_bind_group,
                texture_bind_group: Some(texture_bind_group),
                needs_update: false,
            },
        );
        Ok(MaterialId(key))
    }

    fn set_material_texture(&mut self, material: MaterialId, texture: TextureId) {
        if let Some(material) = self.materials.get_mut(&material.0) {
            material.texture = texture.0;
            material.needs_update = true;
        }
    }

    fn resize_output(&mut self, size: OutputSize) -> Result<(), CubeError> {
        let Some(context) = self.context.as_ref() else {
            return Ok(());
        };
        let max_side = self.device.limits().max_texture_dimension_2d;
        let side = size.physical_px.clamp(1, max_side);
        let canvas = self.create_canvas(context, side);
        if let Some(old) = self.canvas.replace(canvas) {
            old.destroy();
        }
        self.output = Some(size);
        debug!("canvas now {side}x{side}");
        Ok(())
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), CubeError> {
        let (Some(context), Some(surface), Some(canvas), Some(output)) = (
            self.context.as_ref(),
            self.surface.as_ref(),
            self.canvas.as_ref(),
            self.output,
        ) else {
            return Ok(());
        };
        let Some(geometry) = self.geometries.get(&frame.geometry.0) else {
            return Ok(());
        };

        for draw in frame.faces {
            let Some(material) = self.materials.get_mut(&draw.material.0) else {
                continue;
            };
            if material.needs_update {
                if let Some(face) = self.textures.get(&material.texture) {
                    material.texture_bind_group = Some(create_texture_bind_group(
                        &self.device,
                        &face.view,
                        &context.sampler,
                        &context.texture_bind_group_layout,
                    ));
                    material.needs_update = false;
                }
            }
            let mvp = frame.view_projection * frame.model * draw.transform;
            self.queue.write_buffer(
                &material.transform_buffer,
                0,
                bytemuck::bytes_of(&TransformUniform::from(mvp)),
            );
        }

        // centre the canvas on the window at its logical size
        let on_screen = output.side_px as f32 * self.scale_factor;
        let blit = Mat4::from_scale(Vec3::new(
            2.0 * on_screen / self.surface_config.width as f32,
            2.0 * on_screen / self.surface_config.height as f32,
            1.0,
        ));
        self.queue.write_buffer(
            &context.blit_transform_buffer,
            0,
            bytemuck::bytes_of(&TransformUniform::from(blit)),
        );

        let surface_texture = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost; reconfiguring and skipping this frame");
                surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface timed out; skipping this frame");
                return Ok(());
            }
            Err(e) => return Err(CubeError::Gpu(e.to_string())),
        };
        let screen_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (target, resolve_target) = match &canvas.msaa {
                Some((_, msaa_view)) => (msaa_view, Some(&canvas.view)),
                None => (&canvas.view, None),
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&context.face_pipeline);
            rpass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            rpass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            for draw in frame.faces {
                let Some(material) = self.materials.get(&draw.material.0) else {
                    continue;
                };
                let Some(texture_bind_group) = material.texture_bind_group.as_ref() else {
                    continue;
                };
                rpass.set_bind_group(0, texture_bind_group, &[]);
                rpass.set_bind_group(1, &material.transform_bind_group, &[]);
                rpass.draw_indexed(0..geometry.num_indices, 0, 0..1);
            }
        }

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &screen_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&context.blit_pipeline);
            rpass.set_bind_group(0, &canvas.bind_group, &[]);
            rpass.set_bind_group(1, &context.blit_transform_bind_group, &[]);
            rpass.set_vertex_buffer(0, context.blit_geometry.vertex_buffer.slice(..));
            rpass.set_index_buffer(
                context.blit_geometry.index_buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            rpass.draw_indexed(0..context.blit_geometry.num_indices, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn dispose_geometry(&mut self, geometry: GeometryId) {
        if let Some(geometry) = self.geometries.remove(&geometry.0) {
            geometry.destroy();
        }
    }

    fn dispose_texture(&mut self, texture: TextureId) {
        if let Some(face) = self.textures.remove(&texture.0) {
            face.texture.destroy();
        }
    }

    fn dispose_material(&mut self, material: MaterialId) {
        if let Some(material) = self.materials.remove(&material.0) {
            material.transform_buffer.destroy();
        }
    }

    fn dispose_context(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            canvas.destroy();
        }
        if let Some(context) = self.context.take() {
            context.destroy();
        }
        for (_, geometry) in self.geometries.drain() {
            geometry.destroy();
        }
        for (_, face) in self.textures.drain() {
            face.texture.destroy();
        }
        for (_, material) in self.materials.drain() {
            material.transform_buffer.destroy();
        }
        self.output = None;
    }

    fn surface_attached(&self) -> bool {
        self.surface.is_some()
    }

    fn detach_surface(&mut self) {
        self.surface = None;
    }
}
