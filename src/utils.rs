use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Vertex {
    pub position: [f32; 3],   // x, y, z coordinates
    pub tex_coords: [f32; 2], // u, v texture coordinates
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4], // 4x4 column-major matrix
}

impl From<Mat4> for TransformUniform {
    fn from(matrix: Mat4) -> Self {
        Self {
            transform: matrix.to_cols_array_2d(),
        }
    }
}

/// Unit quad centred on the origin, facing +Z. Every cube face and the final
/// blit are drawn with this mesh and a per-draw transform.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-0.5, 0.5, 0.0],
        tex_coords: [0.0, 0.0],
    },
    Vertex {
        position: [0.5, 0.5, 0.0],
        tex_coords: [1.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        tex_coords: [0.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        tex_coords: [1.0, 1.0],
    },
];

// clockwise when seen from +Z
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Logical (CSS-pixel) size of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Square output size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    /// Side length in logical pixels.
    pub side_px: u32,
    /// Side length of the backing raster in physical pixels.
    pub physical_px: u32,
}

impl OutputSize {
    /// Fits a square into `container`, capped at `max_dimension_px`, with the
    /// backing raster scaled by `min(device_pixel_ratio, pixel_ratio_cap)`.
    pub fn fit(
        container: Size,
        max_dimension_px: u32,
        device_pixel_ratio: f32,
        pixel_ratio_cap: f32,
    ) -> Self {
        let side = container
            .width
            .min(container.height)
            .min(max_dimension_px as f32)
            .max(0.0)
            .floor() as u32;
        let ratio = effective_pixel_ratio(device_pixel_ratio, pixel_ratio_cap);
        let physical_px = ((side as f32) * ratio).round().max(1.0) as u32;
        Self {
            side_px: side,
            physical_px,
        }
    }
}

pub fn effective_pixel_ratio(device_pixel_ratio: f32, pixel_ratio_cap: f32) -> f32 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return 1.0;
    }
    device_pixel_ratio.min(pixel_ratio_cap.max(1.0))
}
