use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec3};

/// Edge length of the cube in world units.
pub const CUBE_EDGE: f32 = 1.5;

/// Tilt applied around the spinning cube so a vertex, not a face, points at
/// the viewer.
pub const TILT_X_DEG: f32 = -35.0;
pub const TILT_Z_DEG: f32 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Front,
    Back,
    Right,
    Left,
    Top,
    Bottom,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    /// Position in [`CubeFace::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::Front => Vec3::Z,
            CubeFace::Back => Vec3::NEG_Z,
            CubeFace::Right => Vec3::X,
            CubeFace::Left => Vec3::NEG_X,
            CubeFace::Top => Vec3::Y,
            CubeFace::Bottom => Vec3::NEG_Y,
        }
    }

    /// Rotation taking the quad's +Z normal onto this face's outward normal.
    pub fn orientation(self) -> Quat {
        match self {
            CubeFace::Front => Quat::IDENTITY,
            CubeFace::Back => Quat::from_rotation_y(PI),
            CubeFace::Right => Quat::from_rotation_y(FRAC_PI_2),
            CubeFace::Left => Quat::from_rotation_y(-FRAC_PI_2),
            CubeFace::Top => Quat::from_rotation_x(-FRAC_PI_2),
            CubeFace::Bottom => Quat::from_rotation_x(FRAC_PI_2),
        }
    }

    /// Places the unit quad on this face of a cube with the given half extent.
    pub fn transform(self, half_extent: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(half_extent * 2.0, half_extent * 2.0, 1.0),
            self.orientation(),
            self.normal() * half_extent,
        )
    }
}

/// Face placement, computed once per cube.
#[derive(Debug, Clone)]
pub struct CubeGeometry {
    half_extent: f32,
    faces: [(CubeFace, Mat4); 6],
}

impl CubeGeometry {
    pub fn new(edge: f32) -> Self {
        let half_extent = edge / 2.0;
        Self {
            half_extent,
            faces: CubeFace::ALL.map(|face| (face, face.transform(half_extent))),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn faces(&self) -> &[(CubeFace, Mat4); 6] {
        &self.faces
    }

    pub fn face_transform(&self, face: CubeFace) -> Mat4 {
        self.faces[face.index()].1
    }
}

impl Default for CubeGeometry {
    fn default() -> Self {
        Self::new(CUBE_EDGE)
    }
}

pub fn tilt() -> Mat4 {
    Mat4::from_rotation_x(TILT_X_DEG.to_radians()) * Mat4::from_rotation_z(TILT_Z_DEG.to_radians())
}

/// Model matrix for a spin of `angle` radians about the cube's own Y axis.
pub fn model_matrix(angle: f32) -> Mat4 {
    tilt() * Mat4::from_rotation_y(angle)
}
