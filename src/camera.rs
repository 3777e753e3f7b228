use glam::{Mat4, Vec3};

/// Fixed perspective camera looking down -Z at the cube.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    fov_y_deg: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0))
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            fov_y_deg: 30.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn get_pos(&self) -> Vec3 {
        self.position
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
