use glam::{Mat4, Quat, Vec3};

/// Camera for the ocean scene.
///
/// Position is fixed above the water; only orientation changes (from the
/// fused sensor rotation). The frustum reaches the far skybox shell.
pub struct Camera {
    /// World-space eye position (meters).
    pub position: Vec3,
    /// Fused view orientation.
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane. Large enough for the sky shell.
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(30.0, 30.0, 100.0),
            orientation: Quat::IDENTITY,
            fov_y_degrees: 55.0,
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 20000.0,
        }
    }

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation.conjugate()) * Mat4::from_translation(-self.position)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Inverse view-projection, for reconstructing per-pixel view rays.
    pub fn view_projection_inverse(&self) -> Mat4 {
        (self.projection_matrix() * self.view_matrix()).inverse()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
