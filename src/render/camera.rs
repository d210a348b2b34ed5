use glam::{Mat3, Mat4, Vec3};

pub const DEFAULT_FIELD_OF_VIEW_DEG: f32 = 60.0;
pub const DEFAULT_NEAR_PLANE: f32 = 0.1;
pub const DEFAULT_FAR_PLANE: f32 = 1000.0;

/// Eye placement and projection parameters handed to the renderer.
///
/// The model matrix maps camera-local coordinates to world space: local `-Z`
/// is forward, `+Y` is up and `+X` is right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    model_matrix: Mat4,
    field_of_view: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            model_matrix: Mat4::IDENTITY,
            field_of_view: DEFAULT_FIELD_OF_VIEW_DEG,
            aspect: 1.0,
            near: DEFAULT_NEAR_PLANE,
            far: DEFAULT_FAR_PLANE,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    pub fn set_model_matrix(&mut self, matrix: Mat4) {
        self.model_matrix = matrix;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.model_matrix.inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.field_of_view.to_radians(),
            self.aspect.max(1e-6),
            self.near,
            self.far,
        )
    }

    /// Places the eye at `eye` looking at `center`.
    pub fn look_at(&mut self, center: Vec3, eye: Vec3, up: Vec3) {
        self.model_matrix = Mat4::look_at_rh(eye, center, up).inverse();
    }

    pub fn set_projection(&mut self, field_of_view_deg: f32, aspect: f32, near: f32, far: f32) {
        self.field_of_view = field_of_view_deg;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn position(&self) -> Vec3 {
        self.model_matrix.w_axis.truncate()
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix)
    }

    pub fn forward_vector(&self) -> Vec3 {
        -self.model_matrix.z_axis.truncate().normalize_or_zero()
    }

    pub fn up_vector(&self) -> Vec3 {
        self.model_matrix.y_axis.truncate().normalize_or_zero()
    }

    pub fn left_vector(&self) -> Vec3 {
        -self.model_matrix.x_axis.truncate().normalize_or_zero()
    }
}
