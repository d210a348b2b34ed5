use super::matrix::{DragType, MatrixInteractorLogic};
use crate::geometry::far_plane_for;
use crate::render::Camera;
use glam::{Mat4, Vec3};

const MIN_FIELD_OF_VIEW_DEG: f32 = 5.0;
const MAX_FIELD_OF_VIEW_DEG: f32 = 90.0;

/// Moves the camera itself: orbit, pan, dolly, field-of-view zoom and the
/// eye-relative primitives fly mode is built from.
#[derive(Debug, Clone)]
pub struct CameraInteractorLogic {
    base: MatrixInteractorLogic,
    min_far_plane: f32,
    fov_at_mouse_down: f32,
}

impl CameraInteractorLogic {
    pub fn new(min_far_plane: f32) -> Self {
        Self {
            base: MatrixInteractorLogic::new(),
            min_far_plane,
            fov_at_mouse_down: crate::render::DEFAULT_FIELD_OF_VIEW_DEG,
        }
    }

    pub fn base(&self) -> &MatrixInteractorLogic {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut MatrixInteractorLogic {
        &mut self.base
    }

    pub fn center_of_rotation(&self) -> Vec3 {
        self.base.center_of_rotation()
    }

    pub fn set_center_of_rotation(&mut self, center: Vec3) {
        self.base.set_center_of_rotation(center);
    }

    pub fn start_mouse_drag(&mut self, camera: &Camera) {
        let center = self.base.center_of_rotation();
        self.base.set_mouse_down_info(camera.model_matrix(), center);
        self.base.set_field_of_view(camera.field_of_view());
        self.fov_at_mouse_down = camera.field_of_view();
    }

    /// Re-snapshots the camera so a relative gesture starts clean.
    pub fn reset_mouse_drag(&mut self, camera: &Camera) {
        self.start_mouse_drag(camera);
    }

    pub fn end_mouse_drag(&mut self) {
        self.base.end_mouse_drag();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, camera: &mut Camera) {
        self.base.rotate(dx, dy);
        camera.set_model_matrix(self.base.matrix());
    }

    pub fn rotate_z(&mut self, dx: f32, dy: f32, camera: &mut Camera) {
        self.base.rotate_z(dx, dy);
        camera.set_model_matrix(self.base.matrix());
    }

    pub fn dolly(&mut self, dy: f32, drag_type: DragType, camera: &mut Camera) {
        if drag_type != DragType::Mouse {
            // Another mode may have moved the camera since our last update.
            self.base.set_matrix(camera.model_matrix());
        }
        self.base.dolly(dy, drag_type);
        camera.set_model_matrix(self.base.matrix());
        self.update_camera_far_plane(camera);
    }

    pub fn pan(&mut self, dx: f32, dy: f32, camera: &mut Camera) {
        self.base.pan(dx, dy);
        camera.set_model_matrix(self.base.matrix());
        self.update_camera_far_plane(camera);
    }

    /// Changes the field of view instead of moving the eye.
    pub fn zoom(&mut self, dy: f32, drag_type: DragType, camera: &mut Camera) {
        let d_fov = match drag_type {
            DragType::Mouse => -dy * 0.1,
            DragType::TwoFinger => dy * 0.2,
            DragType::Wheel => dy * 2.0,
        };
        let base_fov = match drag_type {
            DragType::Mouse => self.fov_at_mouse_down,
            DragType::Wheel | DragType::TwoFinger => camera.field_of_view(),
        };
        let fov = (base_fov + d_fov).clamp(MIN_FIELD_OF_VIEW_DEG, MAX_FIELD_OF_VIEW_DEG);
        camera.set_projection(fov, camera.aspect(), camera.near(), camera.far());
        self.base.set_field_of_view(fov);
    }

    /// Turns the head: rotation about the eye, incremental from the current
    /// camera matrix.
    pub fn rotate_fly(&mut self, dx: f32, dy: f32, camera: &mut Camera) {
        let matrix = camera.model_matrix();
        let eye = camera.position();
        let rotated = self.base.trackball(matrix, eye, dx, dy, Vec3::Y, Vec3::NEG_X);
        camera.set_model_matrix(rotated);
        self.base.set_matrix(rotated);
    }

    /// Translates by `v` in camera-local coordinates.
    pub fn move_local(&mut self, v: Vec3, camera: &mut Camera) {
        let matrix = camera.model_matrix() * Mat4::from_translation(v);
        camera.set_model_matrix(matrix);
        self.base.set_matrix(matrix);
        self.update_camera_far_plane(camera);
    }

    /// Rotates by `angle` radians about the camera-local `axis`.
    pub fn rotate_local(&mut self, angle: f32, axis: Vec3, camera: &mut Camera) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let matrix = camera.model_matrix() * Mat4::from_axis_angle(axis, angle);
        camera.set_model_matrix(matrix);
        self.base.set_matrix(matrix);
    }

    pub fn update_camera_far_plane(&self, camera: &mut Camera) {
        let far = far_plane_for(self.base.bounding_box(), camera.position(), self.min_far_plane);
        let (width, height) = self.base.view_size();
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        camera.set_projection(camera.field_of_view(), aspect, camera.near(), far);
    }
}

#[cfg(test)]
mod tests {
    use super::CameraInteractorLogic;
    use crate::geometry::AxisAlignedBoundingBox;
    use crate::interaction::DragType;
    use crate::render::Camera;
    use glam::Vec3;

    fn setup() -> (CameraInteractorLogic, Camera) {
        let mut logic = CameraInteractorLogic::new(1.0);
        logic.base_mut().set_view_size(640, 480);
        logic
            .base_mut()
            .set_bounding_box(AxisAlignedBoundingBox::new(Vec3::splat(-2.0), Vec3::splat(2.0)));
        let mut camera = Camera::new();
        camera.look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 8.0), Vec3::Y);
        (logic, camera)
    }

    #[test]
    fn rotate_writes_camera() {
        let (mut logic, mut camera) = setup();
        logic.start_mouse_drag(&camera);
        logic.rotate(60.0, 0.0, &mut camera);
        assert!((camera.position().length() - 8.0).abs() < 1e-3);
        assert!(camera.position().x < 0.0);
        logic.end_mouse_drag();
        assert!(!logic.base().is_dragging());
    }

    #[test]
    fn zoom_clamps_field_of_view() {
        let (mut logic, mut camera) = setup();
        for _ in 0..100 {
            logic.zoom(10.0, DragType::Wheel, &mut camera);
        }
        assert_eq!(camera.field_of_view(), 90.0);
        for _ in 0..100 {
            logic.zoom(-10.0, DragType::Wheel, &mut camera);
        }
        assert_eq!(camera.field_of_view(), 5.0);
    }

    #[test]
    fn mouse_zoom_is_relative_to_drag_start() {
        let (mut logic, mut camera) = setup();
        logic.start_mouse_drag(&camera);
        logic.zoom(50.0, DragType::Mouse, &mut camera);
        logic.zoom(100.0, DragType::Mouse, &mut camera);
        assert!((camera.field_of_view() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn wheel_dolly_starts_from_current_camera() {
        let (mut logic, mut camera) = setup();
        camera.look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0), Vec3::Y);
        logic.dolly(1.0, DragType::Wheel, &mut camera);
        let step = 0.1 * logic.base().model_size();
        assert!((camera.position().z - (20.0 + step)).abs() < 1e-3);
        assert!(camera.far() >= 20.0);
    }

    #[test]
    fn fly_rotation_keeps_eye_in_place() {
        let (mut logic, mut camera) = setup();
        let eye = camera.position();
        logic.rotate_fly(30.0, 12.0, &mut camera);
        assert!((camera.position() - eye).length() < 1e-4);
        assert!((camera.forward_vector() - Vec3::NEG_Z).length() > 1e-3);
    }

    #[test]
    fn move_local_follows_camera_axes() {
        let (mut logic, mut camera) = setup();
        logic.move_local(Vec3::new(0.0, 0.0, -1.0), &mut camera);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 7.0)).length() < 1e-5);
        logic.rotate_local(std::f32::consts::FRAC_PI_2, Vec3::Y, &mut camera);
        logic.move_local(Vec3::new(0.0, 0.0, -1.0), &mut camera);
        assert!((camera.position() - Vec3::new(-1.0, 0.0, 7.0)).length() < 1e-4);
    }
}
