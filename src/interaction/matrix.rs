//! Shared transform math for every interaction mode.
//!
//! All gesture operations are evaluated against the snapshot captured when
//! the drag started, never incrementally, so one gesture does not accumulate
//! rounding error and a re-snapshot mid-drag starts from a clean matrix.

use crate::geometry::AxisAlignedBoundingBox;
use crate::render::DEFAULT_FIELD_OF_VIEW_DEG;
use glam::{Mat3, Mat4, Quat, Vec3};
use std::f32::consts::PI;

const MIN_PAN_DISTANCE_FRACTION: f32 = 0.02;

/// Input source of a dolly/zoom, each with its own distance scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragType {
    /// Button held and dragged; relative to the drag snapshot.
    Mouse,
    /// Notched mouse wheel; relative to the current matrix.
    Wheel,
    /// Trackpad two-finger scroll; relative to the current matrix.
    TwoFinger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSnapshot {
    matrix: Mat4,
    center_of_rotation: Vec3,
}

#[derive(Debug, Clone)]
pub struct MatrixInteractorLogic {
    view_width: u32,
    view_height: u32,
    model_size: f32,
    model_bounds: AxisAlignedBoundingBox,
    field_of_view: f32,
    matrix: Mat4,
    center_of_rotation: Vec3,
    drag: Option<DragSnapshot>,
}

impl Default for MatrixInteractorLogic {
    fn default() -> Self {
        Self {
            view_width: 1,
            view_height: 1,
            model_size: 0.0,
            model_bounds: AxisAlignedBoundingBox::default(),
            field_of_view: DEFAULT_FIELD_OF_VIEW_DEG,
            matrix: Mat4::IDENTITY,
            center_of_rotation: Vec3::ZERO,
            drag: None,
        }
    }
}

impl MatrixInteractorLogic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view_size(&mut self, width: u32, height: u32) {
        self.view_width = width;
        self.view_height = height;
    }

    pub fn view_size(&self) -> (u32, u32) {
        (self.view_width, self.view_height)
    }

    pub fn set_bounding_box(&mut self, bounds: AxisAlignedBoundingBox) {
        self.model_size = bounds.diagonal();
        self.model_bounds = bounds;
    }

    pub fn bounding_box(&self) -> &AxisAlignedBoundingBox {
        &self.model_bounds
    }

    pub fn model_size(&self) -> f32 {
        self.model_size
    }

    /// Vertical field of view in degrees, used to scale panning.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees;
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    pub fn center_of_rotation(&self) -> Vec3 {
        self.center_of_rotation
    }

    pub fn set_center_of_rotation(&mut self, center: Vec3) {
        self.center_of_rotation = center;
        if let Some(drag) = &mut self.drag {
            drag.center_of_rotation = center;
        }
    }

    /// Starts a drag session from `matrix` around `center`.
    pub fn set_mouse_down_info(&mut self, matrix: Mat4, center: Vec3) {
        self.matrix = matrix;
        self.center_of_rotation = center;
        self.drag = Some(DragSnapshot {
            matrix,
            center_of_rotation: center,
        });
    }

    pub fn end_mouse_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn matrix_at_mouse_down(&self) -> Mat4 {
        self.snapshot().matrix
    }

    fn snapshot(&self) -> DragSnapshot {
        self.drag.unwrap_or(DragSnapshot {
            matrix: self.matrix,
            center_of_rotation: self.center_of_rotation,
        })
    }

    fn height(&self) -> f32 {
        self.view_height.max(1) as f32
    }

    /// Dragging half the view height rotates by 90 degrees.
    pub fn calc_rotate_radians(&self, dx: f32, dy: f32) -> f32 {
        let moved = (dx * dx + dy * dy).sqrt();
        0.5 * PI * moved / (0.5 * self.height())
    }

    /// Dragging half the view height rolls one full turn.
    pub fn calc_rotate_z_radians(&self, _dx: f32, dy: f32) -> f32 {
        4.0 * PI * dy / self.height()
    }

    pub fn calc_dolly_dist(&self, dy: f32, drag_type: DragType) -> f32 {
        match drag_type {
            // Dragging up (negative dy) pushes away.
            DragType::Mouse => dy * 0.0025 * self.model_size,
            // Scrolling up is positive, so invert.
            DragType::TwoFinger => -dy * 0.01 * self.model_size,
            DragType::Wheel => -dy * 0.1 * self.model_size,
        }
    }

    /// Trackball rotation of `matrix` about `pivot`. The axis is built from
    /// the drag direction in the `x_axis`/`y_axis` basis (screen-up is
    /// positive) and converted to world space by the matrix rotation.
    pub fn trackball(&self, matrix: Mat4, pivot: Vec3, dx: f32, dy: f32, x_axis: Vec3, y_axis: Vec3) -> Mat4 {
        let dy = -dy;
        let axis = (x_axis * dx + y_axis * dy).normalize_or_zero();
        if axis == Vec3::ZERO {
            return matrix;
        }
        let theta = self.calc_rotate_radians(dx, dy);
        let rotation = Mat3::from_mat4(matrix);
        let axis_world = (rotation * axis).normalize_or_zero();
        if axis_world == Vec3::ZERO {
            return matrix;
        }
        let turn = Mat3::from_quat(Quat::from_axis_angle(axis_world, -theta));
        let dist = (pivot - matrix.w_axis.truncate()).length();
        Mat4::from_translation(pivot)
            * Mat4::from_mat3(turn * rotation)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, dist))
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        // Axis perpendicular to the drag: (-dy, dx) in screen space.
        let snapshot = self.snapshot();
        self.matrix = self.trackball(
            snapshot.matrix,
            self.center_of_rotation,
            dx,
            dy,
            Vec3::Y,
            Vec3::NEG_X,
        );
    }

    pub fn rotate_world(&mut self, dx: f32, dy: f32, x_axis: Vec3, y_axis: Vec3) {
        let snapshot = self.snapshot();
        self.matrix = self.trackball(snapshot.matrix, self.center_of_rotation, dx, dy, x_axis, y_axis);
    }

    /// Roll about the local view axis.
    pub fn rotate_z(&mut self, dx: f32, dy: f32) {
        let rad = self.calc_rotate_z_radians(dx, dy);
        self.matrix = self.snapshot().matrix * Mat4::from_axis_angle(Vec3::Z, rad);
    }

    /// Roll about a world axis through the center of rotation.
    pub fn rotate_z_world(&mut self, dx: f32, dy: f32, forward: Vec3) {
        let axis = forward.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let rad = self.calc_rotate_z_radians(dx, dy);
        let center = self.center_of_rotation;
        self.matrix = Mat4::from_translation(center)
            * Mat4::from_axis_angle(axis, rad)
            * Mat4::from_translation(-center)
            * self.snapshot().matrix;
    }

    pub fn dolly(&mut self, dy: f32, drag_type: DragType) {
        let dist = self.calc_dolly_dist(dy, drag_type);
        let base = match drag_type {
            DragType::Mouse => self.snapshot().matrix,
            DragType::Wheel | DragType::TwoFinger => self.matrix,
        };
        self.dolly_from(dist, base);
    }

    /// Moves `matrix` forward (local -Z) by `z_dist`.
    pub fn dolly_from(&mut self, z_dist: f32, matrix: Mat4) {
        self.matrix = matrix * Mat4::from_translation(Vec3::new(0.0, 0.0, -z_dist));
    }

    /// Moves the eye parallel to the view plane; the center of rotation moves
    /// with it so the point under the cursor stays under the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let snapshot = self.snapshot();
        let world_move = self.calc_pan_vector_world(dx, dy);
        self.center_of_rotation = snapshot.center_of_rotation + world_move;
        self.matrix = Mat4::from_translation(world_move) * snapshot.matrix;
    }

    pub fn calc_pan_vector_world(&self, dx: f32, dy: f32) -> Vec3 {
        let snapshot = self.snapshot();
        self.pan_vector(&snapshot.matrix, snapshot.center_of_rotation, dx, dy)
    }

    /// World-space eye motion for a pan of (`dx`, `dy`) pixels, as seen from
    /// `camera_matrix` with `pivot` on the focal plane.
    pub fn pan_vector(&self, camera_matrix: &Mat4, pivot: Vec3, dx: f32, dy: f32) -> Vec3 {
        let eye = camera_matrix.w_axis.truncate();
        let dist = (pivot - eye)
            .length()
            .max(MIN_PAN_DISTANCE_FRACTION * self.model_size);
        let half_fov = 0.5 * self.field_of_view.to_radians();
        let units_per_px = 2.0 * dist * half_fov.tan() / self.height();
        // The model follows the mouse, so the eye moves the other way.
        let local = Vec3::new(-dx * units_per_px, dy * units_per_px, 0.0);
        Mat3::from_mat4(*camera_matrix) * local
    }
}

#[cfg(test)]
mod tests {
    use super::{DragType, MatrixInteractorLogic};
    use crate::geometry::AxisAlignedBoundingBox;
    use glam::{Mat4, Vec3};

    fn looking_at_origin() -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y).inverse()
    }

    fn logic() -> MatrixInteractorLogic {
        let mut logic = MatrixInteractorLogic::new();
        logic.set_view_size(800, 600);
        logic.set_bounding_box(AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
        logic
    }

    fn close(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn rotate_depends_only_on_total_delta() {
        let mut stepped = logic();
        stepped.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        for step in 1..=10 {
            stepped.rotate(step as f32 * 4.0, step as f32 * -3.0);
        }

        let mut single = logic();
        single.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        single.rotate(40.0, -30.0);

        assert!(close(stepped.matrix(), single.matrix()));
    }

    #[test]
    fn rotate_keeps_distance_to_center() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.rotate(120.0, 45.0);
        let eye = logic.matrix().w_axis.truncate();
        assert!((eye.length() - 10.0).abs() < 1e-3);
        assert_ne!(eye, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn horizontal_drag_orbits_about_up_axis() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.rotate(100.0, 0.0);
        let eye = logic.matrix().w_axis.truncate();
        assert!(eye.y.abs() < 1e-4);
        assert!(eye.x < 0.0);
    }

    #[test]
    fn rotate_z_half_height_is_full_turn() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.rotate_z(0.0, 300.0);
        assert!(close(logic.matrix(), looking_at_origin()));
    }

    #[test]
    fn dolly_scale_depends_on_input_source() {
        let mut wheel = logic();
        wheel.set_matrix(looking_at_origin());
        wheel.dolly(1.0, DragType::Wheel);

        let mut trackpad = logic();
        trackpad.set_matrix(looking_at_origin());
        trackpad.dolly(1.0, DragType::TwoFinger);

        let wheel_z = wheel.matrix().w_axis.z;
        let trackpad_z = trackpad.matrix().w_axis.z;
        assert!((wheel_z - trackpad_z).abs() > 1e-3);
        assert!((wheel_z - (10.0 + 0.1 * wheel.model_size())).abs() < 1e-4);
    }

    #[test]
    fn mouse_dolly_is_relative_to_snapshot() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.dolly(-20.0, DragType::Mouse);
        logic.dolly(-40.0, DragType::Mouse);
        let expected = 10.0 + 40.0 * 0.0025 * logic.model_size();
        assert!((logic.matrix().w_axis.z - expected).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_center_with_eye() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.pan(50.0, 0.0);
        let eye = logic.matrix().w_axis.truncate();
        let center = logic.center_of_rotation();
        assert!(eye.x < 0.0);
        assert!((eye.x - center.x).abs() < 1e-5);
        assert!((eye - Vec3::new(0.0, 0.0, 10.0) - center).length() < 1e-4);
    }

    #[test]
    fn end_mouse_drag_clears_snapshot() {
        let mut logic = logic();
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        assert!(logic.is_dragging());
        logic.rotate(10.0, 0.0);
        logic.end_mouse_drag();
        assert!(!logic.is_dragging());
        assert!(close(logic.matrix_at_mouse_down(), logic.matrix()));
    }

    #[test]
    fn zero_view_height_is_tolerated() {
        let mut logic = MatrixInteractorLogic::new();
        logic.set_view_size(0, 0);
        logic.set_mouse_down_info(looking_at_origin(), Vec3::ZERO);
        logic.rotate(3.0, 4.0);
        assert!(logic.matrix().to_cols_array().iter().all(|v| v.is_finite()));
    }
}
