use super::matrix::{DragType, MatrixInteractorLogic};
use crate::geometry::AxisAlignedBoundingBox;
use crate::render::{Camera, Entity, Scene};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

/// Moves the model entities instead of the camera. Every entity is
/// rewritten from the transform it had when the drag started.
#[derive(Debug, Clone, Default)]
pub struct ModelInteractorLogic {
    base: MatrixInteractorLogic,
    axes: Option<Entity>,
    model: Vec<Entity>,
    is_axes_visible: bool,
    bounds_at_mouse_down: AxisAlignedBoundingBox,
    center_at_mouse_down: Vec3,
    transforms_at_mouse_down: BTreeMap<Entity, Mat4>,
}

impl ModelInteractorLogic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&self) -> &MatrixInteractorLogic {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut MatrixInteractorLogic {
        &mut self.base
    }

    /// Also recenters the rotation on the new bounds.
    pub fn set_bounding_box(&mut self, bounds: AxisAlignedBoundingBox) {
        self.base.set_bounding_box(bounds);
        self.base.set_center_of_rotation(bounds.center());
    }

    pub fn set_center_of_rotation(&mut self, center: Vec3) {
        self.base.set_center_of_rotation(center);
    }

    pub fn set_model(&mut self, axes: Option<Entity>, objects: Vec<Entity>) {
        self.axes = axes;
        self.model = objects;
    }

    pub fn model(&self) -> &[Entity] {
        &self.model
    }

    pub fn start_mouse_drag(&mut self, scene: &mut dyn Scene, camera: &Camera) {
        let center = self.base.center_of_rotation();
        self.base.set_mouse_down_info(Mat4::IDENTITY, center);
        self.base.set_field_of_view(camera.field_of_view());
        self.center_at_mouse_down = center;
        self.bounds_at_mouse_down = *self.base.bounding_box();
        self.transforms_at_mouse_down = self
            .model
            .iter()
            .map(|&entity| (entity, scene.entity_transform(entity)))
            .collect();

        if let Some(axes) = self.axes {
            self.is_axes_visible = scene.is_entity_enabled(axes);
            scene.set_entity_enabled(axes, true);
        }
    }

    pub fn end_mouse_drag(&mut self, scene: &mut dyn Scene) {
        if let Some(axes) = self.axes {
            scene.set_entity_enabled(axes, self.is_axes_visible);
        }
        self.base.end_mouse_drag();
        self.transforms_at_mouse_down.clear();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, scene: &mut dyn Scene, camera: &Camera) {
        let x_axis = -camera.left_vector();
        let y_axis = camera.up_vector();
        let axis = (x_axis * dy + y_axis * dx).normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let theta = self.base.calc_rotate_radians(dx, dy);
        self.rotate_about_center(Mat4::from_axis_angle(axis, theta), scene);
    }

    pub fn rotate_z(&mut self, dx: f32, dy: f32, scene: &mut dyn Scene, camera: &Camera) {
        let axis = camera.forward_vector();
        if axis == Vec3::ZERO {
            return;
        }
        let rad = self.base.calc_rotate_z_radians(dx, dy);
        self.rotate_about_center(Mat4::from_axis_angle(axis, rad), scene);
    }

    pub fn dolly(&mut self, dy: f32, drag_type: DragType, scene: &mut dyn Scene, camera: &Camera) {
        // Moving the model toward the eye is the same as moving the eye forward.
        let z_dist = self.base.calc_dolly_dist(dy, drag_type);
        let motion = Mat4::from_translation(-camera.forward_vector() * z_dist);
        self.apply_motion(motion, drag_type == DragType::Mouse, scene);
    }

    pub fn pan(&mut self, dx: f32, dy: f32, scene: &mut dyn Scene, camera: &Camera) {
        let world_move = -self.base.pan_vector(
            &camera.model_matrix(),
            self.center_at_mouse_down,
            dx,
            dy,
        );
        self.base
            .set_center_of_rotation(self.center_at_mouse_down + world_move);
        self.apply_motion(Mat4::from_translation(world_move), true, scene);
    }

    fn rotate_about_center(&mut self, rotation: Mat4, scene: &mut dyn Scene) {
        let center = self.base.center_of_rotation();
        let motion = Mat4::from_translation(center) * rotation * Mat4::from_translation(-center);
        self.apply_motion(motion, true, scene);
    }

    fn apply_motion(&mut self, motion: Mat4, from_snapshot: bool, scene: &mut dyn Scene) {
        let use_snapshot = from_snapshot && self.base.is_dragging();
        for &entity in &self.model {
            let start = if use_snapshot {
                self.transforms_at_mouse_down
                    .get(&entity)
                    .copied()
                    .unwrap_or_else(|| scene.entity_transform(entity))
            } else {
                scene.entity_transform(entity)
            };
            scene.set_entity_transform(entity, motion * start);
        }

        let bounds = if use_snapshot {
            self.bounds_at_mouse_down
        } else {
            *self.base.bounding_box()
        };
        self.base.set_bounding_box(bounds.transformed(&motion));
        self.base.set_matrix(motion);
    }
}

#[cfg(test)]
mod tests {
    use super::ModelInteractorLogic;
    use crate::geometry::AxisAlignedBoundingBox;
    use crate::interaction::DragType;
    use crate::render::{Camera, MemoryScene, Scene};
    use glam::{Mat4, Vec3};

    fn setup() -> (ModelInteractorLogic, MemoryScene, Camera) {
        let mut scene = MemoryScene::new();
        let a = scene.add_geometry(Mat4::IDENTITY);
        let b = scene.add_geometry(Mat4::from_translation(Vec3::X));
        let axes = scene.add_geometry(Mat4::IDENTITY);
        scene.set_entity_enabled(axes, false);

        let mut logic = ModelInteractorLogic::new();
        logic.base_mut().set_view_size(400, 400);
        logic.set_bounding_box(AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
        logic.set_model(Some(axes), vec![a, b]);

        let mut camera = Camera::new();
        camera.look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0), Vec3::Y);
        (logic, scene, camera)
    }

    #[test]
    fn drag_shows_axes_and_restores_them() {
        let (mut logic, mut scene, camera) = setup();
        let axes = crate::render::Entity(3);
        logic.start_mouse_drag(&mut scene, &camera);
        assert!(scene.is_entity_enabled(axes));
        logic.end_mouse_drag(&mut scene);
        assert!(!scene.is_entity_enabled(axes));
    }

    #[test]
    fn rotation_uses_transforms_from_drag_start() {
        let (mut logic, mut scene, camera) = setup();
        let b = logic.model()[1];
        logic.start_mouse_drag(&mut scene, &camera);
        logic.rotate(100.0, 0.0, &mut scene, &camera);
        logic.rotate(200.0, 0.0, &mut scene, &camera);
        let stepped = scene.entity_transform(b);

        let (mut fresh, mut other_scene, camera) = setup();
        fresh.start_mouse_drag(&mut other_scene, &camera);
        fresh.rotate(200.0, 0.0, &mut other_scene, &camera);
        assert!(stepped.abs_diff_eq(other_scene.entity_transform(b), 1e-5));
    }

    #[test]
    fn horizontal_drag_turns_model_with_mouse() {
        let (mut logic, mut scene, camera) = setup();
        let b = logic.model()[1];
        logic.start_mouse_drag(&mut scene, &camera);
        logic.rotate(100.0, 0.0, &mut scene, &camera);
        let p = scene.entity_transform(b).transform_point3(Vec3::ZERO);
        // The +X object swings away from the viewer when dragged right.
        assert!(p.z < 0.0);
        assert!((p.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn wheel_dolly_moves_model_toward_camera() {
        let (mut logic, mut scene, camera) = setup();
        let a = logic.model()[0];
        logic.dolly(-1.0, DragType::Wheel, &mut scene, &camera);
        let p = scene.entity_transform(a).transform_point3(Vec3::ZERO);
        assert!(p.z > 0.0);
        logic.dolly(1.0, DragType::Wheel, &mut scene, &camera);
        let p = scene.entity_transform(a).transform_point3(Vec3::ZERO);
        assert!(p.length() < 1e-4);
    }

    #[test]
    fn pan_moves_model_and_center_together() {
        let (mut logic, mut scene, camera) = setup();
        let a = logic.model()[0];
        logic.start_mouse_drag(&mut scene, &camera);
        logic.pan(40.0, 0.0, &mut scene, &camera);
        let p = scene.entity_transform(a).transform_point3(Vec3::ZERO);
        assert!(p.x > 0.0);
        assert!((logic.base().center_of_rotation() - p).length() < 1e-5);
    }
}
