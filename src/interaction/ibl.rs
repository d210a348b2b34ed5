use super::matrix::MatrixInteractorLogic;
use crate::render::{Camera, Entity, Scene};
use glam::{Mat4, Vec3};

/// Rotates the image-based lighting. The skybox is forced on while dragging so
/// the user can see what is being turned.
#[derive(Debug, Clone, Default)]
pub struct IblRotationInteractorLogic {
    base: MatrixInteractorLogic,
    skybox: Option<Entity>,
    skybox_is_normally_on: bool,
    ibl_rotation_at_mouse_down: Mat4,
}

impl IblRotationInteractorLogic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&self) -> &MatrixInteractorLogic {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut MatrixInteractorLogic {
        &mut self.base
    }

    pub fn set_skybox_handle(&mut self, skybox: Entity, is_on: bool) {
        self.skybox = Some(skybox);
        self.skybox_is_normally_on = is_on;
    }

    pub fn start_mouse_drag(&mut self, scene: &mut dyn Scene) {
        self.ibl_rotation_at_mouse_down = scene.indirect_light_rotation();
        self.base.set_mouse_down_info(Mat4::IDENTITY, Vec3::ZERO);
        if let Some(skybox) = self.skybox {
            scene.set_skybox_enabled(skybox, true);
        }
    }

    pub fn end_mouse_drag(&mut self, scene: &mut dyn Scene) {
        if let Some(skybox) = self.skybox {
            scene.set_skybox_enabled(skybox, self.skybox_is_normally_on);
        }
        self.base.end_mouse_drag();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, camera: &Camera) {
        let up = camera.up_vector();
        let right = -camera.left_vector();
        self.base.rotate_world(-dx, -dy, up, right);
    }

    pub fn rotate_z(&mut self, dx: f32, dy: f32, camera: &Camera) {
        self.base.rotate_z_world(dx, dy, camera.forward_vector());
    }

    pub fn current_rotation(&self) -> Mat4 {
        self.base.matrix() * self.ibl_rotation_at_mouse_down
    }
}
