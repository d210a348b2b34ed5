use super::matrix::MatrixInteractorLogic;
use crate::render::{Camera, Entity, Scene};
use glam::{Mat4, Vec3};

/// Rotates the direction of a directional light with a trackball drag.
#[derive(Debug, Clone, Default)]
pub struct LightDirectionInteractorLogic {
    base: MatrixInteractorLogic,
    light: Option<Entity>,
    light_dir_at_mouse_down: Vec3,
}

impl LightDirectionInteractorLogic {
    pub fn new() -> Self {
        Self {
            light_dir_at_mouse_down: Vec3::NEG_Z,
            ..Self::default()
        }
    }

    pub fn base(&self) -> &MatrixInteractorLogic {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut MatrixInteractorLogic {
        &mut self.base
    }

    pub fn set_directional_light(&mut self, light: Entity) {
        self.light = Some(light);
    }

    pub fn directional_light(&self) -> Option<Entity> {
        self.light
    }

    pub fn start_mouse_drag(&mut self, scene: &dyn Scene) {
        if let Some(light) = self.light {
            self.light_dir_at_mouse_down = scene.light_direction(light);
        }
        self.base.set_mouse_down_info(Mat4::IDENTITY, Vec3::ZERO);
    }

    pub fn end_mouse_drag(&mut self) {
        self.base.end_mouse_drag();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, camera: &Camera) {
        let up = camera.up_vector();
        let right = -camera.left_vector();
        self.base.rotate_world(-dx, -dy, up, right);
    }

    /// Direction at drag start carried through the accumulated rotation.
    pub fn current_direction(&self) -> Vec3 {
        self.base
            .matrix()
            .transform_vector3(self.light_dir_at_mouse_down)
            .normalize_or_zero()
    }
}
