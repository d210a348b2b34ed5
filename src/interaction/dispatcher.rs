use super::interactors::{
    FlyInteractor, IblInteractor, InteractorContext, ModelRotationInteractor, MouseInteractor,
    OrbitCameraInteractor, SunInteractor,
};
use crate::geometry::AxisAlignedBoundingBox;
use crate::gui::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind, TickEvent};
use crate::render::Entity;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// What a left-drag does in the scene view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controls {
    #[default]
    RotateCamera,
    Fly,
    RotateSun,
    RotateIbl,
    RotateModel,
}

impl Controls {
    pub const ALL: [Controls; 5] = [
        Controls::RotateCamera,
        Controls::Fly,
        Controls::RotateSun,
        Controls::RotateIbl,
        Controls::RotateModel,
    ];
}

/// Owns one interactor per mode and routes events to the active one.
///
/// While orbiting the camera, a middle-button press or an ALT-only press
/// temporarily switches to sun rotation until that same button is released.
pub struct Interactors {
    rotate: OrbitCameraInteractor,
    fly: FlyInteractor,
    sun: SunInteractor,
    ibl: IblInteractor,
    model: ModelRotationInteractor,
    current: Controls,
    /// Temporary modes, each with the button whose release ends it.
    overrides: Vec<(Controls, MouseButton)>,
}

impl Interactors {
    pub fn new(min_far_plane: f32) -> Self {
        Self {
            rotate: OrbitCameraInteractor::new(min_far_plane),
            fly: FlyInteractor::new(min_far_plane),
            sun: SunInteractor::new(),
            ibl: IblInteractor::new(),
            model: ModelRotationInteractor::new(),
            current: Controls::RotateCamera,
            overrides: Vec::new(),
        }
    }

    fn interactor_mut(&mut self, mode: Controls) -> &mut dyn MouseInteractor {
        match mode {
            Controls::RotateCamera => &mut self.rotate,
            Controls::Fly => &mut self.fly,
            Controls::RotateSun => &mut self.sun,
            Controls::RotateIbl => &mut self.ibl,
            Controls::RotateModel => &mut self.model,
        }
    }

    pub fn set_view_size(&mut self, width: u32, height: u32) {
        for mode in Controls::ALL {
            self.interactor_mut(mode)
                .matrix_interactor()
                .set_view_size(width, height);
        }
    }

    pub fn set_bounding_box(&mut self, bounds: AxisAlignedBoundingBox) {
        for mode in Controls::ALL {
            self.interactor_mut(mode).set_bounding_box(bounds);
        }
    }

    pub fn set_field_of_view(&mut self, degrees: f32) {
        for mode in Controls::ALL {
            self.interactor_mut(mode)
                .matrix_interactor()
                .set_field_of_view(degrees);
        }
    }

    pub fn center_of_rotation(&self) -> Vec3 {
        self.rotate.center_of_rotation()
    }

    pub fn set_center_of_rotation(&mut self, center: Vec3) {
        self.rotate.set_center_of_rotation(center);
    }

    pub fn set_directional_light(&mut self, light: Entity, on_changed: Option<Box<dyn FnMut(Vec3)>>) {
        self.sun.set_directional_light(light, on_changed);
    }

    pub fn set_skybox_handle(&mut self, skybox: Entity, is_on: bool) {
        self.ibl.set_skybox_handle(skybox, is_on);
    }

    pub fn set_on_ibl_changed(&mut self, on_changed: Option<Box<dyn FnMut(Mat4)>>) {
        self.ibl.set_on_changed(on_changed);
    }

    pub fn set_model(&mut self, axes: Option<Entity>, objects: Vec<Entity>) {
        self.model.set_model(axes, objects);
    }

    pub fn controls(&self) -> Controls {
        self.current
    }

    pub fn set_controls(&mut self, mode: Controls) {
        if self.current == Controls::Fly && mode != Controls::Fly {
            // The key-ups will go to the new mode.
            self.fly.clear_keys();
        }
        self.current = mode;
    }

    /// The mode mouse events go to right now, override included.
    pub fn active_controls(&self) -> Controls {
        self.overrides
            .last()
            .map(|&(mode, _)| mode)
            .unwrap_or(self.current)
    }

    pub fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        if self.current == Controls::RotateCamera
            && e.kind == MouseEventKind::ButtonDown
            && (e.button == MouseButton::Middle || e.modifiers == KeyModifiers::ALT)
        {
            self.overrides.push((Controls::RotateSun, e.button));
        }

        let active = self.active_controls();
        self.interactor_mut(active).mouse(e, cx);

        if e.kind == MouseEventKind::ButtonUp
            && self.overrides.last().is_some_and(|&(_, button)| button == e.button)
        {
            self.overrides.pop();
        }
    }

    pub fn key(&mut self, e: &KeyEvent, cx: &mut InteractorContext<'_>) {
        let current = self.current;
        self.interactor_mut(current).key(e, cx);
    }

    /// Returns true when the current mode wants a redraw.
    pub fn tick(&mut self, e: &TickEvent, cx: &mut InteractorContext<'_>) -> bool {
        let current = self.current;
        self.interactor_mut(current).tick(e, cx)
    }
}
