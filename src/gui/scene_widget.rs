//! The 3D scene view: camera, view settings, the interaction modes and the
//! render-quality throttle.
//!
//! While the user is dragging or scrolling the view renders with a single
//! sample. Once input has been quiet for [`DELAY_FOR_BEST_RENDERING_SECS`]
//! and no button is held, the next tick switches back to full quality and
//! asks for one more frame.

use super::events::{DrawResult, EventResult, KeyEvent, MouseEvent, MouseEventKind, TickEvent};
use super::Rect;
use crate::app::Clock;
use crate::geometry::{far_plane_for, AxisAlignedBoundingBox};
use crate::interaction::{Controls, InteractorContext, Interactors};
use crate::render::{Camera, Entity, Scene, TargetBuffers, View};
use glam::{Mat4, Vec3};
use std::rc::Rc;

pub const NEAR_PLANE: f32 = 0.1;
pub const MIN_FAR_PLANE: f32 = 1.0;
pub const DELAY_FOR_BEST_RENDERING_SECS: f64 = 0.2;

const FAST_SAMPLE_COUNT: u8 = 1;
const BEST_SAMPLE_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Fast,
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    PlusX,
    PlusY,
    PlusZ,
}

/// Entities that make up the displayed model. Point clouds may come with a
/// decimated "fast" twin that is shown instead while interacting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDescription {
    pub axes: Option<Entity>,
    pub point_clouds: Vec<Entity>,
    pub meshes: Vec<Entity>,
    pub fast_point_clouds: Vec<Entity>,
}

pub struct SceneWidget {
    scene: Box<dyn Scene>,
    camera: Camera,
    view: View,
    frame: Rect,
    frame_changed: bool,
    bounds: AxisAlignedBoundingBox,
    controls: Interactors,
    model: ModelDescription,
    on_camera_changed: Option<Box<dyn FnMut(&Camera)>>,
    buttons_down: u8,
    last_fast_time: f64,
    clock: Rc<dyn Clock>,
}

impl SceneWidget {
    pub fn new(scene: Box<dyn Scene>, clock: Rc<dyn Clock>) -> Self {
        Self {
            scene,
            camera: Camera::new(),
            view: View::new(),
            frame: Rect::default(),
            frame_changed: false,
            bounds: AxisAlignedBoundingBox::default(),
            controls: Interactors::new(MIN_FAR_PLANE),
            model: ModelDescription::default(),
            on_camera_changed: None,
            buttons_down: 0,
            last_fast_time: 0.0,
            clock,
        }
    }

    pub fn scene(&self) -> &dyn Scene {
        &*self.scene
    }

    pub fn scene_mut(&mut self) -> &mut dyn Scene {
        &mut *self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn bounds(&self) -> &AxisAlignedBoundingBox {
        &self.bounds
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.frame_changed = true;
        self.controls
            .set_view_size(frame.width.max(0) as u32, frame.height.max(0) as u32);
    }

    fn aspect(&self) -> f32 {
        if self.frame.height > 0 {
            self.frame.width as f32 / self.frame.height as f32
        } else {
            1.0
        }
    }

    pub fn set_background_color(&mut self, color: [f32; 3]) {
        self.view.set_clear_color(color);
    }

    pub fn set_discard_buffers(&mut self, buffers: TargetBuffers) {
        self.view.set_discard_buffers(buffers);
    }

    pub fn setup_camera(&mut self, field_of_view: f32, bounds: AxisAlignedBoundingBox, center_of_rotation: Vec3) {
        self.bounds = bounds;
        self.controls.set_bounding_box(bounds);

        self.go_to_camera_preset(CameraPreset::PlusZ);
        let far = far_plane_for(&bounds, self.camera.position(), MIN_FAR_PLANE);
        let aspect = self.aspect();
        self.camera
            .set_projection(field_of_view, aspect, NEAR_PLANE, far);
        self.controls.set_field_of_view(field_of_view);
        self.controls.set_center_of_rotation(center_of_rotation);
        log::debug!(
            "Camera set up: fov {:.1}, far {:.2}, center {:?}",
            field_of_view,
            far,
            center_of_rotation
        );
    }

    pub fn go_to_camera_preset(&mut self, preset: CameraPreset) {
        let mut max_dim = 1.25 * self.bounds.max_extent();
        if max_dim <= 0.0 {
            max_dim = 1.0;
        }
        let center = self.bounds.center();
        let (eye, up) = match preset {
            CameraPreset::PlusX => (center + Vec3::new(max_dim, 0.0, 0.0), Vec3::Y),
            CameraPreset::PlusY => (center + Vec3::new(0.0, max_dim, 0.0), Vec3::X),
            CameraPreset::PlusZ => (center + Vec3::new(0.0, 0.0, max_dim), Vec3::Y),
        };
        self.camera.look_at(center, eye, up);
        self.controls.set_center_of_rotation(center);
        self.fire_camera_changed();
    }

    pub fn view_controls(&self) -> Controls {
        self.controls.controls()
    }

    pub fn set_view_controls(&mut self, mode: Controls) {
        if mode == Controls::RotateCamera && self.controls.controls() == Controls::Fly {
            // Orbit about the point at the model's distance straight ahead.
            let eye = self.camera.position();
            let dist = (self.bounds.center() - eye).length();
            let center = eye + dist * self.camera.forward_vector();
            self.controls.set_center_of_rotation(center);
        }
        self.controls.set_controls(mode);
    }

    pub fn center_of_rotation(&self) -> Vec3 {
        self.controls.center_of_rotation()
    }

    pub fn set_camera_changed_callback<F>(&mut self, on_changed: F)
    where
        F: FnMut(&Camera) + 'static,
    {
        self.on_camera_changed = Some(Box::new(on_changed));
    }

    pub fn select_directional_light<F>(&mut self, light: Entity, on_dir_changed: F)
    where
        F: FnMut(Vec3) + 'static,
    {
        self.controls
            .set_directional_light(light, Some(Box::new(on_dir_changed)));
    }

    pub fn set_on_ibl_rotation_changed<F>(&mut self, on_changed: F)
    where
        F: FnMut(Mat4) + 'static,
    {
        self.controls.set_on_ibl_changed(Some(Box::new(on_changed)));
    }

    pub fn set_skybox_handle(&mut self, skybox: Entity, is_on: bool) {
        self.controls.set_skybox_handle(skybox, is_on);
    }

    pub fn set_model(&mut self, model: ModelDescription) {
        for &fast in &model.fast_point_clouds {
            self.scene.set_entity_enabled(fast, false);
        }
        let objects = model
            .point_clouds
            .iter()
            .chain(&model.meshes)
            .chain(&model.fast_point_clouds)
            .copied()
            .collect();
        self.controls.set_model(model.axes, objects);
        self.model = model;
    }

    pub fn render_quality(&self) -> Quality {
        if self.view.sample_count() == FAST_SAMPLE_COUNT {
            Quality::Fast
        } else {
            Quality::Best
        }
    }

    pub fn set_render_quality(&mut self, quality: Quality) {
        if self.render_quality() == quality {
            return;
        }
        let fast = quality == Quality::Fast;
        self.view.set_sample_count(if fast {
            FAST_SAMPLE_COUNT
        } else {
            BEST_SAMPLE_COUNT
        });

        if !self.model.fast_point_clouds.is_empty() {
            for &full in &self.model.point_clouds {
                self.scene.set_entity_enabled(full, !fast);
            }
            for &decimated in &self.model.fast_point_clouds {
                self.scene.set_entity_enabled(decimated, fast);
            }
        }
    }

    pub fn mouse(&mut self, e: &MouseEvent) -> EventResult {
        if e.kind != MouseEventKind::Move {
            self.set_render_quality(Quality::Fast);
        }
        match e.kind {
            MouseEventKind::Drag | MouseEventKind::Wheel => {
                self.last_fast_time = self.clock.now();
            }
            MouseEventKind::ButtonDown => self.buttons_down |= e.button.bit(),
            MouseEventKind::ButtonUp => self.buttons_down &= !e.button.bit(),
            MouseEventKind::Move => {}
        }

        let mut cx = InteractorContext {
            camera: &mut self.camera,
            scene: &mut *self.scene,
        };
        self.controls.mouse(e, &mut cx);
        self.fire_camera_changed();
        EventResult::Consumed
    }

    pub fn key(&mut self, e: &KeyEvent) -> EventResult {
        let mut cx = InteractorContext {
            camera: &mut self.camera,
            scene: &mut *self.scene,
        };
        self.controls.key(e, &mut cx);
        self.fire_camera_changed();
        EventResult::Consumed
    }

    pub fn tick(&mut self, e: &TickEvent) -> DrawResult {
        let mut cx = InteractorContext {
            camera: &mut self.camera,
            scene: &mut *self.scene,
        };
        let redraw = self.controls.tick(e, &mut cx);
        if redraw {
            self.set_render_quality(Quality::Fast);
            self.last_fast_time = self.clock.now();
            self.fire_camera_changed();
        }

        if self.buttons_down == 0
            && self.render_quality() == Quality::Fast
            && self.clock.now() - self.last_fast_time > DELAY_FOR_BEST_RENDERING_SECS
        {
            self.set_render_quality(Quality::Best);
            return DrawResult::Redraw;
        }
        if redraw {
            DrawResult::Redraw
        } else {
            DrawResult::None
        }
    }

    /// Applies a pending frame change. The viewport has a bottom-left origin.
    pub fn draw(&mut self, screen_height: i32) -> DrawResult {
        if self.frame_changed {
            self.frame_changed = false;
            let f = self.frame;
            self.view.set_viewport(
                f.x,
                screen_height - (f.y + f.height),
                f.width.max(0) as u32,
                f.height.max(0) as u32,
            );
            let aspect = self.aspect();
            let camera = &mut self.camera;
            camera.set_projection(camera.field_of_view(), aspect, camera.near(), camera.far());
        }
        DrawResult::None
    }

    fn fire_camera_changed(&mut self) {
        if let Some(on_changed) = self.on_camera_changed.as_mut() {
            on_changed(&self.camera);
        }
    }
}
