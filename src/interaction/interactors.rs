//! Per-mode mouse and keyboard handlers. Each one turns raw input into
//! calls on its interaction logic.

use super::camera::CameraInteractorLogic;
use super::ibl::IblRotationInteractorLogic;
use super::light::LightDirectionInteractorLogic;
use super::matrix::{DragType, MatrixInteractorLogic};
use super::model::ModelInteractorLogic;
use crate::geometry::AxisAlignedBoundingBox;
use crate::gui::{Key, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind, TickEvent};
use crate::render::{Camera, Entity, Scene};
use glam::{Mat4, Vec3};
use std::collections::BTreeSet;

/// Scale applied to wheel deltas before they become dolly or zoom input.
const WHEEL_SCALE: f32 = 2.0;
/// Fly-mode translation per tick, as a fraction of the model diagonal.
const FLY_MOVE_FRACTION: f32 = 0.0025;
/// Fly-mode look rotation per tick for the arrow keys.
const FLY_LOOK_RADIANS: f32 = 0.0075;
/// Fly-mode roll per tick for `e` and `r`, in pixels of equivalent drag.
const FLY_ROLL_STEP: f32 = 2.0;

/// The camera and scene an interactor acts on during one event.
pub struct InteractorContext<'a> {
    pub camera: &'a mut Camera,
    pub scene: &'a mut dyn Scene,
}

pub trait MouseInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic;

    fn set_bounding_box(&mut self, bounds: AxisAlignedBoundingBox) {
        self.matrix_interactor().set_bounding_box(bounds);
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>);

    fn key(&mut self, e: &KeyEvent, cx: &mut InteractorContext<'_>);

    /// Returns true when the tick changed something that needs a redraw.
    fn tick(&mut self, _e: &TickEvent, _cx: &mut InteractorContext<'_>) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    None,
    Pan,
    Dolly,
    RotateXY,
    RotateZ,
}

fn wheel_drag_type(e: &MouseEvent) -> DragType {
    if e.wheel.is_trackpad {
        DragType::TwoFinger
    } else {
        DragType::Wheel
    }
}

/// Chooses the gesture for a left-button press. Decided once at press time;
/// releasing a modifier mid-drag does not change the gesture.
fn classify_left_drag(modifiers: KeyModifiers) -> DragState {
    let roll_with_shift = if cfg!(target_os = "macos") {
        KeyModifiers::ALT
    } else {
        KeyModifiers::CTRL
    };
    if modifiers.contains(KeyModifiers::SHIFT) {
        if modifiers.contains(roll_with_shift) {
            DragState::RotateZ
        } else {
            DragState::Dolly
        }
    } else if modifiers.contains(KeyModifiers::CTRL) {
        DragState::Pan
    } else if modifiers.contains(KeyModifiers::META) {
        DragState::RotateZ
    } else {
        DragState::RotateXY
    }
}

/// The subset of logic operations a rotation-style interactor drives.
pub trait RotationLogic {
    fn matrix_logic(&mut self) -> &mut MatrixInteractorLogic;
    fn set_bounds(&mut self, bounds: AxisAlignedBoundingBox) {
        self.matrix_logic().set_bounding_box(bounds);
    }
    fn start_mouse_drag(&mut self, cx: &mut InteractorContext<'_>);
    fn end_mouse_drag(&mut self, cx: &mut InteractorContext<'_>);
    fn rotate(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>);
    fn rotate_z(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>);
    fn pan(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>);
    fn dolly(&mut self, dy: f32, drag_type: DragType, cx: &mut InteractorContext<'_>);
}

impl RotationLogic for CameraInteractorLogic {
    fn matrix_logic(&mut self) -> &mut MatrixInteractorLogic {
        self.base_mut()
    }

    fn start_mouse_drag(&mut self, cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::start_mouse_drag(self, cx.camera);
    }

    fn end_mouse_drag(&mut self, _cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::end_mouse_drag(self);
    }

    fn rotate(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::rotate(self, dx, dy, cx.camera);
    }

    fn rotate_z(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::rotate_z(self, dx, dy, cx.camera);
    }

    fn pan(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::pan(self, dx, dy, cx.camera);
    }

    fn dolly(&mut self, dy: f32, drag_type: DragType, cx: &mut InteractorContext<'_>) {
        CameraInteractorLogic::dolly(self, dy, drag_type, cx.camera);
    }
}

impl RotationLogic for ModelInteractorLogic {
    fn matrix_logic(&mut self) -> &mut MatrixInteractorLogic {
        self.base_mut()
    }

    fn set_bounds(&mut self, bounds: AxisAlignedBoundingBox) {
        self.set_bounding_box(bounds);
    }

    fn start_mouse_drag(&mut self, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::start_mouse_drag(self, cx.scene, cx.camera);
    }

    fn end_mouse_drag(&mut self, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::end_mouse_drag(self, cx.scene);
    }

    fn rotate(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::rotate(self, dx, dy, cx.scene, cx.camera);
    }

    fn rotate_z(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::rotate_z(self, dx, dy, cx.scene, cx.camera);
    }

    fn pan(&mut self, dx: f32, dy: f32, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::pan(self, dx, dy, cx.scene, cx.camera);
    }

    fn dolly(&mut self, dy: f32, drag_type: DragType, cx: &mut InteractorContext<'_>) {
        ModelInteractorLogic::dolly(self, dy, drag_type, cx.scene, cx.camera);
    }
}

/// Left-drag rotates, with modifiers selecting pan, dolly or roll; the wheel
/// dollies. Drag deltas are measured from the press position.
#[derive(Debug, Clone)]
pub struct RotationInteractor<L> {
    logic: L,
    mouse_down_x: i32,
    mouse_down_y: i32,
    state: DragState,
}

impl<L: RotationLogic> RotationInteractor<L> {
    pub fn new(logic: L) -> Self {
        Self {
            logic,
            mouse_down_x: 0,
            mouse_down_y: 0,
            state: DragState::None,
        }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::None
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        match e.kind {
            MouseEventKind::ButtonDown => {
                self.mouse_down_x = e.x;
                self.mouse_down_y = e.y;
                match e.button {
                    MouseButton::Left => self.state = classify_left_drag(e.modifiers),
                    MouseButton::Right => self.state = DragState::Pan,
                    _ => {}
                }
                self.logic.start_mouse_drag(cx);
            }
            MouseEventKind::Drag => {
                let dx = (e.x - self.mouse_down_x) as f32;
                let dy = (e.y - self.mouse_down_y) as f32;
                match self.state {
                    DragState::None => {}
                    DragState::Pan => self.logic.pan(dx, dy, cx),
                    DragState::Dolly => self.logic.dolly(dy, DragType::Mouse, cx),
                    DragState::RotateXY => self.logic.rotate(dx, dy, cx),
                    DragState::RotateZ => self.logic.rotate_z(dx, dy, cx),
                }
            }
            MouseEventKind::Wheel => {
                self.logic.dolly(WHEEL_SCALE * e.wheel.dy, wheel_drag_type(e), cx);
            }
            MouseEventKind::ButtonUp => {
                self.logic.end_mouse_drag(cx);
                self.state = DragState::None;
            }
            MouseEventKind::Move => {}
        }
    }
}

/// Orbits the camera around the center of rotation. SHIFT+wheel zooms the
/// field of view instead of dollying.
#[derive(Debug, Clone)]
pub struct OrbitCameraInteractor {
    inner: RotationInteractor<CameraInteractorLogic>,
}

impl OrbitCameraInteractor {
    pub fn new(min_far_plane: f32) -> Self {
        Self {
            inner: RotationInteractor::new(CameraInteractorLogic::new(min_far_plane)),
        }
    }

    pub fn center_of_rotation(&self) -> Vec3 {
        self.inner.logic().center_of_rotation()
    }

    pub fn set_center_of_rotation(&mut self, center: Vec3) {
        self.inner.logic_mut().set_center_of_rotation(center);
    }
}

impl MouseInteractor for OrbitCameraInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic {
        self.inner.logic_mut().base_mut()
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        if e.kind == MouseEventKind::Wheel && e.modifiers == KeyModifiers::SHIFT {
            let dy = WHEEL_SCALE * e.wheel.dy;
            self.inner.logic_mut().zoom(dy, wheel_drag_type(e), cx.camera);
            return;
        }
        self.inner.mouse(e, cx);
    }

    fn key(&mut self, _e: &KeyEvent, _cx: &mut InteractorContext<'_>) {}
}

/// Drags the model entities rather than the camera.
#[derive(Debug, Clone)]
pub struct ModelRotationInteractor {
    inner: RotationInteractor<ModelInteractorLogic>,
}

impl ModelRotationInteractor {
    pub fn new() -> Self {
        Self {
            inner: RotationInteractor::new(ModelInteractorLogic::new()),
        }
    }

    pub fn set_model(&mut self, axes: Option<Entity>, objects: Vec<Entity>) {
        self.inner.logic_mut().set_model(axes, objects);
    }

    pub fn logic(&self) -> &ModelInteractorLogic {
        self.inner.logic()
    }
}

impl MouseInteractor for ModelRotationInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic {
        self.inner.logic_mut().base_mut()
    }

    fn set_bounding_box(&mut self, bounds: AxisAlignedBoundingBox) {
        self.inner.logic_mut().set_bounds(bounds);
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        self.inner.mouse(e, cx);
    }

    fn key(&mut self, _e: &KeyEvent, _cx: &mut InteractorContext<'_>) {}
}

/// First-person camera: the drag turns the head, keys move the eye.
#[derive(Debug, Clone)]
pub struct FlyInteractor {
    logic: CameraInteractorLogic,
    last_mouse_x: i32,
    last_mouse_y: i32,
    keys_down: BTreeSet<Key>,
}

impl FlyInteractor {
    pub fn new(min_far_plane: f32) -> Self {
        Self {
            logic: CameraInteractorLogic::new(min_far_plane),
            last_mouse_x: 0,
            last_mouse_y: 0,
            keys_down: BTreeSet::new(),
        }
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &Key> {
        self.keys_down.iter()
    }

    pub fn clear_keys(&mut self) {
        self.keys_down.clear();
    }

    fn is_down(&self, c: char) -> bool {
        self.keys_down.contains(&Key::Char(c))
    }

    fn normalize(key: Key) -> Key {
        match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

impl MouseInteractor for FlyInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic {
        self.logic.base_mut()
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        match e.kind {
            MouseEventKind::ButtonDown => {
                self.last_mouse_x = e.x;
                self.last_mouse_y = e.y;
                self.logic.start_mouse_drag(cx.camera);
            }
            MouseEventKind::Drag => {
                let dx = (e.x - self.last_mouse_x) as f32;
                let dy = (e.y - self.last_mouse_y) as f32;
                if e.modifiers.contains(KeyModifiers::META) {
                    // Roll relative to where the eye is now.
                    self.logic.reset_mouse_drag(cx.camera);
                    self.logic.rotate_z(dx, dy, cx.camera);
                } else {
                    self.logic.rotate_fly(-dx, -dy, cx.camera);
                }
                self.last_mouse_x = e.x;
                self.last_mouse_y = e.y;
            }
            MouseEventKind::Wheel => {}
            MouseEventKind::ButtonUp => self.logic.end_mouse_drag(),
            MouseEventKind::Move => {}
        }
    }

    fn key(&mut self, e: &KeyEvent, _cx: &mut InteractorContext<'_>) {
        let key = Self::normalize(e.key);
        match e.kind {
            KeyEventKind::Down => {
                self.keys_down.insert(key);
            }
            KeyEventKind::Up => {
                self.keys_down.remove(&key);
            }
        }
    }

    fn tick(&mut self, _e: &TickEvent, cx: &mut InteractorContext<'_>) -> bool {
        if self.keys_down.is_empty() {
            return false;
        }

        let mut redraw = false;
        let dist = FLY_MOVE_FRACTION * self.logic.base().bounding_box().diagonal();
        let moves = [
            ('a', Vec3::new(-dist, 0.0, 0.0)),
            ('d', Vec3::new(dist, 0.0, 0.0)),
            ('w', Vec3::new(0.0, 0.0, -dist)),
            ('s', Vec3::new(0.0, 0.0, dist)),
            ('q', Vec3::new(0.0, dist, 0.0)),
            ('z', Vec3::new(0.0, -dist, 0.0)),
        ];
        for (c, v) in moves {
            if self.is_down(c) {
                self.logic.move_local(v, cx.camera);
                redraw = true;
            }
        }

        for (c, dy) in [('e', -FLY_ROLL_STEP), ('r', FLY_ROLL_STEP)] {
            if self.is_down(c) {
                self.logic.start_mouse_drag(cx.camera);
                self.logic.rotate_z(0.0, dy, cx.camera);
                redraw = true;
            }
        }

        let looks = [
            (Key::ArrowUp, FLY_LOOK_RADIANS, Vec3::X),
            (Key::ArrowDown, -FLY_LOOK_RADIANS, Vec3::X),
            (Key::ArrowLeft, FLY_LOOK_RADIANS, Vec3::Y),
            (Key::ArrowRight, -FLY_LOOK_RADIANS, Vec3::Y),
        ];
        for (key, angle, axis) in looks {
            if self.keys_down.contains(&key) {
                self.logic.rotate_local(angle, axis, cx.camera);
                redraw = true;
            }
        }
        redraw
    }
}

/// Drags the sun. The new direction is written to the scene and reported.
pub struct SunInteractor {
    logic: LightDirectionInteractorLogic,
    mouse_down_x: i32,
    mouse_down_y: i32,
    on_changed: Option<Box<dyn FnMut(Vec3)>>,
}

impl SunInteractor {
    pub fn new() -> Self {
        Self {
            logic: LightDirectionInteractorLogic::new(),
            mouse_down_x: 0,
            mouse_down_y: 0,
            on_changed: None,
        }
    }

    pub fn set_directional_light(&mut self, light: Entity, on_changed: Option<Box<dyn FnMut(Vec3)>>) {
        self.logic.set_directional_light(light);
        self.on_changed = on_changed;
    }

    pub fn logic(&self) -> &LightDirectionInteractorLogic {
        &self.logic
    }
}

impl Default for SunInteractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseInteractor for SunInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic {
        self.logic.base_mut()
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        match e.kind {
            MouseEventKind::ButtonDown => {
                self.mouse_down_x = e.x;
                self.mouse_down_y = e.y;
                self.logic.start_mouse_drag(cx.scene);
            }
            MouseEventKind::Drag => {
                let dx = (e.x - self.mouse_down_x) as f32;
                let dy = (e.y - self.mouse_down_y) as f32;
                self.logic.rotate(dx, dy, cx.camera);
                let dir = self.logic.current_direction();
                if let Some(light) = self.logic.directional_light() {
                    cx.scene.set_light_direction(light, dir);
                }
                if let Some(on_changed) = self.on_changed.as_mut() {
                    on_changed(dir);
                }
            }
            MouseEventKind::ButtonUp => self.logic.end_mouse_drag(),
            MouseEventKind::Wheel | MouseEventKind::Move => {}
        }
    }

    fn key(&mut self, _e: &KeyEvent, _cx: &mut InteractorContext<'_>) {}
}

/// Drags the environment lighting. META rolls about the view axis.
pub struct IblInteractor {
    logic: IblRotationInteractorLogic,
    mouse_down_x: i32,
    mouse_down_y: i32,
    on_changed: Option<Box<dyn FnMut(Mat4)>>,
}

impl IblInteractor {
    pub fn new() -> Self {
        Self {
            logic: IblRotationInteractorLogic::new(),
            mouse_down_x: 0,
            mouse_down_y: 0,
            on_changed: None,
        }
    }

    pub fn set_skybox_handle(&mut self, skybox: Entity, is_on: bool) {
        self.logic.set_skybox_handle(skybox, is_on);
    }

    pub fn set_on_changed(&mut self, on_changed: Option<Box<dyn FnMut(Mat4)>>) {
        self.on_changed = on_changed;
    }
}

impl Default for IblInteractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseInteractor for IblInteractor {
    fn matrix_interactor(&mut self) -> &mut MatrixInteractorLogic {
        self.logic.base_mut()
    }

    fn mouse(&mut self, e: &MouseEvent, cx: &mut InteractorContext<'_>) {
        match e.kind {
            MouseEventKind::ButtonDown => {
                self.mouse_down_x = e.x;
                self.mouse_down_y = e.y;
                self.logic.start_mouse_drag(cx.scene);
            }
            MouseEventKind::Drag => {
                let dx = (e.x - self.mouse_down_x) as f32;
                let dy = (e.y - self.mouse_down_y) as f32;
                if e.modifiers.contains(KeyModifiers::META) {
                    self.logic.rotate_z(dx, dy, cx.camera);
                } else {
                    self.logic.rotate(dx, dy, cx.camera);
                }
                let rotation = self.logic.current_rotation();
                cx.scene.set_indirect_light_rotation(rotation);
                if let Some(on_changed) = self.on_changed.as_mut() {
                    on_changed(rotation);
                }
            }
            MouseEventKind::ButtonUp => self.logic.end_mouse_drag(cx.scene),
            MouseEventKind::Wheel | MouseEventKind::Move => {}
        }
    }

    fn key(&mut self, _e: &KeyEvent, _cx: &mut InteractorContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemoryScene;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn camera() -> Camera {
        let mut camera = Camera::new();
        camera.look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::Y);
        camera
    }

    fn bounds() -> AxisAlignedBoundingBox {
        AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn left_drag_classification() {
        assert_eq!(classify_left_drag(KeyModifiers::NONE), DragState::RotateXY);
        assert_eq!(classify_left_drag(KeyModifiers::SHIFT), DragState::Dolly);
        assert_eq!(classify_left_drag(KeyModifiers::CTRL), DragState::Pan);
        assert_eq!(classify_left_drag(KeyModifiers::META), DragState::RotateZ);
        assert_eq!(
            classify_left_drag(KeyModifiers::CTRL | KeyModifiers::ALT),
            DragState::Pan
        );
        #[cfg(not(target_os = "macos"))]
        {
            assert_eq!(
                classify_left_drag(KeyModifiers::SHIFT | KeyModifiers::CTRL),
                DragState::RotateZ
            );
            assert_eq!(
                classify_left_drag(KeyModifiers::SHIFT | KeyModifiers::ALT),
                DragState::Dolly
            );
        }
        #[cfg(target_os = "macos")]
        assert_eq!(
            classify_left_drag(KeyModifiers::SHIFT | KeyModifiers::ALT),
            DragState::RotateZ
        );
    }

    #[test]
    fn modifier_release_mid_drag_keeps_gesture() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut orbit = OrbitCameraInteractor::new(1.0);
        orbit.matrix_interactor().set_view_size(400, 400);
        orbit.set_bounding_box(bounds());

        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        orbit.mouse(&MouseEvent::button_down(200, 200, MouseButton::Left, KeyModifiers::SHIFT), &mut cx);
        orbit.mouse(&MouseEvent::drag(200, 240, MouseButton::Left, KeyModifiers::NONE), &mut cx);
        // Still a dolly: dragging down moves straight in, no orbit.
        let p = cx.camera.position();
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!(p.z < 10.0);
    }

    #[test]
    fn shift_wheel_zooms_instead_of_dolly() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut orbit = OrbitCameraInteractor::new(1.0);
        orbit.set_bounding_box(bounds());
        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        orbit.mouse(&MouseEvent::wheel(0, 0, 0.0, -1.0, false, KeyModifiers::SHIFT), &mut cx);
        assert!((cx.camera.field_of_view() - 56.0).abs() < 1e-4);
        assert!((cx.camera.position().z - 10.0).abs() < 1e-5);

        orbit.mouse(&MouseEvent::wheel(0, 0, 0.0, -1.0, false, KeyModifiers::NONE), &mut cx);
        assert!(cx.camera.position().z < 10.0);
    }

    #[test]
    fn fly_keys_move_eye_each_tick() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut fly = FlyInteractor::new(1.0);
        fly.set_bounding_box(bounds());
        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        assert!(!fly.tick(&TickEvent { dt: 0.01 }, &mut cx));

        fly.key(&KeyEvent::down(Key::Char('W')), &mut cx);
        assert!(fly.tick(&TickEvent { dt: 0.01 }, &mut cx));
        let step = FLY_MOVE_FRACTION * bounds().diagonal();
        assert!((cx.camera.position().z - (10.0 - step)).abs() < 1e-5);

        fly.key(&KeyEvent::up(Key::Char('w')), &mut cx);
        assert!(!fly.tick(&TickEvent { dt: 0.01 }, &mut cx));
    }

    #[test]
    fn right_drag_pans() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut orbit = OrbitCameraInteractor::new(1.0);
        orbit.matrix_interactor().set_view_size(400, 400);
        orbit.set_bounding_box(bounds());
        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        orbit.mouse(&MouseEvent::button_down(200, 200, MouseButton::Right, KeyModifiers::NONE), &mut cx);
        orbit.mouse(&MouseEvent::drag(250, 200, MouseButton::Right, KeyModifiers::NONE), &mut cx);
        // Pan keeps the view direction and the distance along it.
        let forward = cx.camera.forward_vector();
        assert!((forward - Vec3::NEG_Z).length() < 1e-4);
        assert!((cx.camera.position().z - 10.0).abs() < 1e-4);
        assert!(cx.camera.position().x.abs() > 1e-4);
    }

    #[test]
    fn fly_roll_keys_keep_eye_in_place() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut fly = FlyInteractor::new(1.0);
        fly.matrix_interactor().set_view_size(400, 400);
        fly.set_bounding_box(bounds());
        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        fly.key(&KeyEvent::down(Key::Char('e')), &mut cx);
        assert!(fly.tick(&TickEvent { dt: 0.01 }, &mut cx));
        assert!((cx.camera.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
        assert!((cx.camera.forward_vector() - Vec3::NEG_Z).length() < 1e-4);
        assert!(cx.camera.up_vector().x.abs() > 1e-3);
    }

    #[test]
    fn sun_drag_updates_scene_and_callback() {
        let mut scene = MemoryScene::new();
        let start = Vec3::new(0.0, -1.0, -1.0).normalize();
        let light = scene.add_directional_light(start);
        let mut camera = camera();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut sun = SunInteractor::new();
        sun.matrix_interactor().set_view_size(400, 400);
        sun.set_directional_light(light, Some(Box::new(move |dir| sink.borrow_mut().push(dir))));

        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        sun.mouse(&MouseEvent::button_down(100, 100, MouseButton::Middle, KeyModifiers::NONE), &mut cx);
        for x in [120, 140, 160] {
            sun.mouse(&MouseEvent::drag(x, 100, MouseButton::Middle, KeyModifiers::NONE), &mut cx);
        }
        sun.mouse(&MouseEvent::button_up(160, 100, MouseButton::Middle, KeyModifiers::NONE), &mut cx);
        assert_eq!(seen.borrow().len(), 3);

        sun.mouse(&MouseEvent::button_down(100, 100, MouseButton::Middle, KeyModifiers::NONE), &mut cx);
        sun.mouse(&MouseEvent::drag(100, 140, MouseButton::Middle, KeyModifiers::NONE), &mut cx);
        sun.mouse(&MouseEvent::button_up(100, 140, MouseButton::Middle, KeyModifiers::NONE), &mut cx);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(scene.light_direction(light), seen[3]);
        assert!((seen[0] - start).length() > 1e-3);
        assert!((seen[3] - seen[2]).length() > 1e-3);
        assert!((seen[3].length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ibl_drag_rotates_environment_and_restores_skybox() {
        let mut scene = MemoryScene::new();
        let skybox = scene.add_skybox(false);
        let mut camera = camera();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut ibl = IblInteractor::new();
        ibl.matrix_interactor().set_view_size(400, 400);
        ibl.set_skybox_handle(skybox, false);
        ibl.set_on_changed(Some(Box::new(move |m| sink.borrow_mut().push(m))));

        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        ibl.mouse(&MouseEvent::button_down(200, 200, MouseButton::Left, KeyModifiers::NONE), &mut cx);
        assert!(cx.scene.is_entity_enabled(skybox));
        ibl.mouse(&MouseEvent::drag(230, 200, MouseButton::Left, KeyModifiers::NONE), &mut cx);
        ibl.mouse(&MouseEvent::drag(260, 200, MouseButton::Left, KeyModifiers::NONE), &mut cx);
        ibl.mouse(&MouseEvent::button_up(260, 200, MouseButton::Left, KeyModifiers::NONE), &mut cx);
        assert!(!cx.scene.is_entity_enabled(skybox));

        let turned = cx.scene.indirect_light_rotation();
        assert!(!turned.abs_diff_eq(Mat4::IDENTITY, 1e-4));
        // Plain drags turn about the camera's up axis.
        assert!((turned.transform_vector3(Vec3::Y) - Vec3::Y).length() < 1e-4);

        // META rolls about the view axis, starting from the previous result.
        ibl.mouse(&MouseEvent::button_down(200, 200, MouseButton::Left, KeyModifiers::META), &mut cx);
        ibl.mouse(&MouseEvent::drag(200, 250, MouseButton::Left, KeyModifiers::META), &mut cx);
        ibl.mouse(&MouseEvent::button_up(200, 250, MouseButton::Left, KeyModifiers::META), &mut cx);

        let rolled = scene.indirect_light_rotation();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], rolled);
        assert_eq!(seen[1], turned);
        let relative = rolled * turned.inverse();
        assert!((relative.transform_vector3(Vec3::Z) - Vec3::Z).length() < 1e-4);
        assert!((relative.transform_vector3(Vec3::Y) - Vec3::Y).length() > 1e-3);
    }

    #[test]
    fn fly_modifier_keys_alone_do_not_redraw() {
        let mut scene = MemoryScene::new();
        let mut camera = camera();
        let mut fly = FlyInteractor::new(1.0);
        fly.set_bounding_box(bounds());
        let mut cx = InteractorContext {
            camera: &mut camera,
            scene: &mut scene,
        };
        fly.key(&KeyEvent::down(Key::Shift), &mut cx);
        let start = cx.camera.model_matrix();
        assert!(!fly.tick(&TickEvent { dt: 0.01 }, &mut cx));
        assert_eq!(cx.camera.model_matrix(), start);
    }
}
