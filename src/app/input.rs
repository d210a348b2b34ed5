//! Translation from winit input to the widget event model.

use crate::gui::{Key, KeyEvent, KeyModifiers, MouseButton, MouseEvent};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

pub fn map_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Ctrl,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
        KeyCode::KeyA => Key::Char('a'),
        KeyCode::KeyD => Key::Char('d'),
        KeyCode::KeyE => Key::Char('e'),
        KeyCode::KeyQ => Key::Char('q'),
        KeyCode::KeyR => Key::Char('r'),
        KeyCode::KeyS => Key::Char('s'),
        KeyCode::KeyW => Key::Char('w'),
        KeyCode::KeyZ => Key::Char('z'),
        KeyCode::Digit1 => Key::Char('1'),
        KeyCode::Digit2 => Key::Char('2'),
        KeyCode::Digit3 => Key::Char('3'),
        KeyCode::Digit4 => Key::Char('4'),
        KeyCode::Digit5 => Key::Char('5'),
        _ => return None,
    };
    Some(key)
}

pub fn map_key_event(key: PhysicalKey, state: ElementState) -> Option<KeyEvent> {
    let key = map_key(key)?;
    Some(match state {
        ElementState::Pressed => KeyEvent::down(key),
        ElementState::Released => KeyEvent::up(key),
    })
}

pub fn map_modifiers(state: ModifiersState) -> KeyModifiers {
    let mut mods = KeyModifiers::NONE;
    if state.shift_key() {
        mods |= KeyModifiers::SHIFT;
    }
    if state.control_key() {
        mods |= KeyModifiers::CTRL;
    }
    if state.alt_key() {
        mods |= KeyModifiers::ALT;
    }
    if state.super_key() {
        mods |= KeyModifiers::META;
    }
    mods
}

pub fn map_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Back => Some(MouseButton::Button4),
        winit::event::MouseButton::Forward => Some(MouseButton::Button5),
        winit::event::MouseButton::Other(_) => None,
    }
}

/// Tracks cursor position, held buttons and modifiers so cursor motion can
/// be reported as a move or a drag.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerState {
    x: i32,
    y: i32,
    buttons_down: u8,
    drag_button: MouseButton,
    modifiers: KeyModifiers,
}

impl PointerState {
    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = map_modifiers(state);
    }

    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) -> MouseEvent {
        self.x = x.round() as i32;
        self.y = y.round() as i32;
        if self.buttons_down == 0 {
            MouseEvent::moved(self.x, self.y, self.modifiers)
        } else {
            MouseEvent::drag(self.x, self.y, self.drag_button, self.modifiers)
        }
    }

    pub fn button(&mut self, button: MouseButton, state: ElementState) -> MouseEvent {
        match state {
            ElementState::Pressed => {
                if self.buttons_down == 0 {
                    self.drag_button = button;
                }
                self.buttons_down |= button.bit();
                MouseEvent::button_down(self.x, self.y, button, self.modifiers)
            }
            ElementState::Released => {
                self.buttons_down &= !button.bit();
                MouseEvent::button_up(self.x, self.y, button, self.modifiers)
            }
        }
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) -> MouseEvent {
        let (dx, dy, is_trackpad) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y, false),
            MouseScrollDelta::PixelDelta(pos) => (
                pos.x as f32 / PIXELS_PER_LINE,
                pos.y as f32 / PIXELS_PER_LINE,
                true,
            ),
        };
        MouseEvent::wheel(self.x, self.y, dx, dy, is_trackpad, self.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::MouseEventKind;

    #[test]
    fn motion_with_button_held_is_drag() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.cursor_moved(10.0, 20.0).kind, MouseEventKind::Move);
        let down = pointer.button(MouseButton::Left, ElementState::Pressed);
        assert_eq!((down.x, down.y), (10, 20));
        let drag = pointer.cursor_moved(15.4, 22.6);
        assert_eq!(drag.kind, MouseEventKind::Drag);
        assert_eq!((drag.x, drag.y), (15, 23));
        assert_eq!(drag.button, MouseButton::Left);
        pointer.button(MouseButton::Left, ElementState::Released);
        assert_eq!(pointer.cursor_moved(16.0, 22.0).kind, MouseEventKind::Move);
    }

    #[test]
    fn modifiers_map_to_flags() {
        let mods = map_modifiers(ModifiersState::SHIFT | ModifiersState::ALT);
        assert_eq!(mods, KeyModifiers::SHIFT | KeyModifiers::ALT);
    }

    #[test]
    fn trackpad_scroll_is_flagged() {
        let mut pointer = PointerState::default();
        let e = pointer.wheel(MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 40.0)));
        assert!(e.wheel.is_trackpad);
        assert_eq!(e.wheel.dy, 2.0);
        let e = pointer.wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert!(!e.wheel.is_trackpad);
    }

    #[test]
    fn keys_map_to_lowercase_chars() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Some(Key::Char('w')));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F13)), None);
        assert_eq!(
            map_key_event(PhysicalKey::Code(KeyCode::ArrowUp), ElementState::Released),
            Some(KeyEvent::up(Key::ArrowUp))
        );
    }
}
