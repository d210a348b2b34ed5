/// Modifier keys held while an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const META: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for KeyModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for KeyModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Mouse buttons carry distinct bits so a set of held buttons fits in a mask.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    None = 0,
    Left = 1 << 0,
    Middle = 1 << 1,
    Right = 1 << 2,
    Button4 = 1 << 3,
    Button5 = 1 << 4,
}

impl MouseButton {
    pub fn bit(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Move,
    ButtonDown,
    Drag,
    ButtonUp,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub dx: f32,
    pub dy: f32,
    pub is_trackpad: bool,
}

/// Mouse input in widget pixel coordinates (origin top-left, +y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub modifiers: KeyModifiers,
    pub button: MouseButton,
    pub wheel: WheelDelta,
}

impl MouseEvent {
    pub fn moved(x: i32, y: i32, modifiers: KeyModifiers) -> Self {
        Self {
            kind: MouseEventKind::Move,
            x,
            y,
            modifiers,
            button: MouseButton::None,
            wheel: WheelDelta::default(),
        }
    }

    pub fn button_down(x: i32, y: i32, button: MouseButton, modifiers: KeyModifiers) -> Self {
        Self {
            kind: MouseEventKind::ButtonDown,
            x,
            y,
            modifiers,
            button,
            wheel: WheelDelta::default(),
        }
    }

    pub fn drag(x: i32, y: i32, button: MouseButton, modifiers: KeyModifiers) -> Self {
        Self {
            kind: MouseEventKind::Drag,
            x,
            y,
            modifiers,
            button,
            wheel: WheelDelta::default(),
        }
    }

    pub fn button_up(x: i32, y: i32, button: MouseButton, modifiers: KeyModifiers) -> Self {
        Self {
            kind: MouseEventKind::ButtonUp,
            x,
            y,
            modifiers,
            button,
            wheel: WheelDelta::default(),
        }
    }

    pub fn wheel(x: i32, y: i32, dx: f32, dy: f32, is_trackpad: bool, modifiers: KeyModifiers) -> Self {
        Self {
            kind: MouseEventKind::Wheel,
            x,
            y,
            modifiers,
            button: MouseButton::None,
            wheel: WheelDelta { dx, dy, is_trackpad },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Shift,
    Ctrl,
    Alt,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Down,
            key,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Up,
            key,
        }
    }
}

/// Sent once per run-loop iteration, independent of input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickEvent {
    pub dt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Ignored,
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    None,
    Redraw,
}
