mod events;
mod scene_widget;
mod widgets;

pub use events::{
    DrawResult, EventResult, Key, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind, TickEvent, WheelDelta,
};
pub use scene_widget::{
    CameraPreset, ModelDescription, Quality, SceneWidget, DELAY_FOR_BEST_RENDERING_SECS,
    MIN_FAR_PLANE, NEAR_PLANE,
};
pub use widgets::{ListView, NumberEdit, NumberKind, ProgressBar};

/// Widget frame in window pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
