//! Renderer-facing types.
//!
//! The rendering engine itself lives outside this crate. Widgets talk to it
//! through the [`Scene`] trait and describe what to draw with plain data
//! ([`Camera`], [`View`]) that a renderer adapter reads every frame.

mod camera;
mod memory;

pub use camera::{Camera, DEFAULT_FAR_PLANE, DEFAULT_FIELD_OF_VIEW_DEG, DEFAULT_NEAR_PLANE};
pub use memory::MemoryScene;

use glam::{Mat4, Vec3};

/// Opaque id of anything the scene owns: geometry, lights, the skybox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub u32);

/// Entity-level operations the interactors need from the rendering engine.
///
/// Unknown entities are ignored by setters and report neutral values from
/// getters.
pub trait Scene {
    fn set_entity_enabled(&mut self, entity: Entity, enabled: bool);
    fn is_entity_enabled(&self, entity: Entity) -> bool;

    fn entity_transform(&self, entity: Entity) -> Mat4;
    fn set_entity_transform(&mut self, entity: Entity, transform: Mat4);

    fn light_direction(&self, light: Entity) -> Vec3;
    fn set_light_direction(&mut self, light: Entity, direction: Vec3);

    fn indirect_light_rotation(&self) -> Mat4;
    fn set_indirect_light_rotation(&mut self, rotation: Mat4);

    fn set_skybox_enabled(&mut self, skybox: Entity, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Set of render-target buffers, used to pick which ones a view may discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetBuffers(u8);

impl TargetBuffers {
    pub const NONE: Self = Self(0);
    pub const COLOR: Self = Self(0x01);
    pub const DEPTH: Self = Self(0x02);
    pub const STENCIL: Self = Self(0x04);
    pub const ALL: Self = Self(0x07);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TargetBuffers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub const MAX_SAMPLE_COUNT: u8 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    viewport: Viewport,
    clear_color: [f32; 3],
    sample_count: u8,
    discard_buffers: TargetBuffers,
}

impl Default for View {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
            clear_color: [0.1, 0.1, 0.2],
            sample_count: 4,
            discard_buffers: TargetBuffers::ALL,
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = Viewport {
            x,
            y,
            width,
            height,
        };
    }

    pub fn clear_color(&self) -> [f32; 3] {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: [f32; 3]) {
        self.clear_color = color;
    }

    pub fn sample_count(&self) -> u8 {
        self.sample_count
    }

    /// Multisample count; values are forced to a power of two in `1..=8`.
    pub fn set_sample_count(&mut self, count: u8) {
        let count = count.clamp(1, MAX_SAMPLE_COUNT);
        self.sample_count = count.next_power_of_two().min(MAX_SAMPLE_COUNT);
    }

    pub fn discard_buffers(&self) -> TargetBuffers {
        self.discard_buffers
    }

    pub fn set_discard_buffers(&mut self, buffers: TargetBuffers) {
        self.discard_buffers = buffers;
    }
}

#[cfg(test)]
mod tests {
    use super::{TargetBuffers, View};

    #[test]
    fn sample_count_is_forced_to_valid_value() {
        let mut view = View::new();
        view.set_sample_count(0);
        assert_eq!(view.sample_count(), 1);
        view.set_sample_count(3);
        assert_eq!(view.sample_count(), 4);
        view.set_sample_count(200);
        assert_eq!(view.sample_count(), 8);
    }

    #[test]
    fn target_buffers_combine() {
        let buffers = TargetBuffers::COLOR | TargetBuffers::DEPTH;
        assert!(buffers.contains(TargetBuffers::DEPTH));
        assert!(!buffers.contains(TargetBuffers::STENCIL));
        assert!(TargetBuffers::ALL.contains(buffers));
    }
}
