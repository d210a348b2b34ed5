//! Stand-in content for the viewer binary: a generated point cloud with a
//! decimated twin, axes, a sun and a skybox.

use crate::geometry::AxisAlignedBoundingBox;
use crate::render::{Entity, MemoryScene, Scene};
use glam::{Mat4, Vec3};

/// One in this many points is kept in the fast cloud.
const FAST_DECIMATION: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct DemoEntities {
    pub cloud: Entity,
    pub fast_cloud: Entity,
    pub axes: Entity,
    pub sun: Entity,
    pub skybox: Entity,
}

pub fn build_demo_scene() -> (MemoryScene, DemoEntities) {
    let mut scene = MemoryScene::new();
    let cloud = scene.add_geometry(Mat4::IDENTITY);
    let fast_cloud = scene.add_geometry(Mat4::IDENTITY);
    let axes = scene.add_geometry(Mat4::IDENTITY);
    scene.set_entity_enabled(axes, false);
    let sun = scene.add_directional_light(Vec3::new(0.577, -0.577, -0.577));
    let skybox = scene.add_skybox(false);
    (
        scene,
        DemoEntities {
            cloud,
            fast_cloud,
            axes,
            sun,
            skybox,
        },
    )
}

/// Points on a conical helix, the shape the demo cloud stands for.
pub fn helix_points(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count.max(1) as f32;
            let angle = t * 12.0 * std::f32::consts::PI;
            let radius = 0.5 + 1.5 * t;
            Vec3::new(radius * angle.cos(), 4.0 * t - 2.0, radius * angle.sin())
        })
        .collect()
}

pub fn decimate(points: &[Vec3]) -> Vec<Vec3> {
    points.iter().step_by(FAST_DECIMATION).copied().collect()
}

pub fn bounds_of(points: &[Vec3]) -> AxisAlignedBoundingBox {
    let Some(&first) = points.first() else {
        return AxisAlignedBoundingBox::default();
    };
    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    AxisAlignedBoundingBox::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_starts_with_hidden_helpers() {
        let (scene, demo) = build_demo_scene();
        assert!(scene.is_entity_enabled(demo.cloud));
        assert!(!scene.is_entity_enabled(demo.axes));
        assert!(!scene.is_entity_enabled(demo.skybox));
        assert!((scene.light_direction(demo.sun).length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn helix_bounds() {
        let points = helix_points(1000);
        let bounds = bounds_of(&points);
        assert!((bounds.min.y + 2.0).abs() < 1e-5);
        assert!(bounds.max.y < 2.0);
        assert!(bounds.max.x <= 2.0 && bounds.min.x >= -2.0);
        assert_eq!(decimate(&points).len(), 1000 / FAST_DECIMATION + 1);
        assert!(bounds_of(&[]).is_empty());
    }
}
