use glam::{Mat4, Vec3};

/// Axis-aligned extent of the scene, supplied by the caller as a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisAlignedBoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for AxisAlignedBoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl AxisAlignedBoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn from_center_extent(center: Vec3, extent: Vec3) -> Self {
        let half = extent.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        self.extent().max_element()
    }

    /// Length of the box diagonal; the interactors use it as the model size.
    pub fn diagonal(&self) -> f32 {
        self.extent().length()
    }

    pub fn is_empty(&self) -> bool {
        self.extent().max_element() <= 0.0
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of the eight corners after applying `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let corners = self.corners();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for corner in corners {
            let p = transform.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }
}

/// Far plane large enough that the whole model (and the origin axes) stay
/// visible from `eye`.
pub fn far_plane_for(bounds: &AxisAlignedBoundingBox, eye: Vec3, min_far_plane: f32) -> f32 {
    let far1 = bounds.min.length();
    let far2 = bounds.max.length();
    let far3 = eye.length();
    let model_size = 2.0 * bounds.diagonal();
    min_far_plane.max(far1.max(far2).max(far3) + model_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let bounds = AxisAlignedBoundingBox::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn diagonal_is_extent_length() {
        let bounds = AxisAlignedBoundingBox::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert!((bounds.diagonal() - 5.0).abs() < 1e-6);
        assert_eq!(bounds.max_extent(), 4.0);
    }

    #[test]
    fn transformed_follows_translation() {
        let bounds = AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = bounds.transformed(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert!((moved.center() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert!((moved.extent() - bounds.extent()).length() < 1e-5);
    }

    #[test]
    fn far_plane_respects_minimum() {
        let bounds = AxisAlignedBoundingBox::default();
        assert_eq!(far_plane_for(&bounds, Vec3::ZERO, 1.0), 1.0);
        let bounds = AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let far = far_plane_for(&bounds, Vec3::new(0.0, 0.0, 10.0), 1.0);
        assert!((far - (10.0 + 2.0 * bounds.diagonal())).abs() < 1e-4);
    }
}
