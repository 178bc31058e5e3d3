//! Axis-aligned bounding box on the ground plane

use crate::core::types::Vec2;

/// Axis-aligned box on the ground plane, defined by min and max corners.
///
/// The second component is world Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Create AABB from center and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_center_half_extent(center, size * 0.5)
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Point on or inside the box nearest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Squared distance from `p` to the nearest point of the box.
    ///
    /// Zero when `p` is inside.
    pub fn sqr_distance(&self, p: Vec2) -> f32 {
        p.distance_squared(self.closest_point(p))
    }

    /// Distance from `p` to the nearest point of the box
    pub fn distance(&self, p: Vec2) -> f32 {
        self.sqr_distance(p).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let aabb = Aabb::from_center_size(Vec2::new(500.0, 500.0), Vec2::splat(100.0));
        assert_eq!(aabb.min, Vec2::new(450.0, 450.0));
        assert_eq!(aabb.max, Vec2::new(550.0, 550.0));
        assert_eq!(aabb.center(), Vec2::new(500.0, 500.0));
        assert_eq!(aabb.size(), Vec2::splat(100.0));
    }

    #[test]
    fn test_sqr_distance_inside_is_zero() {
        let aabb = Aabb::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(aabb.sqr_distance(Vec2::new(4.0, -4.0)), 0.0);
        assert_eq!(aabb.sqr_distance(Vec2::new(5.0, 0.0)), 0.0);
    }

    #[test]
    fn test_sqr_distance_to_edge_and_corner() {
        let aabb = Aabb::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        // Straight out from an edge
        assert_eq!(aabb.sqr_distance(Vec2::new(8.0, 0.0)), 9.0);
        // Diagonal from a corner
        assert_eq!(aabb.sqr_distance(Vec2::new(8.0, 9.0)), 9.0 + 16.0);
    }

    #[test]
    fn test_nearest_surface_not_center_distance() {
        // Chunk (5, 5) of size 100, observer at the origin
        let aabb = Aabb::from_center_size(Vec2::new(500.0, 500.0), Vec2::splat(100.0));
        let d = aabb.distance(Vec2::ZERO);
        assert!((d - (450.0f32 * 450.0 * 2.0).sqrt()).abs() < 1e-2);
        assert!(d < Vec2::new(500.0, 500.0).length());
    }
}
