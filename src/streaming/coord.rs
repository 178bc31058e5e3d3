//! Integer chunk coordinates on the ground plane

use std::fmt;

use crate::core::types::Vec2;

/// Round to nearest, with exact halves going to the even neighbour.
///
/// Used for every world-to-chunk conversion so that `4.5` maps to `4` and
/// `5.5` maps to `6`.
pub fn round_to_int(value: f32) -> i32 {
    value.round_ties_even() as i32
}

/// Chunk coordinate in chunk units.
///
/// `y` is the world Z axis; the vertical axis never takes part in chunk
/// addressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk whose anchor is nearest to a ground-plane position
    pub fn from_world_pos(pos: Vec2, chunk_size: f32) -> Self {
        Self {
            x: round_to_int(pos.x / chunk_size),
            y: round_to_int(pos.y / chunk_size),
        }
    }

    /// World-space anchor (centre) of this chunk on the ground plane
    pub fn world_anchor(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * chunk_size
    }

    /// Coordinate shifted by a whole number of chunks, or `None` past the
    /// edge of the `i32` grid
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_round_to_int_ties_to_even() {
        assert_eq!(round_to_int(4.5), 4);
        assert_eq!(round_to_int(5.5), 6);
        assert_eq!(round_to_int(-0.5), 0);
        assert_eq!(round_to_int(-1.5), -2);
        assert_eq!(round_to_int(0.49), 0);
        assert_eq!(round_to_int(2.51), 3);
    }

    #[test]
    fn test_from_world_pos() {
        assert_eq!(ChunkCoord::from_world_pos(Vec2::ZERO, 100.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(Vec2::new(149.0, -151.0), 100.0), ChunkCoord::new(1, -2));
        // Exactly half way between chunk 0 and chunk 1
        assert_eq!(ChunkCoord::from_world_pos(Vec2::new(50.0, 150.0), 100.0), ChunkCoord::new(0, 2));
    }

    #[test]
    fn test_world_anchor() {
        assert_eq!(ChunkCoord::new(5, 5).world_anchor(100.0), Vec2::new(500.0, 500.0));
        assert_eq!(ChunkCoord::new(-2, 3).world_anchor(240.0), Vec2::new(-480.0, 720.0));
    }

    #[test]
    fn test_hash_identity() {
        let mut set = HashSet::new();
        assert!(set.insert(ChunkCoord::new(1, 2)));
        assert!(!set.insert(ChunkCoord::new(0, 0).checked_offset(1, 2).expect("in range")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_checked_offset_at_grid_edge() {
        let edge = ChunkCoord::new(i32::MAX, i32::MIN);
        assert_eq!(edge.checked_offset(-1, 1), Some(ChunkCoord::new(i32::MAX - 1, i32::MIN + 1)));
        assert_eq!(edge.checked_offset(1, 0), None);
        assert_eq!(edge.checked_offset(0, -1), None);
    }

    #[test]
    fn test_from_world_pos_saturates_far_away() {
        let coord = ChunkCoord::from_world_pos(Vec2::new(1.0e12, -1.0e12), 100.0);
        assert_eq!(coord, ChunkCoord::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_display() {
        assert_eq!(ChunkCoord::new(-3, 7).to_string(), "(-3, 7)");
    }
}
