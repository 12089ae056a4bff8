//! Coordinate types for the chunk grid.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Chunk coordinate (identifies a chunk in the world grid).
///
/// Maps to world space by `world_origin = coord * chunk_size * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts to the chunk's world-space translation.
    ///
    /// The returned pair is the `(x, z)` placement a scene collaborator
    /// positions the chunk mesh at.
    #[must_use]
    pub fn world_origin(self, chunk_size: u32, scale: f32) -> (f32, f32) {
        let span = chunk_size as f32 * scale;
        (self.x as f32 * span, self.y as f32 * span)
    }

    /// Chebyshev distance to another chunk coordinate.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_origin() {
        let coord = ChunkCoord::new(2, -1);
        let (x, z) = coord.world_origin(16, 16.0);
        assert!((x - 512.0).abs() < f32::EPSILON);
        assert!((z + 256.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_adjacent_chunks_tile() {
        // A chunk spans chunk_size * scale world units, so the origin of
        // chunk x+1 must sit exactly one span after the origin of chunk x.
        let span = 16.0 * 4.0;
        let (x0, _) = ChunkCoord::new(0, 0).world_origin(16, 4.0);
        let (x1, _) = ChunkCoord::new(1, 0).world_origin(16, 4.0);
        assert!((x1 - x0 - span).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, -2)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-1, 5)), 5);
        assert_eq!(a.chebyshev_distance(a), 0);
    }
}
