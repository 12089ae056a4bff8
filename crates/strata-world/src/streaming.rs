//! Viewport-driven chunk scheduling.
//!
//! Each frame the scheduler projects the viewer's scene translation onto
//! the chunk grid and enqueues every chunk within a fixed Chebyshev
//! radius. The pool's deduplication makes the repeated sweep free, so the
//! loaded set simply grows to cover everywhere the viewer has ever been.

use glam::Vec3;
use strata_common::{ChunkCoord, WorldError, WorldResult};
use tracing::debug;

use crate::chunk::ChunkRequest;
use crate::pool::ChunkWorkerPool;

/// World-units horizon the radius is derived from.
const HORIZON_CELLS: u32 = 256;

/// Schedules chunk generation around the viewer.
#[derive(Debug, Clone)]
pub struct StreamingScheduler {
    seed: u32,
    chunk_size: u32,
    scale: f32,
    radius: i32,
}

impl StreamingScheduler {
    /// Creates a scheduler for the given terrain parameters.
    ///
    /// The streaming radius covers a fixed cell horizon regardless of
    /// chunk size: `radius = 256 / chunk_size` chunks in every direction.
    #[must_use]
    pub fn new(seed: u32, chunk_size: u32, scale: f32) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            seed,
            chunk_size,
            scale,
            radius: (HORIZON_CELLS / chunk_size) as i32,
        }
    }

    /// Overrides the streaming radius, in chunks.
    #[must_use]
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius.max(0);
        self
    }

    /// The chunk the viewer is currently over.
    ///
    /// The scene moves opposite the viewer in the scene-translation
    /// convention, hence the negation.
    #[must_use]
    pub fn chunk_under_viewer(&self, viewer: Vec3) -> ChunkCoord {
        let span = self.chunk_size as f32 * self.scale;
        ChunkCoord::new(
            (-viewer.x / span).floor() as i32,
            (-viewer.z / span).floor() as i32,
        )
    }

    /// Enqueues every chunk within the radius of the viewer's chunk.
    ///
    /// Returns how many requests were newly accepted. A non-finite viewer
    /// translation is rejected before anything is enqueued.
    pub fn update(&self, viewer: Vec3, pool: &mut ChunkWorkerPool) -> WorldResult<usize> {
        if !viewer.is_finite() {
            return Err(WorldError::InvalidViewpoint {
                x: viewer.x,
                y: viewer.y,
                z: viewer.z,
            });
        }

        let center = self.chunk_under_viewer(viewer);
        let mut accepted = 0;
        for dy in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                let request = ChunkRequest {
                    coordinate: ChunkCoord::new(center.x + dx, center.y + dy),
                    seed: self.seed,
                    scale: self.scale,
                    chunk_size: self.chunk_size,
                };
                if pool.enqueue(request) {
                    accepted += 1;
                }
            }
        }
        if accepted > 0 {
            debug!(
                x = center.x,
                y = center.y,
                accepted, "scheduled chunks around viewer"
            );
        }
        Ok(accepted)
    }

    /// Streaming radius in chunks.
    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Cells per chunk edge.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// World units per cell.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Base seed the scheduler stamps onto requests.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }
}
