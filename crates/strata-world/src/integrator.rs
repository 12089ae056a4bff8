//! Cooperative per-frame integration.
//!
//! One [`FrameIntegrator::tick`] is the whole per-frame contract: pump the
//! worker pool, hand at most one finished chunk to the scene, reschedule
//! around the viewer, advance the camera glide. Draining a single result
//! per tick bounds the cost of mesh insertion in any one frame; when
//! generation outpaces consumption the backlog simply drains over the
//! following frames.

use glam::Vec3;
use strata_common::{ChunkCoord, WorldResult};
use tracing::trace;

use crate::chunk::ChunkGeometry;
use crate::pool::ChunkWorkerPool;
use crate::streaming::StreamingScheduler;

/// Completed chunks handed to the scene per tick.
const DRAIN_PER_TICK: usize = 1;

/// World-space placement for a chunk mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkPlacement {
    /// The chunk's grid coordinate
    pub coordinate: ChunkCoord,
    /// World X translation
    pub x: f32,
    /// World Z translation
    pub z: f32,
}

/// Scene collaborator boundary.
///
/// Whoever implements this owns rendering, camera, and lighting from the
/// moment `add_chunk` returns; geometry ownership transfers with the call.
pub trait ChunkSink {
    /// Adds a chunk mesh to the scene at the given placement.
    fn add_chunk(&mut self, placement: ChunkPlacement, geometry: ChunkGeometry);
}

/// Interpolated viewer translation.
///
/// Input collaborators set a target; the glide eases the current
/// translation toward it a fixed fraction per tick.
#[derive(Debug, Clone, Copy)]
pub struct CameraGlide {
    current: Vec3,
    target: Vec3,
    rate: f32,
}

impl CameraGlide {
    /// Creates a glide resting at `start`.
    #[must_use]
    pub fn new(start: Vec3, rate: f32) -> Self {
        Self {
            current: start,
            target: start,
            rate: rate.clamp(0.0, 1.0),
        }
    }

    /// Sets the translation the glide eases toward.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Jumps to a translation with no easing.
    pub fn snap_to(&mut self, translation: Vec3) {
        self.current = translation;
        self.target = translation;
    }

    /// Current viewer translation.
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        self.current
    }

    /// Advances one tick toward the target.
    pub fn advance(&mut self) {
        self.current = self.current.lerp(self.target, self.rate);
    }

    /// Whether the glide has effectively reached its target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current.distance_squared(self.target) < 1e-6
    }
}

/// The cooperative loop step tying pool, scheduler, and scene together.
pub struct FrameIntegrator {
    pool: ChunkWorkerPool,
    scheduler: StreamingScheduler,
    glide: CameraGlide,
    ticks: u64,
    delivered: u64,
}

impl FrameIntegrator {
    /// Creates an integrator over a pool, scheduler, and camera glide.
    #[must_use]
    pub fn new(pool: ChunkWorkerPool, scheduler: StreamingScheduler, glide: CameraGlide) -> Self {
        Self {
            pool,
            scheduler,
            glide,
            ticks: 0,
            delivered: 0,
        }
    }

    /// Runs one cooperative tick.
    ///
    /// Fixed order: pump the pool, deliver at most one completed chunk,
    /// reschedule around the viewer, advance the camera glide. Never
    /// blocks. Chunks that scrolled out of view while generating are
    /// still delivered; there is no discard path.
    pub fn tick(&mut self, sink: &mut dyn ChunkSink) -> WorldResult<()> {
        self.pool.tick();

        for _ in 0..DRAIN_PER_TICK {
            let Some(chunk) = self.pool.pop_completed() else {
                break;
            };
            let (x, z) = chunk
                .coordinate
                .world_origin(self.scheduler.chunk_size(), self.scheduler.scale());
            trace!(x = f64::from(x), z = f64::from(z), "delivering chunk to scene");
            sink.add_chunk(
                ChunkPlacement {
                    coordinate: chunk.coordinate,
                    x,
                    z,
                },
                chunk.geometry,
            );
            self.delivered += 1;
        }

        self.scheduler.update(self.glide.translation(), &mut self.pool)?;
        self.glide.advance();
        self.ticks += 1;
        Ok(())
    }

    /// Mutable access to the camera glide for input collaborators.
    pub fn glide_mut(&mut self) -> &mut CameraGlide {
        &mut self.glide
    }

    /// The current viewer translation.
    #[must_use]
    pub fn viewer_translation(&self) -> Vec3 {
        self.glide.translation()
    }

    /// The underlying worker pool.
    #[must_use]
    pub fn pool(&self) -> &ChunkWorkerPool {
        &self.pool
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Chunks delivered to the scene so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingSink {
        placements: Vec<ChunkPlacement>,
    }

    impl ChunkSink for RecordingSink {
        fn add_chunk(&mut self, placement: ChunkPlacement, geometry: ChunkGeometry) {
            assert!(geometry.validate().is_ok());
            assert!(!geometry.is_empty());
            self.placements.push(placement);
        }
    }

    fn integrator(radius: i32) -> FrameIntegrator {
        let pool = ChunkWorkerPool::new(4);
        let scheduler = StreamingScheduler::new(0, 4, 2.0).with_radius(radius);
        FrameIntegrator::new(pool, scheduler, CameraGlide::new(Vec3::ZERO, 0.1))
    }

    #[test]
    fn test_delivers_at_most_one_chunk_per_tick() {
        let mut integrator = integrator(1);
        let mut sink = RecordingSink::default();
        let deadline = Instant::now() + Duration::from_secs(60);
        while integrator.delivered() < 9 {
            let before = sink.placements.len();
            integrator.tick(&mut sink).expect("tick failed");
            assert!(sink.placements.len() - before <= 1);
            assert!(Instant::now() < deadline, "timed out integrating");
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(sink.placements.len(), 9);
    }

    #[test]
    fn test_placement_is_chunk_origin() {
        let mut integrator = integrator(0);
        let mut sink = RecordingSink::default();
        let deadline = Instant::now() + Duration::from_secs(60);
        while integrator.delivered() < 1 {
            integrator.tick(&mut sink).expect("tick failed");
            assert!(Instant::now() < deadline, "timed out integrating");
            std::thread::sleep(Duration::from_millis(1));
        }
        let placement = sink.placements[0];
        let span = 4.0 * 2.0;
        assert!((placement.x - placement.coordinate.x as f32 * span).abs() < f32::EPSILON);
        assert!((placement.z - placement.coordinate.y as f32 * span).abs() < f32::EPSILON);
    }

    #[test]
    fn test_glide_eases_toward_target() {
        let mut glide = CameraGlide::new(Vec3::ZERO, 0.5);
        glide.set_target(Vec3::new(8.0, 0.0, 0.0));
        glide.advance();
        assert!((glide.translation().x - 4.0).abs() < 1e-6);
        glide.advance();
        assert!((glide.translation().x - 6.0).abs() < 1e-6);
        assert!(!glide.is_settled());
        for _ in 0..64 {
            glide.advance();
        }
        assert!(glide.is_settled());
    }

    #[test]
    fn test_glide_snap() {
        let mut glide = CameraGlide::new(Vec3::ZERO, 0.1);
        glide.snap_to(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(glide.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert!(glide.is_settled());
    }

    #[test]
    fn test_moving_glide_schedules_new_chunks() {
        let mut integrator = integrator(1);
        let mut sink = RecordingSink::default();
        integrator.tick(&mut sink).expect("tick failed");
        let initial = integrator.pool().requested_count();
        assert_eq!(initial, 9);

        // Ease the viewer a few chunks east and keep ticking.
        integrator.glide_mut().snap_to(Vec3::new(-32.0, 0.0, 0.0));
        integrator.tick(&mut sink).expect("tick failed");
        assert!(integrator.pool().requested_count() > initial);
    }
}
