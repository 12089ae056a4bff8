//! Headless drive loop.
//!
//! Stands in for the windowed viewport: runs the frame integrator at the
//! configured rate with a slowly drifting viewer, and logs chunks as they
//! enter the (recorded, not rendered) scene. Everything a real renderer
//! would consume crosses the same [`ChunkSink`] boundary this scene
//! implements.

use anyhow::Result;
use glam::Vec3;
use tracing::{debug, info};

use strata_world::prelude::*;

use crate::config::EngineConfig;
use crate::timing::FrameTiming;

/// Scene collaborator that records instead of rendering.
#[derive(Debug, Default)]
struct SceneLog {
    chunks: u64,
    triangles: u64,
}

impl ChunkSink for SceneLog {
    fn add_chunk(&mut self, placement: ChunkPlacement, geometry: ChunkGeometry) {
        self.chunks += 1;
        self.triangles += (geometry.triple_count() / 3) as u64;
        debug!(
            x = f64::from(placement.x),
            z = f64::from(placement.z),
            triples = geometry.triple_count(),
            "chunk entered scene"
        );
    }
}

/// Runs the drive loop until the configured tick count elapses.
pub fn run(config: &EngineConfig) -> Result<()> {
    let pool = ChunkWorkerPool::new(config.max_concurrency);
    let scheduler = StreamingScheduler::new(config.seed, config.chunk_size, config.scale);
    info!(
        seed = config.seed,
        chunk_size = config.chunk_size,
        radius = scheduler.radius(),
        workers = config.max_concurrency,
        "world streaming ready"
    );

    let glide = CameraGlide::new(Vec3::ZERO, 0.08);
    let mut integrator = FrameIntegrator::new(pool, scheduler, glide);
    let mut scene = SceneLog::default();
    let mut timing = FrameTiming::new(config.target_fps);

    let mut tick: u64 = 0;
    while config.run_ticks == 0 || tick < config.run_ticks {
        timing.begin_frame();

        // The input layer is external; the drive loop stands in for it by
        // drifting the scene translation westward so the viewer roams east.
        let drift = -(tick as f32) * config.drift_per_tick;
        integrator.glide_mut().set_target(Vec3::new(drift, 0.0, 0.0));

        integrator.tick(&mut scene)?;

        if tick % config.log_interval == 0 {
            info!(
                tick,
                fps = f64::from(timing.current_fps()),
                viewer_x = f64::from(integrator.viewer_translation().x),
                delivered = integrator.delivered(),
                active = integrator.pool().active_count(),
                pending = integrator.pool().pending_count(),
                requested = integrator.pool().requested_count(),
                "frame"
            );
        }

        timing.sleep_remainder();
        tick += 1;
    }

    info!(
        ticks = integrator.ticks(),
        chunks = scene.chunks,
        triangles = scene.triangles,
        "run complete"
    );
    Ok(())
}
