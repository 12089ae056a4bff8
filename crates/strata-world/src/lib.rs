//! # Strata World
//!
//! Chunk streaming for Strata.
//!
//! This crate handles everything between a terrain field and a scene:
//! - Chunk request/geometry value types and their wire format
//! - Height grid to triangle-soup meshing
//! - The bounded worker pool generating chunks off the cooperative thread
//! - Viewport-driven scheduling around the viewer
//! - The per-frame integrator that drains results without blocking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod integrator;
pub mod mesh;
pub mod pool;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::{ChunkGeometry, ChunkRequest, CompletedChunk};
    pub use crate::integrator::{CameraGlide, ChunkPlacement, ChunkSink, FrameIntegrator};
    pub use crate::mesh::build_chunk_geometry;
    pub use crate::pool::{ChunkWorkerPool, DEFAULT_MAX_CONCURRENCY};
    pub use crate::streaming::StreamingScheduler;
}

pub use prelude::*;
