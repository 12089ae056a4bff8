//! Error types for Strata.
//!
//! The core is pure computation, so the taxonomy is narrow: bad scheduling
//! input, an isolated compute-unit failure, or a geometry invariant that a
//! programming defect broke. Nothing here is retried: generation is
//! deterministic, so re-running an identical request reproduces the same
//! outcome and any failure must be fixed in code.

use thiserror::Error;

/// World and streaming errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Viewer translation contained a non-finite component
    #[error("viewpoint translation is not finite: ({x}, {y}, {z})")]
    InvalidViewpoint {
        /// X component
        x: f32,
        /// Y component
        y: f32,
        /// Z component
        z: f32,
    },

    /// Geometry buffers disagree on their triple counts
    #[error("geometry buffers disagree: {vertices} vertex, {normals} normal, {colors} color components")]
    MalformedGeometry {
        /// Vertex component count
        vertices: usize,
        /// Normal component count
        normals: usize,
        /// Color component count
        colors: usize,
    },
}

/// Result type alias for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
