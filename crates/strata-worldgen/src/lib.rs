//! # Strata Worldgen
//!
//! Deterministic, seeded terrain generation for Strata.
//!
//! This crate provides:
//! - A 32-bit avalanche mixer, the single source of lattice randomness
//! - A bit-reproducible 3D gradient-noise evaluator
//! - Fractal and domain-warped octave sums
//! - The four-band terrain composer that turns `(x, y)` into an integer
//!   height, and whole per-chunk height grids
//!
//! Everything here is pure computation: no I/O, no shared mutable state,
//! safe to evaluate concurrently from any number of worker threads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod composer;
pub mod hash;
pub mod noise;
pub mod octave;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::composer::{HeightGrid, TerrainField};
    pub use crate::octave::{FieldSeed, OctaveField, SeedSequence};
}

pub use prelude::*;
