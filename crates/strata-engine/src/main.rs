//! # Strata Engine
//!
//! Headless entry point for Strata's streaming terrain core.
//!
//! This binary ties the subsystems together without a renderer:
//! - Worldgen: the seeded terrain field
//! - World: chunk workers, streaming, per-frame integration
//! - A recording scene standing in for the external renderer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .init();

    info!("Strata starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = config::EngineConfig::load();
    config.validate();

    app::run(&config)?;

    info!("Strata shutdown complete");
    Ok(())
}
