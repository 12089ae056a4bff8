//! Engine configuration.
//!
//! Terrain and loop parameters loaded from a TOML file, with defaults
//! when the file is missing or unreadable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "strata.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === World Settings ===
    /// Base seed counter for the terrain field
    pub seed: u32,
    /// Cells per chunk edge
    pub chunk_size: u32,
    /// World units per cell
    pub scale: f32,

    // === Streaming Settings ===
    /// Worker threads generating chunks
    pub max_concurrency: usize,

    // === Loop Settings ===
    /// Target frames per second
    pub target_fps: u32,
    /// Ticks to run before exiting (0 = run forever)
    pub run_ticks: u64,
    /// Viewer drift per tick, in world units
    pub drift_per_tick: f32,
    /// Ticks between progress log lines
    pub log_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_size: 16,
            scale: 16.0,
            max_concurrency: 16,
            target_fps: 60,
            run_ticks: 600,
            drift_per_tick: 2.0,
            log_interval: 60,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(PathBuf::from(CONFIG_FILE))
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.chunk_size = self.chunk_size.clamp(2, 256);
        self.scale = self.scale.clamp(0.25, 64.0);
        self.max_concurrency = self.max_concurrency.clamp(1, 64);
        self.target_fps = self.target_fps.clamp(15, 240);
        self.log_interval = self.log_interval.max(1);
    }
}
