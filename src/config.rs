//! # Configuration Module
//!
//! Runtime configuration for the terrain engine, loadable from a JSON file.
//! Every field has a default, so a config file only needs to name the values
//! it overrides.

use std::fmt;
use std::path::Path;

use cgmath::Vector2;
use serde::{Deserialize, Serialize};

/// Tunable engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the procedural height/biome field.
    pub world_seed: u64,

    /// Columns every chunk covers in x and z.
    pub chunk_size: [i32; 2],

    /// How many incremental edits a chunk batches before its next
    /// maintenance pass forces a full mesh rebuild.
    pub max_dirty_count: u32,

    /// Worker threads for chunk generation.
    pub worker_threads: usize,

    /// Capacity of the bounded queue handing mesh uploads and collision
    /// rebuilds to the primary thread.
    pub render_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            world_seed: 0,
            chunk_size: [32, 32],
            max_dirty_count: 15,
            worker_threads: 4,
            render_queue_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// The chunk size as a vector.
    pub fn chunk_size_vec(&self) -> Vector2<i32> {
        Vector2::new(self.chunk_size[0], self.chunk_size[1])
    }

    /// Loads a config from a JSON file. Missing fields fall back to their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Failure to read or parse a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid JSON for an `EngineConfig`.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "failed to read config file: {error}"),
            ConfigError::Parse(error) => write!(f, "failed to parse config file: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}
