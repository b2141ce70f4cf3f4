//! Error types for the few fallible edges of the core.
//!
//! Per-tick state transitions never fail; only body construction, level
//! validation and configuration loading return these.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("body must have a positive size, got {width}x{height}")]
    DegenerateBody { width: f32, height: f32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LevelError {
    #[error("platforms {first} and {second} overlap")]
    Overlap { first: usize, second: usize },

    #[error("{what} lies outside the level bounds ({width}x{height})")]
    OutOfBounds {
        what: String,
        width: f32,
        height: f32,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("{what} size is invalid: {source}")]
    Geometry {
        what: &'static str,
        #[source]
        source: GeometryError,
    },

    #[error("invalid config value: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}
