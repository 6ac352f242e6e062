//! # Error Types
//!
//! The chunk core itself never fails: block lookups fall back to air, UV lookups
//! fall back to the unit rectangle and grid access is bounds-checked. The only
//! fallible surfaces are the ones that touch outside data, namely configuration
//! loading and modification-log (de)serialization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration loading and modification-log I/O.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON input did not match the expected shape.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used by the fallible entry points of this crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
