//! # World Error Types
//!
//! Errors only exist at the edges of the core: loading configuration and
//! accepting snapshots from a persistence collaborator. Block lookups,
//! streaming and fluid updates are total and never produce one of these.

use thiserror::Error;

use crate::chunk::ChunkCoord;

/// Errors that can occur while configuring or restoring a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("invalid config syntax: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A snapshot contained a chunk twice.
    #[error("snapshot contains chunk [{}, {}] more than once", .0.x, .0.z)]
    DuplicateChunk(ChunkCoord),

    /// A snapshot contained a block outside its chunk's local bounds.
    #[error("snapshot chunk [{}, {}] has out-of-range local position ({x}, {y}, {z})", .coord.x, .coord.z)]
    LocalOutOfRange {
        /// Chunk that held the bad entry.
        coord: ChunkCoord,
        /// Local X as stored.
        x: u8,
        /// Local Y as stored.
        y: u8,
        /// Local Z as stored.
        z: u8,
    },

    /// A block type name did not match any known type.
    #[error("unknown block type: {0}")]
    UnknownBlockType(String),
}

/// Result type for world operations that can fail.
pub type WorldResult<T> = Result<T, WorldError>;
