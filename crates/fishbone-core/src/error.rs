//! Error types for Fishbone Core
//!
//! Provides the top-level error for:
//! - Document edits that the store refuses
//! - Snapshot import failures
//! - Configuration loading and validation
//! - Advisory turns that produced nothing usable

use fishbone_layout::{ConfigError, LayoutError};
use fishbone_model::{FormatError, StoreError};
use std::path::PathBuf;

/// Main fishbone error type
#[derive(Debug, thiserror::Error)]
pub enum FishboneError {
    /// Store primitive refused an edit
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Snapshot payload was rejected
    #[error("snapshot format error: {0}")]
    Format(#[from] FormatError),

    /// Layout could not be planned
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Layout constants are inconsistent
    #[error("invalid layout configuration: {0}")]
    Geometry(#[from] ConfigError),

    /// Advisory collaborator failed
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    /// Command payload is neither an array nor an object with `commands`
    #[error("command batch must be an array or an object with a `commands` array")]
    NotABatch,

    /// Spine, tail and problem nodes cannot be deleted through the document
    #[error("node {0} is structural and cannot be deleted")]
    StructuralNode(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`FishboneConfig`](crate::FishboneConfig)
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON rendering failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FishboneError {
    /// Whether the error came from the payload the caller handed in rather
    /// than from the document's state
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::NotABatch | Self::Toml(_) | Self::Json(_)
        )
    }
}

/// Failure of the advisory collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    /// Transport or provider failure
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    /// No reply within the configured deadline
    #[error("advisor did not reply within {secs}s")]
    Timeout {
        /// Deadline that elapsed
        secs: u64,
    },

    /// Reply carried neither a message nor commands
    #[error("advisor reply was empty")]
    EmptyReply,

    /// Reply commands could not be read as a batch
    #[error("advisor reply was unusable: {0}")]
    UnusableReply(String),
}

/// Result type alias for fishbone operations
pub type Result<T> = std::result::Result<T, FishboneError>;
