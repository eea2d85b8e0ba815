//! Error types for the document model
//!
//! - [`StoreError`]: structural violations raised by store primitives
//! - [`FormatError`]: malformed snapshot payloads

/// Graph store primitive failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Id already present
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Edge endpoint does not reference an existing node
    #[error("edge {edge} references missing node {endpoint}")]
    DanglingEndpoint {
        /// Offending edge
        edge: String,
        /// Missing node id
        endpoint: String,
    },

    /// Target id absent
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Check if this is a lookup miss rather than a structural violation
    #[inline]
    #[must_use]
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Snapshot import failures
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Payload is not JSON or does not match the node/edge schema
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Required top-level field absent
    #[error("snapshot is missing `{0}`")]
    MissingField(&'static str),

    /// Top-level field has the wrong JSON type
    #[error("snapshot field `{0}` must be an array")]
    NotAnArray(&'static str),

    /// Nodes and edges parse but do not form a valid graph
    #[error("snapshot graph is inconsistent: {0}")]
    Structure(#[from] StoreError),
}
