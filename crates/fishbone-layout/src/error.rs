//! Layout errors

/// Placement could not be planned
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// No spine joint exists to carry a rib
    #[error("document has no spine joint to attach to")]
    NoSpine,

    /// Requested category id already names a node
    #[error("node id already taken: {0}")]
    IdTaken(String),
}
