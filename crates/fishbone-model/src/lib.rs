//! Fishbone Document Model
//!
//! Typed entities and the mutable store for Ishikawa diagrams.
//!
//! # Core Concepts
//!
//! - [`Node`]: spine joint, tail sentinel, category or problem
//! - [`Edge`]: spine segment, rib or user-drawn connection
//! - [`Cause`] / [`Evidence`]: nested content on nodes and edges
//! - [`GraphStore`]: invariant-preserving CRUD primitives
//! - [`Snapshot`]: whole-document export/import format
//! - [`GraphContext`]: content-only projection for advisory turns
//! - [`validate_structure`]: full structural invariant check
//!
//! # Example
//!
//! ```rust
//! use fishbone_model::{Cause, GraphStore, Node, NodeKind, Point, TargetRef};
//!
//! let mut store = GraphStore::new();
//! store.insert_node(Node::new("people", NodeKind::Category, "People", Point::new(0.0, 0.0))).unwrap();
//! store.add_cause(&TargetRef::node("people"), Cause::new("Fatigue", None)).unwrap();
//!
//! let matched = store.add_evidence(&TargetRef::node("people"), "fatigue", "Shift rota", None).unwrap();
//! assert_eq!(matched, 1);
//! ```

#![warn(unreachable_pub)]

mod cause;
mod context;
mod edge;
mod error;
pub mod ids;
mod node;
mod snapshot;
mod store;
mod validation;

// Re-exports
pub use cause::{names_equal, Cause, Evidence, TargetKind, TargetRef};
pub use context::{EdgeContext, GraphContext, NodeContext};
pub use edge::{Edge, EdgePatch, EdgeStyle, Handle};
pub use error::{FormatError, StoreError};
pub use node::{Node, NodeKind, NodePatch, Point, Slot};
pub use snapshot::{ImportedSnapshot, Snapshot, SnapshotMetadata};
pub use store::{GraphStore, StoreMutation};
pub use validation::{validate_structure, InvariantViolation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
