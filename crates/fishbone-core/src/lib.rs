//! Fishbone Core
//!
//! Turns typed edit commands into committed, structurally valid fishbone
//! documents.
//!
//! # Core Concepts
//!
//! - [`Command`]: closed set of edit operations, decoded once by [`decode_batch`]
//! - [`Interpreter`]: runs a batch on a private copy and reports per command
//! - [`Document`]: single-writer handle owning the committed store
//! - [`Advisor`]: async boundary to an external advisory process
//! - [`FishboneConfig`]: layout, snapshot and advisory settings from TOML
//!
//! # Example
//!
//! ```rust
//! use fishbone_core::{Command, Document};
//! use fishbone_model::TargetRef;
//!
//! let doc = Document::new("Late deliveries").unwrap();
//! let report = doc.apply_batch(&[
//!     Command::add_node_with_id("People", "people"),
//!     Command::add_cause(&TargetRef::node("people"), "Fatigue"),
//! ]);
//!
//! assert_eq!(report.log.len(), 2);
//! assert!(doc.validate().is_empty());
//! ```

#![warn(unreachable_pub)]

mod advisory;
mod change_log;
mod command;
mod config;
mod document;
mod error;
mod interpreter;

// Re-exports
pub use advisory::{Advisor, AdvisorReply, AdvisoryRequest, BatchReport, TurnOutcome};
pub use change_log::ChangeLog;
pub use command::{decode_batch, Command, DecodedBatch, IgnoredCommand, IgnoredReason};
pub use config::{AdvisorySettings, FishboneConfig, SnapshotSettings};
pub use document::{Document, NodeDeleter};
pub use error::{AdvisoryError, FishboneError, Result};
pub use interpreter::{BatchOutcome, CommandOutcome, CommandReport, Interpreter, SkipReason};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
