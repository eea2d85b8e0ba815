//! Fishbone Layout
//!
//! Decides where categories attach and when the spine grows.
//!
//! # Core Concepts
//!
//! - [`LayoutConfig`]: geometry constants (baseline, rows, offsets)
//! - [`LayoutEngine`]: plans backbones and category placements as
//!   [`StoreMutation`](fishbone_model::StoreMutation) lists
//! - [`occupancy`]: which slots of a spine joint are taken
//!
//! # Example
//!
//! ```rust
//! use fishbone_layout::{CategoryRequest, LayoutEngine, ProblemSeed};
//! use fishbone_model::{GraphStore, Slot};
//!
//! let engine = LayoutEngine::default();
//! let mut store = GraphStore::new();
//! store.apply_all(engine.plan_backbone(&store, ProblemSeed::new("Late deliveries")).mutations).unwrap();
//!
//! let placement = engine.place_category(&store, CategoryRequest::new("People")).unwrap();
//! assert_eq!(placement.slot, Slot::Above);
//! store.apply_all(placement.mutations).unwrap();
//! assert!(engine.validate(&store).is_empty());
//! ```

#![warn(unreachable_pub)]

mod config;
mod engine;
mod error;
mod slots;

// Re-exports
pub use config::{ConfigError, LayoutConfig};
pub use engine::{BackbonePlan, CategoryRequest, LayoutEngine, Placement, ProblemSeed};
pub use error::LayoutError;
pub use slots::{occupancy, rib_handles, SlotOccupancy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
