//! Identifier generation
//!
//! Every id minted here is a lowercase ULID behind a short kind prefix
//! (`category-01h...`, `cause-01h...`). ULIDs are never recycled, so an id
//! that has been deleted cannot come back attached to a different entity.

use ulid::Ulid;

/// Prefix for spine nodes
pub const SPINE_PREFIX: &str = "spine";
/// Prefix for the sentinel tail node
pub const TAIL_PREFIX: &str = "tail";
/// Prefix for category nodes
pub const CATEGORY_PREFIX: &str = "category";
/// Prefix for the problem node
pub const PROBLEM_PREFIX: &str = "problem";
/// Prefix for structural spine edges
pub const SPINE_EDGE_PREFIX: &str = "spine-edge";
/// Prefix for rib edges
pub const RIB_PREFIX: &str = "rib";
/// Prefix for user-drawn connections
pub const EDGE_PREFIX: &str = "edge";
/// Prefix for causes
pub const CAUSE_PREFIX: &str = "cause";
/// Prefix for evidence
pub const EVIDENCE_PREFIX: &str = "evidence";

/// Mint a fresh id with the given prefix
#[must_use]
pub fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new().to_string().to_lowercase())
}
