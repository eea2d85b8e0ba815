//! Causes, evidence and the containers that hold them

use crate::ids::{fresh_id, CAUSE_PREFIX, EVIDENCE_PREFIX};
use serde::{Deserialize, Serialize};

/// A supporting artifact for a cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Fresh, never reused id
    pub id: String,
    /// Short label
    pub name: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Evidence {
    /// Create evidence with a freshly minted id
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: fresh_id(EVIDENCE_PREFIX),
            name: name.into(),
            description,
        }
    }
}

/// A contributing factor attached to a node or edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    /// Fresh, never reused id
    pub id: String,
    /// Short label; the lookup key for evidence attachment
    pub name: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Supporting artifacts
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl Cause {
    /// Create cause with a freshly minted id and no evidence
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: fresh_id(CAUSE_PREFIX),
            name: name.into(),
            description,
            evidence: Vec::new(),
        }
    }

    /// Case-insensitive, whole-name comparison. No partial matches.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        names_equal(&self.name, name)
    }
}

/// Case-insensitive equality used for every cause-name lookup
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Which collection a cause target id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// A node's cause list
    #[serde(rename = "node", alias = "NODE", alias = "Node")]
    Node,
    /// An edge's cause list
    #[serde(rename = "edge", alias = "EDGE", alias = "Edge")]
    Edge,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Address of a cause container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    /// Node or edge
    pub kind: TargetKind,
    /// Owner id
    pub id: String,
}

impl TargetRef {
    /// Node cause list
    #[must_use]
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Node,
            id: id.into(),
        }
    }

    /// Edge cause list
    #[must_use]
    pub fn edge(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Edge,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_is_case_insensitive_and_exact() {
        let cause = Cause::new("vendor outage", None);
        assert!(cause.name_matches("Vendor Outage"));
        assert!(cause.name_matches("VENDOR OUTAGE"));
        assert!(!cause.name_matches("Vendor Outages"));
        assert!(!cause.name_matches("vendor"));
    }

    #[test]
    fn new_causes_get_distinct_ids() {
        let a = Cause::new("a", None);
        let b = Cause::new("a", None);
        assert_ne!(a.id, b.id);
        assert!(a.evidence.is_empty());
    }

    #[test]
    fn target_kind_accepts_upper_case() {
        let kind: TargetKind = serde_json::from_str("\"NODE\"").unwrap();
        assert_eq!(kind, TargetKind::Node);
        let kind: TargetKind = serde_json::from_str("\"edge\"").unwrap();
        assert_eq!(kind, TargetKind::Edge);
    }
}
