//! Whole-document snapshot export/import
//!
//! The snapshot is a single JSON object:
//!
//! ```json
//! { "metadata": { "version": "1.0", "timestamp": "2026-01-01T00:00:00Z", "appName": "..." },
//!   "nodes": [ ... ],
//!   "edges": [ ... ] }
//! ```
//!
//! Import checks the top-level shape before decoding anything, and only hands
//! back a [`GraphStore`] once every node and edge has been inserted through the
//! store's validating primitives.

use crate::edge::Edge;
use crate::error::FormatError;
use crate::node::Node;
use crate::store::GraphStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Snapshot format version
    pub version: String,
    /// Export time (RFC 3339 / ISO-8601)
    pub timestamp: DateTime<Utc>,
    /// Producing application
    pub app_name: String,
}

impl SnapshotMetadata {
    /// Metadata stamped with the current time
    #[must_use]
    pub fn now(app_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            timestamp: Utc::now(),
            app_name: app_name.into(),
        }
    }
}

/// Serializable document snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Header
    pub metadata: SnapshotMetadata,
    /// Every node, insertion order
    pub nodes: Vec<Node>,
    /// Every edge, insertion order
    pub edges: Vec<Edge>,
}

impl Snapshot {
    /// Capture the full store
    #[must_use]
    pub fn capture(store: &GraphStore, metadata: SnapshotMetadata) -> Self {
        Self {
            metadata,
            nodes: store.nodes().cloned().collect(),
            edges: store.edges().cloned().collect(),
        }
    }

    /// Pretty JSON rendering
    ///
    /// # Errors
    /// Propagates serializer failures
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a snapshot payload
    ///
    /// `metadata` is optional on import; `nodes` and `edges` are required and
    /// must be arrays.
    ///
    /// # Errors
    /// `FormatError` describing the first problem found
    pub fn parse(json: &str) -> Result<ImportedSnapshot, FormatError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate an already-decoded JSON value
    ///
    /// # Errors
    /// `FormatError` describing the first problem found
    pub fn from_value(mut value: Value) -> Result<ImportedSnapshot, FormatError> {
        let nodes = take_array(&mut value, "nodes")?;
        let edges = take_array(&mut value, "edges")?;

        let metadata = match value.get_mut("metadata").map(Value::take) {
            Some(Value::Null) | None => None,
            Some(raw) => Some(serde_json::from_value::<SnapshotMetadata>(raw)?),
        };
        let nodes: Vec<Node> = serde_json::from_value(nodes)?;
        let edges: Vec<Edge> = serde_json::from_value(edges)?;

        let store = GraphStore::from_parts(nodes, edges)?;
        tracing::debug!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "decoded snapshot"
        );
        Ok(ImportedSnapshot { metadata, store })
    }
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportedSnapshot {
    /// Header, when the payload carried one
    pub metadata: Option<SnapshotMetadata>,
    /// Validated graph
    pub store: GraphStore,
}

fn take_array(value: &mut Value, field: &'static str) -> Result<Value, FormatError> {
    let slot = value
        .get_mut(field)
        .ok_or(FormatError::MissingField(field))?;
    if !slot.is_array() {
        return Err(FormatError::NotAnArray(field));
    }
    Ok(slot.take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cause::{Cause, TargetRef};
    use crate::edge::{EdgeStyle, Handle};
    use crate::node::{NodeKind, Point};
    use pretty_assertions::assert_eq;

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::from_parts(
            [
                Node::tail("tail", Point::new(80.0, 300.0)),
                Node::spine("spine", Point::new(340.0, 300.0)),
                Node::new("cat", NodeKind::Category, "People", Point::new(220.1, 80.3)),
            ],
            [
                Edge::new("s", "tail", "spine", EdgeStyle::Spine),
                Edge::new("r", "cat", "spine", EdgeStyle::Rib).with_handles(Handle::Bottom, Handle::Top),
            ],
        )
        .unwrap();
        store.add_cause(&TargetRef::node("cat"), Cause::new("fatigue", Some("night shift".into()))).unwrap();
        store.add_evidence(&TargetRef::node("cat"), "Fatigue", "rota", None).unwrap();
        store
    }

    #[test]
    fn round_trip_preserves_everything() {
        let store = sample_store();
        let snapshot = Snapshot::capture(&store, SnapshotMetadata::now("Fishbone", "1.0"));
        let json = snapshot.to_json_pretty().unwrap();

        let imported = Snapshot::parse(&json).unwrap();

        assert_eq!(imported.store, store);
        assert_eq!(imported.metadata.unwrap().app_name, "Fishbone");
    }

    #[test]
    fn positions_survive_bit_for_bit() {
        let mut store = GraphStore::new();
        let awkward = Point::new(0.1 + 0.2, -1.0 / 3.0);
        store.insert_node(Node::new("n", NodeKind::Category, "x", awkward)).unwrap();

        let json = Snapshot::capture(&store, SnapshotMetadata::now("a", "1")).to_json_pretty().unwrap();
        let imported = Snapshot::parse(&json).unwrap();

        let position = imported.store.node("n").unwrap().position;
        assert_eq!(position.x.to_bits(), awkward.x.to_bits());
        assert_eq!(position.y.to_bits(), awkward.y.to_bits());
    }

    #[test]
    fn missing_edges_is_rejected() {
        let err = Snapshot::parse(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(err, FormatError::MissingField("edges")));
    }

    #[test]
    fn non_array_nodes_is_rejected() {
        let err = Snapshot::parse(r#"{"nodes": {}, "edges": []}"#).unwrap_err();
        assert!(matches!(err, FormatError::NotAnArray("nodes")));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let json = r#"{"nodes": [], "edges": [{"id":"e","source":"a","target":"b","style":"connection"}]}"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert!(matches!(err, FormatError::Structure(_)));
    }

    #[test]
    fn metadata_is_optional() {
        let imported = Snapshot::parse(r#"{"nodes": [], "edges": []}"#).unwrap();
        assert!(imported.metadata.is_none());
        assert!(imported.store.is_empty());
    }
}
