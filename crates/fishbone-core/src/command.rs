//! Typed edit commands and batch decoding
//!
//! Commands arrive as JSON objects tagged by `kind`:
//!
//! ```json
//! [
//!   { "kind": "add_node", "title": "People", "desiredId": "people" },
//!   { "kind": "add_cause", "targetId": "people", "targetKind": "node", "name": "Fatigue" }
//! ]
//! ```
//!
//! The tag is matched loosely (`add_node`, `AddNode`, `addNode` and
//! `ADD_NODE` all name the same command) and payload fields are camelCase.
//! [`decode_batch`] never fails on an individual entry: unknown kinds and
//! malformed payloads are set aside as [`IgnoredCommand`]s so the rest of the
//! batch still runs.

use crate::error::{FishboneError, Result};
use fishbone_model::{TargetKind, TargetRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One edit operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Empty the document
    ClearGraph,

    /// Add a category, or set the problem when the title mentions "problem"
    #[serde(rename_all = "camelCase")]
    AddNode {
        /// Title
        title: String,
        /// Description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Id to use; an existing id turns the command into a no-op
        #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
        desired_id: Option<String>,
    },

    /// Draw a user connection between two nodes
    #[serde(rename_all = "camelCase")]
    ConnectNodes {
        /// Source node
        source_id: String,
        /// Target node
        target_id: String,
        /// Label
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },

    /// Change a node's title and/or description
    #[serde(rename_all = "camelCase")]
    UpdateNode {
        /// Node to change
        id: String,
        /// New title
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// New description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Append a cause to a node or edge
    #[serde(rename_all = "camelCase")]
    AddCause {
        /// Owner id
        target_id: String,
        /// Owner kind
        target_kind: TargetKind,
        /// Cause name
        name: String,
        /// Description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Append evidence to every cause with a matching name
    #[serde(rename_all = "camelCase")]
    AddEvidence {
        /// Owner id
        target_id: String,
        /// Owner kind
        target_kind: TargetKind,
        /// Name of the cause(s) to attach to
        cause_name: String,
        /// Evidence name
        name: String,
        /// Description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

const KINDS: [&str; 6] = [
    "clear_graph",
    "add_node",
    "connect_nodes",
    "update_node",
    "add_cause",
    "add_evidence",
];

impl Command {
    /// Add a node with a generated id
    #[must_use]
    pub fn add_node(title: impl Into<String>) -> Self {
        Self::AddNode {
            title: title.into(),
            description: None,
            desired_id: None,
        }
    }

    /// Add a node with a caller-chosen id
    #[must_use]
    pub fn add_node_with_id(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AddNode {
            title: title.into(),
            description: None,
            desired_id: Some(id.into()),
        }
    }

    /// Connect two nodes
    #[must_use]
    pub fn connect(source: impl Into<String>, target: impl Into<String>, label: Option<String>) -> Self {
        Self::ConnectNodes {
            source_id: source.into(),
            target_id: target.into(),
            label,
        }
    }

    /// Add a cause
    #[must_use]
    pub fn add_cause(target: &TargetRef, name: impl Into<String>) -> Self {
        Self::AddCause {
            target_id: target.id.clone(),
            target_kind: target.kind,
            name: name.into(),
            description: None,
        }
    }

    /// Add evidence
    #[must_use]
    pub fn add_evidence(target: &TargetRef, cause_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AddEvidence {
            target_id: target.id.clone(),
            target_kind: target.kind,
            cause_name: cause_name.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Canonical snake_case tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClearGraph => "clear_graph",
            Self::AddNode { .. } => "add_node",
            Self::ConnectNodes { .. } => "connect_nodes",
            Self::UpdateNode { .. } => "update_node",
            Self::AddCause { .. } => "add_cause",
            Self::AddEvidence { .. } => "add_evidence",
        }
    }
}

/// Map any accepted spelling of a tag onto its snake_case form
fn canonical_kind(raw: &str) -> Option<&'static str> {
    let folded: String = raw
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    KINDS.into_iter().find(|kind| kind.replace('_', "") == folded)
}

/// Why a batch entry was set aside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Entry is not a JSON object
    NotAnObject,
    /// Object has no string `kind`
    MissingKind,
    /// `kind` names no known command
    UnknownKind(String),
    /// Known kind with a payload that does not decode
    Malformed {
        /// Canonical kind
        kind: &'static str,
        /// Decoder message
        reason: String,
    },
}

impl std::fmt::Display for IgnoredReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("not an object"),
            Self::MissingKind => f.write_str("missing kind"),
            Self::UnknownKind(kind) => write!(f, "unknown kind {kind:?}"),
            Self::Malformed { kind, reason } => write!(f, "malformed {kind}: {reason}"),
        }
    }
}

/// Batch entry that was not turned into a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredCommand {
    /// Position in the incoming batch
    pub index: usize,
    /// Why it was set aside
    pub reason: IgnoredReason,
}

/// Result of decoding a raw batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    /// Commands in batch order
    pub commands: Vec<Command>,
    /// Entries that were set aside
    pub ignored: Vec<IgnoredCommand>,
}

/// Decode a JSON batch: an array of commands, or an object whose `commands`
/// field is one
///
/// # Errors
/// `NotABatch` if `value` has neither shape
pub fn decode_batch(value: &Value) -> Result<DecodedBatch> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("commands") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(FishboneError::NotABatch),
        },
        _ => return Err(FishboneError::NotABatch),
    };

    let mut batch = DecodedBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        match decode_entry(entry) {
            Ok(command) => batch.commands.push(command),
            Err(reason) => {
                tracing::warn!(index, %reason, "ignored command");
                batch.ignored.push(IgnoredCommand { index, reason });
            }
        }
    }
    Ok(batch)
}

fn decode_entry(entry: &Value) -> std::result::Result<Command, IgnoredReason> {
    let Value::Object(map) = entry else {
        return Err(IgnoredReason::NotAnObject);
    };
    let raw = map
        .get("kind")
        .and_then(Value::as_str)
        .ok_or(IgnoredReason::MissingKind)?;
    let kind = canonical_kind(raw).ok_or_else(|| IgnoredReason::UnknownKind(raw.to_string()))?;

    let mut normalized = map.clone();
    normalized.insert("kind".to_string(), Value::String(kind.to_string()));
    serde_json::from_value(Value::Object(normalized)).map_err(|err| IgnoredReason::Malformed {
        kind,
        reason: err.to_string(),
    })
}
