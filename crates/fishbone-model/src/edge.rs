//! Diagram edges

use crate::cause::Cause;
use serde::{Deserialize, Serialize};

/// Visual style tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Thick backbone segment (spine to spine, spine to problem)
    Spine,
    /// Thin category-to-spine segment
    Rib,
    /// User-drawn connection
    Connection,
}

impl EdgeStyle {
    /// Suggested stroke width for renderers
    #[must_use]
    pub fn stroke_width(self) -> f64 {
        match self {
            Self::Spine => 4.0,
            Self::Rib => 2.0,
            Self::Connection => 1.5,
        }
    }
}

/// Connector attachment point on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Upper edge
    Top,
    /// Lower edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique id
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Text shown on the connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Causes that belong to the relationship itself
    #[serde(default)]
    pub causes: Vec<Cause>,
    /// Visual style tag
    pub style: EdgeStyle,
    /// Attachment point on the source node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Handle>,
    /// Attachment point on the target node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<Handle>,
}

impl Edge {
    /// Create edge without label, causes or handles
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        style: EdgeStyle,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            causes: Vec::new(),
            style,
            source_handle: None,
            target_handle: None,
        }
    }

    /// With label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// With connector handles
    #[inline]
    #[must_use]
    pub fn with_handles(mut self, source: Handle, target: Handle) -> Self {
        self.source_handle = Some(source);
        self.target_handle = Some(target);
        self
    }

    /// Whether `node_id` is either endpoint
    #[inline]
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Partial edge update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    /// Replacement label
    pub label: Option<String>,
    /// Replacement source
    pub source: Option<String>,
    /// Replacement target
    pub target: Option<String>,
}

impl EdgePatch {
    /// Patch that re-targets the edge
    #[must_use]
    pub fn retarget(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Patch that relabels the edge
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub(crate) fn merge_into(&self, edge: &mut Edge) {
        if let Some(label) = &self.label {
            edge.label = Some(label.clone());
        }
        if let Some(source) = &self.source {
            edge.source.clone_from(source);
        }
        if let Some(target) = &self.target {
            edge.target.clone_from(target);
        }
    }
}
