//! Reduced document projection for the advisory collaborator
//!
//! Carries only what matters for reasoning about content: ids, titles,
//! descriptions, labels and causes. Positions, handles and styles are dropped.

use crate::cause::Cause;
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};

/// Content view of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeContext {
    /// Node id
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Causes with their evidence
    pub causes: Vec<Cause>,
}

/// Content view of one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeContext {
    /// Edge id
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Causes with their evidence
    pub causes: Vec<Cause>,
}

/// Projection sent with every advisory turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphContext {
    /// Every node
    pub nodes: Vec<NodeContext>,
    /// Every edge
    pub edges: Vec<EdgeContext>,
}

impl GraphContext {
    /// Project the store
    #[must_use]
    pub fn project(store: &GraphStore) -> Self {
        Self {
            nodes: store
                .nodes()
                .map(|n| NodeContext {
                    id: n.id.clone(),
                    title: n.title.clone(),
                    description: n.description.clone(),
                    causes: n.causes.clone(),
                })
                .collect(),
            edges: store
                .edges()
                .map(|e| EdgeContext {
                    id: e.id.clone(),
                    source: e.source.clone(),
                    target: e.target.clone(),
                    label: e.label.clone(),
                    causes: e.causes.clone(),
                })
                .collect(),
        }
    }
}
