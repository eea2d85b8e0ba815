//! In-memory graph store
//!
//! [`GraphStore`] owns the node and edge collections and exposes the only
//! primitives allowed to change them. Every primitive either succeeds and
//! leaves a structurally sound graph, or fails and changes nothing:
//! - inserts reject duplicate ids and dangling endpoints
//! - node deletion cascades to every edge touching the node
//! - [`GraphStore::apply_all`] applies a mutation list all-or-nothing
//!
//! Insertion order is preserved (`IndexMap`) so exports are stable.

use crate::cause::{Cause, Evidence, TargetKind, TargetRef};
use crate::edge::{Edge, EdgePatch, EdgeStyle};
use crate::error::StoreError;
use crate::node::{Node, NodeKind, NodePatch};
use indexmap::IndexMap;

/// A single primitive store change
///
/// The layout engine plans in terms of these; the store applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMutation {
    /// Insert a new node
    InsertNode(Node),
    /// Merge a patch into an existing node
    UpdateNode {
        /// Target node
        id: String,
        /// Fields to merge
        patch: NodePatch,
    },
    /// Delete a node and its edges
    DeleteNode(String),
    /// Insert a new edge
    InsertEdge(Edge),
    /// Merge a patch into an existing edge
    UpdateEdge {
        /// Target edge
        id: String,
        /// Fields to merge
        patch: EdgePatch,
    },
    /// Delete an edge
    DeleteEdge(String),
}

/// Mutable node/edge collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
}

impl GraphStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw collections, validating every insert
    ///
    /// # Errors
    /// Returns the first duplicate id or dangling endpoint found
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for node in nodes {
            store.insert_node(node)?;
        }
        for edge in edges {
            store.insert_edge(edge)?;
        }
        Ok(store)
    }

    /// True when the store holds no nodes and no edges
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up node
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up edge
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Whether a node with this id exists
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Nodes of one kind, insertion order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    /// Edges of one style, insertion order
    pub fn edges_of_style(&self, style: EdgeStyle) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.style == style)
    }

    /// The problem node, if one exists
    #[must_use]
    pub fn problem(&self) -> Option<&Node> {
        self.nodes_of_kind(NodeKind::Problem).next()
    }

    /// All backbone nodes (tail included) ordered by ascending x
    #[must_use]
    pub fn spine_nodes(&self) -> Vec<&Node> {
        let mut spine: Vec<&Node> = self.nodes.values().filter(|n| n.kind.is_spine()).collect();
        spine.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
        spine
    }

    /// Insert a node
    ///
    /// # Errors
    /// `DuplicateId` if the id is taken
    pub fn insert_node(&mut self, node: Node) -> Result<(), StoreError> {
        if self.nodes.contains_key(&node.id) {
            return Err(StoreError::DuplicateId(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Merge supplied fields into an existing node
    ///
    /// # Errors
    /// `NotFound` if the id is absent
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> Result<(), StoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.merge_into(node);
        Ok(())
    }

    /// Remove a node and every edge touching it
    ///
    /// Returns the removed node and cascaded edges, or `None` if absent.
    pub fn delete_node(&mut self, id: &str) -> Option<(Node, Vec<Edge>)> {
        let node = self.nodes.shift_remove(id)?;
        let cascaded: Vec<Edge> = self.edges.values().filter(|e| e.touches(id)).cloned().collect();
        self.edges.retain(|_, e| !e.touches(id));
        Some((node, cascaded))
    }

    /// Insert an edge
    ///
    /// # Errors
    /// `DanglingEndpoint` if either endpoint is missing, `DuplicateId` if the
    /// edge id is taken
    pub fn insert_edge(&mut self, edge: Edge) -> Result<(), StoreError> {
        self.check_endpoints(&edge)?;
        if self.edges.contains_key(&edge.id) {
            return Err(StoreError::DuplicateId(edge.id));
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Merge supplied fields into an existing edge
    ///
    /// # Errors
    /// `NotFound` if absent, `DanglingEndpoint` if the patch points at a
    /// missing node
    pub fn update_edge(&mut self, id: &str, patch: &EdgePatch) -> Result<(), StoreError> {
        let mut candidate = self
            .edges
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.merge_into(&mut candidate);
        self.check_endpoints(&candidate)?;
        self.edges.insert(id.to_string(), candidate);
        Ok(())
    }

    /// Remove an edge; `None` if absent
    pub fn delete_edge(&mut self, id: &str) -> Option<Edge> {
        self.edges.shift_remove(id)
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Apply one primitive mutation
    ///
    /// # Errors
    /// Whatever the underlying primitive returns. Deletes never fail.
    pub fn apply(&mut self, mutation: StoreMutation) -> Result<(), StoreError> {
        match mutation {
            StoreMutation::InsertNode(node) => self.insert_node(node),
            StoreMutation::UpdateNode { id, patch } => self.update_node(&id, &patch),
            StoreMutation::DeleteNode(id) => {
                self.delete_node(&id);
                Ok(())
            }
            StoreMutation::InsertEdge(edge) => self.insert_edge(edge),
            StoreMutation::UpdateEdge { id, patch } => self.update_edge(&id, &patch),
            StoreMutation::DeleteEdge(id) => {
                self.delete_edge(&id);
                Ok(())
            }
        }
    }

    /// Apply a list of mutations all-or-nothing
    ///
    /// # Errors
    /// The first failing mutation's error; the store is left unchanged
    pub fn apply_all(
        &mut self,
        mutations: impl IntoIterator<Item = StoreMutation>,
    ) -> Result<(), StoreError> {
        let mut scratch = self.clone();
        for mutation in mutations {
            scratch.apply(mutation)?;
        }
        *self = scratch;
        Ok(())
    }

    /// Cause list of a node or edge
    #[must_use]
    pub fn causes(&self, target: &TargetRef) -> Option<&[Cause]> {
        match target.kind {
            TargetKind::Node => self.nodes.get(&target.id).map(|n| n.causes.as_slice()),
            TargetKind::Edge => self.edges.get(&target.id).map(|e| e.causes.as_slice()),
        }
    }

    /// Mutable cause list of a node or edge
    pub fn causes_mut(&mut self, target: &TargetRef) -> Option<&mut Vec<Cause>> {
        match target.kind {
            TargetKind::Node => self.nodes.get_mut(&target.id).map(|n| &mut n.causes),
            TargetKind::Edge => self.edges.get_mut(&target.id).map(|e| &mut e.causes),
        }
    }

    /// Append a cause to a container
    ///
    /// # Errors
    /// `NotFound` if the target is absent
    pub fn add_cause(&mut self, target: &TargetRef, cause: Cause) -> Result<(), StoreError> {
        self.container(target)?.push(cause);
        Ok(())
    }

    /// Append fresh evidence to every cause whose name matches `cause_name`
    ///
    /// Each matching cause gets its own evidence record with its own id.
    /// Returns how many causes matched.
    ///
    /// # Errors
    /// `NotFound` if the target is absent
    pub fn add_evidence(
        &mut self,
        target: &TargetRef,
        cause_name: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<usize, StoreError> {
        let mut matched = 0;
        for cause in self
            .container(target)?
            .iter_mut()
            .filter(|c| c.name_matches(cause_name))
        {
            cause
                .evidence
                .push(Evidence::new(name, description.map(str::to_string)));
            matched += 1;
        }
        Ok(matched)
    }

    /// Remove a cause by id
    ///
    /// # Errors
    /// `NotFound` if the target is absent
    pub fn remove_cause(
        &mut self,
        target: &TargetRef,
        cause_id: &str,
    ) -> Result<Option<Cause>, StoreError> {
        let causes = self.container(target)?;
        Ok(causes
            .iter()
            .position(|c| c.id == cause_id)
            .map(|idx| causes.remove(idx)))
    }

    /// Remove one evidence record from a cause
    ///
    /// # Errors
    /// `NotFound` if the target or the cause is absent
    pub fn remove_evidence(
        &mut self,
        target: &TargetRef,
        cause_id: &str,
        evidence_id: &str,
    ) -> Result<Option<Evidence>, StoreError> {
        let cause = self
            .container(target)?
            .iter_mut()
            .find(|c| c.id == cause_id)
            .ok_or_else(|| StoreError::NotFound(cause_id.to_string()))?;
        Ok(cause
            .evidence
            .iter()
            .position(|e| e.id == evidence_id)
            .map(|idx| cause.evidence.remove(idx)))
    }

    fn container(&mut self, target: &TargetRef) -> Result<&mut Vec<Cause>, StoreError> {
        self.causes_mut(target)
            .ok_or_else(|| StoreError::NotFound(target.id.clone()))
    }

    fn check_endpoints(&self, edge: &Edge) -> Result<(), StoreError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(StoreError::DanglingEndpoint {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
        Ok(())
    }
}
