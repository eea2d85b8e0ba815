//! The document handle
//!
//! [`Document`] owns the committed store and is the single writer:
//! - batches run on a private copy while holding the lock's upgradable read,
//!   so readers are never blocked and no second batch can start
//! - the copy replaces the committed store in one write-locked swap
//! - direct edits (deletes, relabels, cause removal) take the write lock for
//!   exactly one store primitive
//!
//! The lock is never held across an `.await`.

use crate::advisory::{Advisor, AdvisoryRequest, BatchReport, TurnOutcome};
use crate::command::{decode_batch, Command, DecodedBatch};
use crate::config::FishboneConfig;
use crate::error::{AdvisoryError, FishboneError, Result};
use crate::interpreter::{BatchOutcome, Interpreter};
use fishbone_layout::{LayoutEngine, ProblemSeed};
use fishbone_model::{
    Cause, EdgePatch, Evidence, GraphContext, GraphStore, InvariantViolation, Node, NodeKind,
    Snapshot, SnapshotMetadata, TargetRef,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard};
use serde_json::Value;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Editable fishbone document
#[derive(Debug)]
pub struct Document {
    store: Arc<RwLock<GraphStore>>,
    interpreter: Interpreter,
    config: FishboneConfig,
}

impl Document {
    /// Initialized document with default configuration
    ///
    /// # Errors
    /// See [`Self::with_config`]
    pub fn new(problem_title: &str) -> Result<Self> {
        Self::with_config(problem_title, FishboneConfig::default())
    }

    /// Initialized document: tail, one spine joint and the problem
    ///
    /// # Errors
    /// `Geometry`/`InvalidConfig` if `config` does not validate
    pub fn with_config(problem_title: &str, config: FishboneConfig) -> Result<Self> {
        let document = Self::empty(config)?;
        {
            let mut store = document.store.write();
            let plan = document
                .interpreter
                .layout()
                .plan_backbone(&store, ProblemSeed::new(problem_title));
            store.apply_all(plan.mutations)?;
        }
        tracing::info!(problem = problem_title, "initialized document");
        Ok(document)
    }

    /// Document with no nodes at all
    ///
    /// # Errors
    /// `Geometry`/`InvalidConfig` if `config` does not validate
    pub fn empty(config: FishboneConfig) -> Result<Self> {
        Self::from_store(GraphStore::new(), config)
    }

    /// Document over an existing store
    ///
    /// # Errors
    /// `Geometry`/`InvalidConfig` if `config` does not validate
    pub fn from_store(store: GraphStore, config: FishboneConfig) -> Result<Self> {
        config.validate()?;
        let interpreter = Interpreter::new(
            LayoutEngine::new(config.layout),
            config.default_problem_title.clone(),
        );
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            interpreter,
            config,
        })
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &FishboneConfig {
        &self.config
    }

    /// Shared read access to the committed store
    ///
    /// Drop the guard before running a batch or a direct edit on the same
    /// thread: the commit waits for every reader, so a held guard deadlocks
    /// it. Use [`Self::snapshot`] for a copy that outlives later edits.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.store.read()
    }

    /// Owned copy of the committed store
    #[must_use]
    pub fn snapshot(&self) -> GraphStore {
        self.store.read().clone()
    }

    /// Run a batch and commit it
    pub fn apply_batch(&self, commands: &[Command]) -> BatchReport {
        self.apply_batch_if(commands, |_| true)
    }

    /// Run a batch and commit it only if `accept` approves the outcome
    ///
    /// A rejected batch leaves the document exactly as it was.
    pub fn apply_batch_if(
        &self,
        commands: &[Command],
        accept: impl FnOnce(&BatchOutcome) -> bool,
    ) -> BatchReport {
        let guard = self.store.upgradable_read();
        let outcome = self.interpreter.run(&guard, commands);

        let committed = accept(&outcome);
        if committed {
            let mut store = RwLockUpgradableReadGuard::upgrade(guard);
            *store = outcome.store;
            tracing::info!(
                commands = commands.len(),
                applied = outcome.log.len(),
                nodes = store.node_count(),
                edges = store.edge_count(),
                "committed batch"
            );
        } else {
            tracing::info!(commands = commands.len(), "discarded batch");
        }

        BatchReport {
            reports: outcome.reports,
            log: outcome.log,
            ignored: Vec::new(),
            committed,
        }
    }

    /// Decode a raw JSON batch and apply it
    ///
    /// # Errors
    /// `NotABatch` if `value` is neither an array nor an object with a
    /// `commands` array
    pub fn apply_json(&self, value: &Value) -> Result<BatchReport> {
        let DecodedBatch { commands, ignored } = decode_batch(value)?;
        let mut report = self.apply_batch(&commands);
        report.ignored = ignored;
        Ok(report)
    }

    /// Deletion capability for a category node
    ///
    /// `None` if the node is absent or structural.
    #[must_use]
    pub fn deleter(&self, node_id: &str) -> Option<NodeDeleter> {
        let store = self.store.read();
        let node = store.node(node_id)?;
        if node.kind.is_structural() {
            return None;
        }
        Some(NodeDeleter {
            node_id: node.id.clone(),
            store: Arc::downgrade(&self.store),
        })
    }

    /// Delete a category node and every edge touching it
    ///
    /// Returns the removed node, or `None` if it was already gone.
    ///
    /// # Errors
    /// `StructuralNode` for spine, tail and problem nodes
    pub fn delete_node(&self, node_id: &str) -> Result<Option<Node>> {
        let mut store = self.store.write();
        match store.node(node_id) {
            None => return Ok(None),
            Some(node) if node.kind.is_structural() => {
                return Err(FishboneError::StructuralNode(node_id.to_string()))
            }
            Some(_) => {}
        }
        let removed = store.delete_node(node_id);
        if let Some((_, edges)) = &removed {
            tracing::info!(node = node_id, edges = edges.len(), "deleted node");
        }
        Ok(removed.map(|(node, _)| node))
    }

    /// Set an edge's label
    ///
    /// # Errors
    /// `Store(NotFound)` if the edge is absent
    pub fn update_edge_label(&self, edge_id: &str, label: &str) -> Result<()> {
        self.store.write().update_edge(edge_id, &EdgePatch::label(label))?;
        Ok(())
    }

    /// Remove a cause by id
    ///
    /// # Errors
    /// `Store(NotFound)` if the target is absent
    pub fn remove_cause(&self, target: &TargetRef, cause_id: &str) -> Result<Option<Cause>> {
        Ok(self.store.write().remove_cause(target, cause_id)?)
    }

    /// Remove one evidence record
    ///
    /// # Errors
    /// `Store(NotFound)` if the target or cause is absent
    pub fn remove_evidence(
        &self,
        target: &TargetRef,
        cause_id: &str,
        evidence_id: &str,
    ) -> Result<Option<Evidence>> {
        Ok(self
            .store
            .write()
            .remove_evidence(target, cause_id, evidence_id)?)
    }

    /// Snapshot stamped with the configured header
    #[must_use]
    pub fn export(&self) -> Snapshot {
        let metadata = SnapshotMetadata::now(
            self.config.snapshot.app_name.clone(),
            self.config.snapshot.format_version.clone(),
        );
        Snapshot::capture(&self.store.read(), metadata)
    }

    /// Snapshot as pretty JSON
    ///
    /// # Errors
    /// `Json` if rendering fails
    pub fn export_json(&self) -> Result<String> {
        Ok(self.export().to_json_pretty()?)
    }

    /// Replace the document with an imported snapshot
    ///
    /// Returns the payload's header, if it carried one. Previously issued
    /// [`NodeDeleter`]s keep addressing this document and act on the new
    /// content by id.
    ///
    /// # Errors
    /// `Format` if the payload is rejected; the document is left untouched
    pub fn import_json(&self, json: &str) -> Result<Option<SnapshotMetadata>> {
        let imported = Snapshot::parse(json)?;
        let violations = self.interpreter.layout().validate(&imported.store);
        if !violations.is_empty() {
            tracing::warn!(
                violations = violations.len(),
                "imported snapshot breaks structural invariants"
            );
        }
        let mut store = self.store.write();
        *store = imported.store;
        tracing::info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "imported snapshot"
        );
        Ok(imported.metadata)
    }

    /// Content-only projection for the advisor
    #[must_use]
    pub fn context(&self) -> GraphContext {
        GraphContext::project(&self.store.read())
    }

    /// Every structural invariant the document breaks
    #[must_use]
    pub fn validate(&self) -> Vec<InvariantViolation> {
        self.interpreter.layout().validate(&self.store.read())
    }

    /// Run one advisory turn
    ///
    /// The advisor sees the current context; its reply's commands are
    /// applied as one batch. Timeouts, advisor errors, undecodable batches
    /// and replies with neither prose nor commands degrade the turn and
    /// leave the document untouched.
    pub async fn consult(&self, advisor: &dyn Advisor, message: &str) -> TurnOutcome {
        let request = AdvisoryRequest {
            message: message.to_string(),
            context: self.context(),
        };
        let secs = self.config.advisory.timeout_secs;

        let reply = match tokio::time::timeout(Duration::from_secs(secs), advisor.advise(request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(reason)) => return degraded(reason),
            Err(_) => return degraded(AdvisoryError::Timeout { secs }),
        };

        let batch = if reply.commands.is_null() {
            DecodedBatch::default()
        } else {
            match decode_batch(&reply.commands) {
                Ok(batch) => batch,
                Err(err) => return degraded(AdvisoryError::UnusableReply(err.to_string())),
            }
        };
        if batch.commands.is_empty() && reply.message.trim().is_empty() {
            return degraded(AdvisoryError::EmptyReply);
        }

        let mut report = self.apply_batch(&batch.commands);
        report.ignored = batch.ignored;
        TurnOutcome::Applied {
            message: reply.message,
            report,
        }
    }
}

fn degraded(reason: AdvisoryError) -> TurnOutcome {
    tracing::warn!(%reason, "advisory turn degraded");
    TurnOutcome::Degraded { reason }
}

/// Capability to delete one category node
///
/// Holds only a weak reference; once the document is dropped the deleter
/// does nothing.
#[derive(Debug, Clone)]
pub struct NodeDeleter {
    node_id: String,
    store: Weak<RwLock<GraphStore>>,
}

impl NodeDeleter {
    /// Node this deleter removes
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Delete the node and its edges
    ///
    /// Returns whether anything was removed.
    pub fn delete(&self) -> bool {
        let Some(store) = self.store.upgrade() else {
            return false;
        };
        let mut store = store.write();
        if store.node(&self.node_id).map(|n| n.kind) != Some(NodeKind::Category) {
            return false;
        }
        store.delete_node(&self.node_id).is_some()
    }
}
