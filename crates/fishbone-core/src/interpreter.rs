//! Command interpreter
//!
//! Runs an ordered batch of [`Command`]s against a private copy of the
//! committed store. Each command sees the effects of the ones before it. A
//! command that cannot apply (missing target, duplicate id, nothing to
//! change) is skipped with a [`SkipReason`] and never aborts the batch.
//!
//! The caller decides whether to commit [`BatchOutcome::store`]; the
//! committed store passed in is never touched.

use crate::change_log::ChangeLog;
use crate::command::Command;
use fishbone_layout::{CategoryRequest, LayoutEngine, LayoutError, ProblemSeed};
use fishbone_model::ids::{fresh_id, CATEGORY_PREFIX, EDGE_PREFIX};
use fishbone_model::{
    names_equal, Cause, Edge, EdgeStyle, GraphStore, NodeKind, NodePatch, StoreError, TargetKind,
    TargetRef,
};

/// Why a command left the document unchanged
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    /// `desiredId` already names a node
    #[error("node {0} already exists")]
    DuplicateId(String),

    /// Referenced node is absent
    #[error("no node {0}")]
    MissingNode(String),

    /// Cause container is absent
    #[error("no {0}")]
    MissingTarget(TargetRef),

    /// Spine joints and the tail never hold causes
    #[error("{0} is part of the spine and holds no causes")]
    StructuralTarget(TargetRef),

    /// Container already has a cause with this name
    #[error("{target} already has a cause named {name:?}")]
    DuplicateCause {
        /// Container
        target: TargetRef,
        /// Clashing name
        name: String,
    },

    /// No cause in the container carries the name
    #[error("{target} has no cause named {cause_name:?}")]
    NoMatchingCause {
        /// Container
        target: TargetRef,
        /// Name looked up
        cause_name: String,
    },

    /// Update named no field to change
    #[error("nothing to update")]
    EmptyPatch,

    /// Layout refused the placement
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Store refused a mutation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Applied; carries the change-log line
    Applied(String),
    /// Left the document unchanged
    Skipped(SkipReason),
}

/// Per-command report
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    /// Position in the batch
    pub index: usize,
    /// Canonical command kind
    pub kind: &'static str,
    /// Node the command created or resolved to, if any
    pub node_id: Option<String>,
    /// Applied or skipped
    pub outcome: CommandOutcome,
}

impl CommandReport {
    /// Whether the command changed the document
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Applied(_))
    }

    /// Skip reason, if skipped
    #[must_use]
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.outcome {
            CommandOutcome::Skipped(reason) => Some(reason),
            CommandOutcome::Applied(_) => None,
        }
    }
}

/// Result of running a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Working copy after every command
    pub store: GraphStore,
    /// One report per command
    pub reports: Vec<CommandReport>,
    /// One line per applied command
    pub log: ChangeLog,
}

impl BatchOutcome {
    /// Number of applied commands
    #[must_use]
    pub fn applied(&self) -> usize {
        self.reports.iter().filter(|r| r.is_applied()).count()
    }

    /// Number of skipped commands
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.reports.len() - self.applied()
    }
}

struct Applied {
    summary: String,
    node_id: Option<String>,
}

impl Applied {
    fn new(summary: String) -> Self {
        Self {
            summary,
            node_id: None,
        }
    }

    fn on(mut self, node_id: String) -> Self {
        self.node_id = Some(node_id);
        self
    }
}

type Step = Result<Applied, SkipReason>;

/// Batch executor
#[derive(Debug, Clone)]
pub struct Interpreter {
    layout: LayoutEngine,
    default_problem_title: String,
}

impl Interpreter {
    /// Interpreter placing categories with `layout`
    ///
    /// `default_problem_title` names the placeholder problem laid down when a
    /// category is added to an empty document.
    #[must_use]
    pub fn new(layout: LayoutEngine, default_problem_title: impl Into<String>) -> Self {
        Self {
            layout,
            default_problem_title: default_problem_title.into(),
        }
    }

    /// Layout engine in use
    #[must_use]
    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Run `commands` in order against a copy of `committed`
    #[must_use]
    pub fn run(&self, committed: &GraphStore, commands: &[Command]) -> BatchOutcome {
        let mut store = committed.clone();
        let mut log = ChangeLog::new();
        let mut reports = Vec::with_capacity(commands.len());

        for (index, command) in commands.iter().enumerate() {
            let kind = command.kind();
            let report = match self.execute(&mut store, command) {
                Ok(applied) => {
                    log.record(applied.summary.clone());
                    CommandReport {
                        index,
                        kind,
                        node_id: applied.node_id,
                        outcome: CommandOutcome::Applied(applied.summary),
                    }
                }
                Err(reason) => {
                    tracing::debug!(index, kind, %reason, "skipped command");
                    let node_id = match &reason {
                        SkipReason::DuplicateId(id) => Some(id.clone()),
                        _ => None,
                    };
                    CommandReport {
                        index,
                        kind,
                        node_id,
                        outcome: CommandOutcome::Skipped(reason),
                    }
                }
            };
            reports.push(report);
        }

        BatchOutcome {
            store,
            reports,
            log,
        }
    }

    fn execute(&self, store: &mut GraphStore, command: &Command) -> Step {
        match command {
            Command::ClearGraph => {
                store.clear();
                Ok(Applied::new("Cleared the diagram".to_string()))
            }
            Command::AddNode {
                title,
                description,
                desired_id,
            } => self.add_node(store, title, description.as_deref(), desired_id.as_deref()),
            Command::ConnectNodes {
                source_id,
                target_id,
                label,
            } => connect_nodes(store, source_id, target_id, label.as_deref()),
            Command::UpdateNode {
                id,
                title,
                description,
            } => update_node(store, id, title.as_deref(), description.as_deref()),
            Command::AddCause {
                target_id,
                target_kind,
                name,
                description,
            } => add_cause(store, target(*target_kind, target_id), name, description.as_deref()),
            Command::AddEvidence {
                target_id,
                target_kind,
                cause_name,
                name,
                description,
            } => add_evidence(
                store,
                &target(*target_kind, target_id),
                cause_name,
                name,
                description.as_deref(),
            ),
        }
    }

    fn add_node(
        &self,
        store: &mut GraphStore,
        title: &str,
        description: Option<&str>,
        desired_id: Option<&str>,
    ) -> Step {
        if let Some(id) = desired_id.filter(|id| store.contains_node(id)) {
            return Err(SkipReason::DuplicateId(id.to_string()));
        }
        if is_problem_title(title) {
            self.set_problem(store, title, description, desired_id)
        } else {
            self.add_category(store, title, description, desired_id)
        }
    }

    fn set_problem(
        &self,
        store: &mut GraphStore,
        title: &str,
        description: Option<&str>,
        desired_id: Option<&str>,
    ) -> Step {
        if let Some(existing) = store.problem() {
            let id = existing.id.clone();
            store.update_node(
                &id,
                &NodePatch::content(Some(title.to_string()), description.map(str::to_string)),
            )?;
            return Ok(Applied::new(format!("Updated problem to \"{title}\"")).on(id));
        }

        let seed = ProblemSeed::new(title)
            .with_id(desired_id.map(str::to_string))
            .with_description(description.map(str::to_string));
        let plan = self.layout.plan_backbone(store, seed);
        store.apply_all(plan.mutations)?;
        Ok(Applied::new(format!("Set problem \"{title}\"")).on(plan.problem_id))
    }

    fn add_category(
        &self,
        store: &mut GraphStore,
        title: &str,
        description: Option<&str>,
        desired_id: Option<&str>,
    ) -> Step {
        let mut scratch = store.clone();
        let needs_backbone = scratch.problem().is_none()
            || scratch.nodes_of_kind(NodeKind::Spine).next().is_none();
        if needs_backbone {
            let plan = self
                .layout
                .plan_backbone(&scratch, ProblemSeed::new(self.default_problem_title.clone()));
            scratch.apply_all(plan.mutations)?;
        }

        let request = CategoryRequest::new(title)
            .with_id(desired_id.map_or_else(|| fresh_id(CATEGORY_PREFIX), str::to_string))
            .with_description(description.map(str::to_string));
        let placement = self.layout.place_category(&scratch, request)?;
        scratch.apply_all(placement.mutations)?;
        *store = scratch;

        let mut summary = format!(
            "Added category \"{title}\" {} {}",
            placement.slot, placement.spine_id
        );
        if placement.extended {
            summary.push_str(" (spine extended)");
        }
        Ok(Applied::new(summary).on(placement.node_id))
    }
}

fn connect_nodes(store: &mut GraphStore, source: &str, target: &str, label: Option<&str>) -> Step {
    for endpoint in [source, target] {
        if !store.contains_node(endpoint) {
            return Err(SkipReason::MissingNode(endpoint.to_string()));
        }
    }
    let id = fresh_id(EDGE_PREFIX);
    store.insert_edge(
        Edge::new(id.clone(), source, target, EdgeStyle::Connection).with_label(label.map(str::to_string)),
    )?;
    Ok(Applied::new(match label {
        Some(label) => format!("Connected {source} to {target} as \"{label}\" ({id})"),
        None => format!("Connected {source} to {target} ({id})"),
    }))
}

fn update_node(store: &mut GraphStore, id: &str, title: Option<&str>, description: Option<&str>) -> Step {
    let patch = NodePatch::content(title.map(str::to_string), description.map(str::to_string));
    if patch.is_empty() {
        return Err(SkipReason::EmptyPatch);
    }
    if !store.contains_node(id) {
        return Err(SkipReason::MissingNode(id.to_string()));
    }
    store.update_node(id, &patch)?;
    Ok(Applied::new(format!("Updated node {id}")).on(id.to_string()))
}

fn add_cause(store: &mut GraphStore, target: TargetRef, name: &str, description: Option<&str>) -> Step {
    let Some(causes) = store.causes(&target) else {
        return Err(SkipReason::MissingTarget(target));
    };
    reject_spine_target(store, &target)?;
    if causes.iter().any(|c| names_equal(&c.name, name)) {
        return Err(SkipReason::DuplicateCause {
            target,
            name: name.to_string(),
        });
    }
    store.add_cause(&target, Cause::new(name, description.map(str::to_string)))?;
    Ok(Applied::new(format!("Added cause \"{name}\" to {target}")))
}

fn add_evidence(
    store: &mut GraphStore,
    target: &TargetRef,
    cause_name: &str,
    name: &str,
    description: Option<&str>,
) -> Step {
    reject_spine_target(store, target)?;
    let matched = match store.add_evidence(target, cause_name, name, description) {
        Ok(matched) => matched,
        Err(err) if err.is_lookup_miss() => return Err(SkipReason::MissingTarget(target.clone())),
        Err(err) => return Err(err.into()),
    };
    if matched == 0 {
        return Err(SkipReason::NoMatchingCause {
            target: target.clone(),
            cause_name: cause_name.to_string(),
        });
    }
    Ok(Applied::new(format!(
        "Added evidence \"{name}\" to {matched} cause(s) named \"{cause_name}\" on {target}"
    )))
}

fn reject_spine_target(store: &GraphStore, target: &TargetRef) -> Result<(), SkipReason> {
    let on_spine = target.kind == TargetKind::Node
        && store.node(&target.id).is_some_and(|n| n.kind.is_spine());
    if on_spine {
        return Err(SkipReason::StructuralTarget(target.clone()));
    }
    Ok(())
}

fn target(kind: TargetKind, id: &str) -> TargetRef {
    TargetRef {
        kind,
        id: id.to_string(),
    }
}

/// A title naming the problem rather than a category
fn is_problem_title(title: &str) -> bool {
    title.to_lowercase().contains("problem")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(LayoutEngine::default(), "Problem")
    }

    #[test]
    fn problem_detection_is_case_insensitive() {
        assert!(is_problem_title("PROBLEM: late deliveries"));
        assert!(is_problem_title("Root problem"));
        assert!(!is_problem_title("People"));
    }

    #[test]
    fn committed_store_is_untouched() {
        let committed = GraphStore::new();
        let outcome = interpreter().run(&committed, &[Command::add_node("People")]);
        assert!(committed.is_empty());
        assert!(!outcome.store.is_empty());
    }

    #[test]
    fn category_on_empty_bootstraps_placeholder() {
        let outcome = interpreter().run(&GraphStore::new(), &[Command::add_node("People")]);

        assert_eq!(outcome.applied(), 1);
        assert_eq!(outcome.store.problem().unwrap().title, "Problem");
        assert_eq!(outcome.store.nodes_of_kind(NodeKind::Category).count(), 1);
        assert!(outcome.reports[0].node_id.is_some());
    }

    #[test]
    fn later_problem_replaces_placeholder() {
        let outcome = interpreter().run(
            &GraphStore::new(),
            &[
                Command::add_node("People"),
                Command::add_node("Problem: late deliveries"),
            ],
        );
        let problems: Vec<_> = outcome.store.nodes_of_kind(NodeKind::Problem).collect();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].title, "Problem: late deliveries");
        assert_eq!(outcome.reports[1].node_id.as_deref(), Some(problems[0].id.as_str()));
    }

    #[test]
    fn empty_update_is_skipped() {
        let outcome = interpreter().run(
            &GraphStore::new(),
            &[Command::UpdateNode {
                id: "x".into(),
                title: None,
                description: None,
            }],
        );
        assert_eq!(outcome.reports[0].skip_reason(), Some(&SkipReason::EmptyPatch));
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn evidence_on_missing_target_is_skipped() {
        let outcome = interpreter().run(
            &GraphStore::new(),
            &[Command::add_evidence(&TargetRef::edge("nope"), "x", "y")],
        );
        assert_eq!(
            outcome.reports[0].skip_reason(),
            Some(&SkipReason::MissingTarget(TargetRef::edge("nope")))
        );
    }
}
