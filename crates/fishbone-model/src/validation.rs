//! Structural invariant checking
//!
//! [`validate_structure`] inspects a store and reports every broken invariant
//! rather than stopping at the first one. The store primitives already make
//! some of these impossible (dangling edges); the rest depend on how the graph
//! was edited and are what layout and interpretation must preserve:
//! - exactly one problem node in a non-empty document
//! - spine joints form one simple path from the tail, left to right, ending in
//!   a spine edge into the problem node
//! - every category has exactly one rib onto a spine joint, in a definite slot,
//!   and no joint has two categories in the same slot
//! - spine joints and the tail carry no causes
//! - within one cause list, ids are distinct and names are distinct ignoring case

use crate::cause::{Cause, TargetRef};
use crate::edge::EdgeStyle;
use crate::node::{Node, NodeKind, Slot};
use crate::store::GraphStore;
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, HashSet};

/// One broken invariant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// Edge points at a node that does not exist
    #[error("edge {edge} references missing node {endpoint}")]
    DanglingEdge {
        /// Offending edge
        edge: String,
        /// Missing endpoint
        endpoint: String,
    },

    /// Not exactly one problem node
    #[error("expected exactly one problem node, found {0}")]
    ProblemCount(usize),

    /// Not exactly one tail
    #[error("expected exactly one tail node, found {0}")]
    TailCount(usize),

    /// Spine edges loop back on themselves
    #[error("spine edges form a cycle")]
    SpineCycle,

    /// A spine node has more than one incoming or outgoing spine edge
    #[error("spine branches at {0}")]
    SpineBranch(String),

    /// A spine node is unreachable from the tail
    #[error("spine node {0} is not on the path from the tail")]
    SpineDetached(String),

    /// Walking from the tail, x did not increase
    #[error("spine path goes backwards at {0}")]
    SpineOrder(String),

    /// The path from the tail never reaches the problem node
    #[error("spine does not end in the problem node")]
    SpineUnterminated,

    /// Some node sits at or right of the problem node
    #[error("node {0} is not left of the problem node")]
    ProblemNotRightmost(String),

    /// Category with zero or several ribs
    #[error("category {category} has {ribs} rib edges")]
    RibCount {
        /// Category id
        category: String,
        /// Rib count found
        ribs: usize,
    },

    /// Rib lands on something other than a spine joint
    #[error("category {category} ribs onto {target}, which is not a spine joint")]
    RibTarget {
        /// Category id
        category: String,
        /// Rib target
        target: String,
    },

    /// Category sits exactly on the baseline
    #[error("category {0} is on the spine baseline")]
    SlotAmbiguous(String),

    /// Two categories share one slot of a joint
    #[error("spine node {spine} has {count} categories {slot}")]
    SlotConflict {
        /// Spine joint
        spine: String,
        /// Contested slot
        slot: Slot,
        /// Occupants found
        count: usize,
    },

    /// Spine joint or tail holds causes
    #[error("spine node {0} holds causes")]
    SpineCauses(String),

    /// Two causes in one list share an id
    #[error("{target} has more than one cause with id {cause}")]
    DuplicateCauseId {
        /// Container
        target: TargetRef,
        /// Repeated id
        cause: String,
    },

    /// Two causes in one list share a name, ignoring case
    #[error("{target} has more than one cause named {name:?}")]
    DuplicateCauseName {
        /// Container
        target: TargetRef,
        /// Second occurrence of the name
        name: String,
    },
}

/// Report every invariant the store breaks
///
/// An empty store (explicitly cleared document) is valid.
#[must_use]
pub fn validate_structure(store: &GraphStore, baseline: f64) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    if store.is_empty() {
        return violations;
    }

    for edge in store.edges() {
        for endpoint in [&edge.source, &edge.target] {
            if !store.contains_node(endpoint) {
                violations.push(InvariantViolation::DanglingEdge {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
    }

    let problems: Vec<&Node> = store.nodes_of_kind(NodeKind::Problem).collect();
    if problems.len() != 1 {
        violations.push(InvariantViolation::ProblemCount(problems.len()));
    }

    check_spine(store, problems.first().copied(), &mut violations);
    check_ribs(store, baseline, &mut violations);
    check_causes(store, &mut violations);
    violations
}

fn check_spine(store: &GraphStore, problem: Option<&Node>, violations: &mut Vec<InvariantViolation>) {
    let spine = store.spine_nodes();
    let tails: Vec<&Node> = spine.iter().copied().filter(|n| n.kind == NodeKind::Tail).collect();
    let [tail] = tails.as_slice() else {
        violations.push(InvariantViolation::TailCount(tails.len()));
        return;
    };

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in &spine {
        graph.add_node(node.id.as_str());
    }
    if let Some(problem) = problem {
        graph.add_node(problem.id.as_str());
    }
    for edge in store.edges_of_style(EdgeStyle::Spine) {
        if graph.contains_node(edge.source.as_str()) && graph.contains_node(edge.target.as_str()) {
            graph.add_edge(edge.source.as_str(), edge.target.as_str(), ());
        }
    }

    if is_cyclic_directed(&graph) {
        violations.push(InvariantViolation::SpineCycle);
        return;
    }

    let mut branched = false;
    for node in &spine {
        let id = node.id.as_str();
        if graph.neighbors_directed(id, Direction::Outgoing).count() > 1
            || graph.neighbors_directed(id, Direction::Incoming).count() > 1
        {
            violations.push(InvariantViolation::SpineBranch(node.id.clone()));
            branched = true;
        }
    }
    if branched {
        return;
    }

    let mut visited: HashSet<&str> = HashSet::from([tail.id.as_str()]);
    let mut current = *tail;
    let mut terminated = false;
    while let Some(next) = graph.neighbors_directed(current.id.as_str(), Direction::Outgoing).next() {
        if problem.is_some_and(|p| p.id == next) {
            terminated = true;
            break;
        }
        let Some(next_node) = store.node(next) else {
            break;
        };
        if next_node.position.x <= current.position.x {
            violations.push(InvariantViolation::SpineOrder(next_node.id.clone()));
        }
        visited.insert(next);
        current = next_node;
    }

    if !terminated {
        violations.push(InvariantViolation::SpineUnterminated);
    }
    for node in &spine {
        if !visited.contains(node.id.as_str()) {
            violations.push(InvariantViolation::SpineDetached(node.id.clone()));
        }
    }

    if let Some(problem) = problem {
        for node in store.nodes().filter(|n| n.id != problem.id) {
            if node.position.x >= problem.position.x {
                violations.push(InvariantViolation::ProblemNotRightmost(node.id.clone()));
            }
        }
    }
}

fn check_ribs(store: &GraphStore, baseline: f64, violations: &mut Vec<InvariantViolation>) {
    let mut occupancy: BTreeMap<(&str, Slot), usize> = BTreeMap::new();

    for category in store.nodes_of_kind(NodeKind::Category) {
        let ribs: Vec<_> = store
            .edges_of_style(EdgeStyle::Rib)
            .filter(|e| e.source == category.id)
            .collect();
        let [rib] = ribs.as_slice() else {
            violations.push(InvariantViolation::RibCount {
                category: category.id.clone(),
                ribs: ribs.len(),
            });
            continue;
        };

        if store.node(&rib.target).map(|n| n.kind) != Some(NodeKind::Spine) {
            violations.push(InvariantViolation::RibTarget {
                category: category.id.clone(),
                target: rib.target.clone(),
            });
            continue;
        }

        match Slot::classify(category.position.y, baseline) {
            Some(slot) => *occupancy.entry((rib.target.as_str(), slot)).or_default() += 1,
            None => violations.push(InvariantViolation::SlotAmbiguous(category.id.clone())),
        }
    }

    for ((spine, slot), count) in occupancy {
        if count > 1 {
            violations.push(InvariantViolation::SlotConflict {
                spine: spine.to_string(),
                slot,
                count,
            });
        }
    }
}

fn check_causes(store: &GraphStore, violations: &mut Vec<InvariantViolation>) {
    for node in store.nodes() {
        if node.kind.is_spine() && !node.causes.is_empty() {
            violations.push(InvariantViolation::SpineCauses(node.id.clone()));
        }
        check_cause_list(&TargetRef::node(node.id.as_str()), &node.causes, violations);
    }
    for edge in store.edges() {
        check_cause_list(&TargetRef::edge(edge.id.as_str()), &edge.causes, violations);
    }
}

fn check_cause_list(target: &TargetRef, causes: &[Cause], violations: &mut Vec<InvariantViolation>) {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for cause in causes {
        if !ids.insert(cause.id.as_str()) {
            violations.push(InvariantViolation::DuplicateCauseId {
                target: target.clone(),
                cause: cause.id.clone(),
            });
        }
        if !names.insert(cause.name.to_lowercase()) {
            violations.push(InvariantViolation::DuplicateCauseName {
                target: target.clone(),
                name: cause.name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, Handle};
    use crate::node::Point;

    const BASELINE: f64 = 300.0;

    fn backbone() -> GraphStore {
        GraphStore::from_parts(
            [
                Node::tail("tail", Point::new(80.0, BASELINE)),
                Node::spine("s1", Point::new(340.0, BASELINE)),
                Node::new("problem", NodeKind::Problem, "Late deliveries", Point::new(600.0, BASELINE)),
            ],
            [
                Edge::new("e0", "tail", "s1", EdgeStyle::Spine),
                Edge::new("e1", "s1", "problem", EdgeStyle::Spine),
            ],
        )
        .unwrap()
    }

    fn attach(store: &mut GraphStore, id: &str, spine: &str, y: f64) {
        store
            .insert_node(Node::new(id, NodeKind::Category, id, Point::new(220.0, y)))
            .unwrap();
        store
            .insert_edge(Edge::new(format!("rib-{id}"), id, spine, EdgeStyle::Rib).with_handles(Handle::Bottom, Handle::Top))
            .unwrap();
    }

    #[test]
    fn initialized_backbone_is_valid() {
        assert!(validate_structure(&backbone(), BASELINE).is_empty());
    }

    #[test]
    fn empty_store_is_valid() {
        assert!(validate_structure(&GraphStore::new(), BASELINE).is_empty());
    }

    #[test]
    fn second_problem_is_reported() {
        let mut store = backbone();
        store
            .insert_node(Node::new("p2", NodeKind::Problem, "Another problem", Point::new(10.0, 10.0)))
            .unwrap();
        assert!(validate_structure(&store, BASELINE).contains(&InvariantViolation::ProblemCount(2)));
    }

    #[test]
    fn slot_conflict_is_reported() {
        let mut store = backbone();
        attach(&mut store, "a", "s1", 80.0);
        attach(&mut store, "b", "s1", 90.0);

        let violations = validate_structure(&store, BASELINE);
        assert_eq!(
            violations,
            vec![InvariantViolation::SlotConflict {
                spine: "s1".to_string(),
                slot: Slot::Above,
                count: 2,
            }]
        );
    }

    #[test]
    fn one_above_one_below_is_valid() {
        let mut store = backbone();
        attach(&mut store, "a", "s1", 80.0);
        attach(&mut store, "b", "s1", 520.0);
        assert!(validate_structure(&store, BASELINE).is_empty());
    }

    #[test]
    fn rib_onto_tail_is_reported() {
        let mut store = backbone();
        attach(&mut store, "a", "tail", 80.0);
        assert!(matches!(
            validate_structure(&store, BASELINE).as_slice(),
            [InvariantViolation::RibTarget { .. }]
        ));
    }

    #[test]
    fn spine_branch_is_reported() {
        let mut store = backbone();
        store.insert_node(Node::spine("s2", Point::new(450.0, BASELINE))).unwrap();
        store.insert_edge(Edge::new("e2", "s1", "s2", EdgeStyle::Spine)).unwrap();
        assert!(validate_structure(&store, BASELINE).contains(&InvariantViolation::SpineBranch("s1".to_string())));
    }

    #[test]
    fn missing_problem_edge_is_reported() {
        let mut store = backbone();
        store.delete_edge("e1");
        assert!(validate_structure(&store, BASELINE).contains(&InvariantViolation::SpineUnterminated));
    }

    fn cause(id: &str, name: &str) -> Cause {
        Cause {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            evidence: Vec::new(),
        }
    }

    #[test]
    fn causes_on_spine_are_reported() {
        let mut store = backbone();
        store.add_cause(&TargetRef::node("s1"), cause("c1", "Fatigue")).unwrap();
        store.add_cause(&TargetRef::node("tail"), cause("c2", "Wear")).unwrap();

        let violations = validate_structure(&store, BASELINE);
        assert_eq!(
            violations,
            vec![
                InvariantViolation::SpineCauses("tail".to_string()),
                InvariantViolation::SpineCauses("s1".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_cause_id_is_reported() {
        let mut store = backbone();
        attach(&mut store, "a", "s1", 80.0);
        store.add_cause(&TargetRef::node("a"), cause("x", "Fatigue")).unwrap();
        store.add_cause(&TargetRef::node("a"), cause("x", "Wear")).unwrap();

        assert_eq!(
            validate_structure(&store, BASELINE),
            vec![InvariantViolation::DuplicateCauseId {
                target: TargetRef::node("a"),
                cause: "x".to_string(),
            }]
        );
    }

    #[test]
    fn repeated_cause_name_is_reported_per_list() {
        let mut store = backbone();
        store.add_cause(&TargetRef::edge("e1"), cause("c1", "Fatigue")).unwrap();
        store.add_cause(&TargetRef::edge("e1"), cause("c2", "FATIGUE")).unwrap();
        store.add_cause(&TargetRef::node("problem"), cause("c3", "fatigue")).unwrap();

        assert_eq!(
            validate_structure(&store, BASELINE),
            vec![InvariantViolation::DuplicateCauseName {
                target: TargetRef::edge("e1"),
                name: "FATIGUE".to_string(),
            }]
        );
    }
}
