//! Category placement and spine growth
//!
//! [`LayoutEngine`] never touches the store. Every operation reads the current
//! state and returns the [`StoreMutation`]s that would realize it; the caller
//! applies them as one unit with [`GraphStore::apply_all`].

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::slots::{occupancy, rib_handles};
use fishbone_model::ids::{
    fresh_id, CATEGORY_PREFIX, PROBLEM_PREFIX, RIB_PREFIX, SPINE_EDGE_PREFIX, SPINE_PREFIX,
    TAIL_PREFIX,
};
use fishbone_model::{
    validate_structure, Edge, EdgePatch, EdgeStyle, GraphStore, Handle, InvariantViolation, Node,
    NodeKind, NodePatch, Point, Slot, StoreMutation,
};

/// Content of a category to place
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRequest {
    /// Id the category will carry
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
}

impl CategoryRequest {
    /// Request with a freshly minted id
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: fresh_id(CATEGORY_PREFIX),
            title: title.into(),
            description: None,
        }
    }

    /// With id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Content of the problem node laid down with a fresh backbone
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSeed {
    /// Id to use instead of a minted one
    pub id: Option<String>,
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
}

impl ProblemSeed {
    /// Seed with a minted id and no description
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
        }
    }

    /// With id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Where a category goes and what it takes to put it there
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Id of the category node
    pub node_id: String,
    /// Spine joint the rib lands on
    pub spine_id: String,
    /// Side of the joint
    pub slot: Slot,
    /// Category position
    pub position: Point,
    /// Whether the spine had to grow
    pub extended: bool,
    /// Mutations to apply, in order
    pub mutations: Vec<StoreMutation>,
}

/// Backbone bootstrap plan
#[derive(Debug, Clone, PartialEq)]
pub struct BackbonePlan {
    /// Id of the problem node after the plan is applied
    pub problem_id: String,
    /// Whether the plan creates the problem node
    pub creates_problem: bool,
    /// Mutations to apply, in order. Empty if the backbone is already whole.
    pub mutations: Vec<StoreMutation>,
}

/// Slot-assignment and spine-extension planner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Engine over the given geometry
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Geometry in use
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Plan whatever part of the backbone is missing
    ///
    /// An empty store gets the tail at `origin_x`, one spine joint `spacing`
    /// to its right and the problem another `spacing` further, joined by spine
    /// edges. A store that already has joints and a problem yields no
    /// mutations; an existing problem is kept as is and `seed` is ignored.
    #[must_use]
    pub fn plan_backbone(&self, store: &GraphStore, seed: ProblemSeed) -> BackbonePlan {
        let mut mutations = Vec::new();
        let spine = store.spine_nodes();
        let baseline = self.config.spine_y;

        let (last_id, last_x, built) = match spine.iter().rev().find(|n| n.kind == NodeKind::Spine) {
            Some(joint) => (joint.id.clone(), joint.position.x, false),
            None => {
                let tail = match spine.iter().find(|n| n.kind == NodeKind::Tail) {
                    Some(tail) => (*tail).clone(),
                    None => {
                        let tail = Node::tail(
                            fresh_id(TAIL_PREFIX),
                            Point::new(self.config.origin_x, baseline),
                        );
                        mutations.push(StoreMutation::InsertNode(tail.clone()));
                        tail
                    }
                };
                let joint = Node::spine(
                    fresh_id(SPINE_PREFIX),
                    Point::new(tail.position.x + self.config.spacing, baseline),
                );
                mutations.push(StoreMutation::InsertNode(joint.clone()));
                mutations.push(StoreMutation::InsertEdge(self.spine_edge(&tail.id, &joint.id)));
                (joint.id, joint.position.x, true)
            }
        };

        let problem_x = last_x + self.config.spacing;
        let (problem_id, creates_problem) = match store.problem() {
            Some(problem) => {
                if built {
                    if problem.position.x < problem_x {
                        mutations.push(StoreMutation::UpdateNode {
                            id: problem.id.clone(),
                            patch: NodePatch::position(Point::new(problem_x, problem.position.y)),
                        });
                    }
                    mutations.push(StoreMutation::InsertEdge(self.spine_edge(&last_id, &problem.id)));
                }
                (problem.id.clone(), false)
            }
            None => {
                let id = seed.id.unwrap_or_else(|| fresh_id(PROBLEM_PREFIX));
                let problem = Node::new(id.clone(), NodeKind::Problem, seed.title, Point::new(problem_x, baseline))
                    .with_description(seed.description);
                mutations.push(StoreMutation::InsertNode(problem));
                mutations.push(StoreMutation::InsertEdge(self.spine_edge(&last_id, &id)));
                (id, true)
            }
        };

        tracing::debug!(
            problem = %problem_id,
            mutations = mutations.len(),
            "planned backbone"
        );
        BackbonePlan {
            problem_id,
            creates_problem,
            mutations,
        }
    }

    /// Plan the placement of a new category
    ///
    /// Joints are scanned left to right and the first free slot wins, above
    /// before below. When every joint is full the spine grows by one joint,
    /// the problem moves right by `spacing`, and the category takes the new
    /// joint's above slot.
    ///
    /// # Errors
    /// - `IdTaken` if `request.id` already names a node
    /// - `NoSpine` if the store has no spine joint to attach to
    pub fn place_category(
        &self,
        store: &GraphStore,
        request: CategoryRequest,
    ) -> Result<Placement, LayoutError> {
        if store.contains_node(&request.id) {
            return Err(LayoutError::IdTaken(request.id));
        }

        let joints: Vec<&Node> = store
            .spine_nodes()
            .into_iter()
            .filter(|n| n.kind == NodeKind::Spine)
            .collect();
        let last = *joints.last().ok_or(LayoutError::NoSpine)?;

        let mut mutations = Vec::new();
        let free = joints.iter().find_map(|joint| {
            occupancy(store, &joint.id, self.config.spine_y)
                .first_free()
                .map(|slot| (*joint, slot))
        });
        let (spine_id, spine_x, slot, extended) = match free {
            Some((joint, slot)) => (joint.id.clone(), joint.position.x, slot, false),
            None => {
                let joint = self.extend_spine(store, last, &mut mutations);
                (joint.id, joint.position.x, Slot::Above, true)
            }
        };

        let position = Point::new(spine_x - self.config.rib_offset, self.row_y(slot));
        let node = Node::new(request.id.clone(), NodeKind::Category, request.title, position)
            .with_description(request.description);
        let (source_handle, target_handle) = rib_handles(slot);
        let rib = Edge::new(fresh_id(RIB_PREFIX), request.id.clone(), spine_id.clone(), EdgeStyle::Rib)
            .with_handles(source_handle, target_handle);
        mutations.push(StoreMutation::InsertNode(node));
        mutations.push(StoreMutation::InsertEdge(rib));

        tracing::debug!(
            category = %request.id,
            spine = %spine_id,
            %slot,
            extended,
            "placed category"
        );
        Ok(Placement {
            node_id: request.id,
            spine_id,
            slot,
            position,
            extended,
            mutations,
        })
    }

    /// Structural check against this engine's baseline
    #[must_use]
    pub fn validate(&self, store: &GraphStore) -> Vec<InvariantViolation> {
        validate_structure(store, self.config.spine_y)
    }

    /// Row y for a slot
    #[must_use]
    pub fn row_y(&self, slot: Slot) -> f64 {
        match slot {
            Slot::Above => self.config.top_row_y,
            Slot::Below => self.config.bottom_row_y,
        }
    }

    fn extend_spine(&self, store: &GraphStore, last: &Node, mutations: &mut Vec<StoreMutation>) -> Node {
        let joint = Node::spine(
            fresh_id(SPINE_PREFIX),
            Point::new(last.position.x + self.config.spacing, self.config.spine_y),
        );
        mutations.push(StoreMutation::InsertNode(joint.clone()));

        let Some(problem) = store.problem() else {
            mutations.push(StoreMutation::InsertEdge(self.spine_edge(&last.id, &joint.id)));
            return joint;
        };

        mutations.push(StoreMutation::UpdateNode {
            id: problem.id.clone(),
            patch: NodePatch::position(problem.position.shifted_x(self.config.spacing)),
        });
        let closing = store
            .edges_of_style(EdgeStyle::Spine)
            .find(|e| e.source == last.id && e.target == problem.id);
        match closing {
            Some(edge) => mutations.push(StoreMutation::UpdateEdge {
                id: edge.id.clone(),
                patch: EdgePatch::retarget(joint.id.clone()),
            }),
            None => mutations.push(StoreMutation::InsertEdge(self.spine_edge(&last.id, &joint.id))),
        }
        mutations.push(StoreMutation::InsertEdge(self.spine_edge(&joint.id, &problem.id)));
        joint
    }

    fn spine_edge(&self, source: &str, target: &str) -> Edge {
        Edge::new(fresh_id(SPINE_EDGE_PREFIX), source, target, EdgeStyle::Spine)
            .with_handles(Handle::Right, Handle::Left)
    }
}
