//! Diagram nodes
//!
//! Defines [`Node`] and the pieces it is built from:
//! - [`NodeKind`]: structural (spine, tail) vs content (category, problem)
//! - [`Point`]: 2-D position, which drives spine order and rib slot
//! - [`Slot`]: which side of the spine a category hangs from
//! - [`NodePatch`]: partial update merged by the store

use crate::cause::Cause;
use serde::{Deserialize, Serialize};

/// 2-D diagram coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (spine order)
    pub x: f64,
    /// Vertical coordinate (slot side)
    pub y: f64,
}

impl Point {
    /// Create new point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point moved right by `dx`
    #[inline]
    #[must_use]
    pub fn shifted_x(self, dx: f64) -> Self {
        Self::new(self.x + dx, self.y)
    }
}

/// Node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Structural spine joint; ribs attach here
    Spine,
    /// Sentinel spine terminus at the far left; never holds ribs
    Tail,
    /// Causal domain (People, Process, ...)
    Category,
    /// The effect under analysis; exactly one per initialized document
    Problem,
}

impl NodeKind {
    /// Spine joints and the tail are both part of the backbone
    #[inline]
    #[must_use]
    pub fn is_spine(self) -> bool {
        matches!(self, Self::Spine | Self::Tail)
    }

    /// Structural nodes cannot be deleted through the document handle
    #[inline]
    #[must_use]
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Category)
    }
}

/// Vertical slot a category occupies relative to its spine node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Top row (y below the baseline)
    Above,
    /// Bottom row (y beyond the baseline)
    Below,
}

impl Slot {
    /// Classify a vertical position against the spine baseline.
    ///
    /// A position exactly on the baseline belongs to neither slot.
    #[must_use]
    pub fn classify(y: f64, baseline: f64) -> Option<Self> {
        if y < baseline {
            Some(Self::Above)
        } else if y > baseline {
            Some(Self::Below)
        } else {
            None
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagram vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable unique id
    pub id: String,
    /// Node classification
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Short label (empty for spine nodes)
    #[serde(default)]
    pub title: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Diagram position
    pub position: Point,
    /// Attached contributing factors
    #[serde(default)]
    pub causes: Vec<Cause>,
}

impl Node {
    /// Create node with no description or causes
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind, title: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: None,
            position,
            causes: Vec::new(),
        }
    }

    /// Untitled spine joint
    #[must_use]
    pub fn spine(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, NodeKind::Spine, "", position)
    }

    /// Untitled sentinel tail
    #[must_use]
    pub fn tail(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, NodeKind::Tail, "", position)
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// With causes
    #[inline]
    #[must_use]
    pub fn with_causes(mut self, causes: Vec<Cause>) -> Self {
        self.causes = causes;
        self
    }
}

/// Partial node update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    /// Replacement title
    pub title: Option<String>,
    /// Replacement description
    pub description: Option<String>,
    /// Replacement position
    pub position: Option<Point>,
}

impl NodePatch {
    /// Patch that only changes the position
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that changes title and/or description
    #[must_use]
    pub fn content(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title,
            description,
            position: None,
        }
    }

    /// Whether the patch would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.position.is_none()
    }

    pub(crate) fn merge_into(&self, node: &mut Node) {
        if let Some(title) = &self.title {
            node.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            node.description = Some(description.clone());
        }
        if let Some(position) = self.position {
            node.position = position;
        }
    }
}
