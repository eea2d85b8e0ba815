//! Rib slot occupancy

use fishbone_model::{EdgeStyle, GraphStore, Handle, Slot};

/// Which slots of one spine joint are taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotOccupancy {
    /// Above slot taken
    pub above: bool,
    /// Below slot taken
    pub below: bool,
}

impl SlotOccupancy {
    /// First free slot, preferring above
    #[must_use]
    pub fn first_free(self) -> Option<Slot> {
        if !self.above {
            Some(Slot::Above)
        } else if !self.below {
            Some(Slot::Below)
        } else {
            None
        }
    }

    /// Both slots taken
    #[must_use]
    pub fn is_full(self) -> bool {
        self.above && self.below
    }
}

/// Slots of `spine_id` occupied by rib edges, judged by each rib source's y
/// against the baseline
#[must_use]
pub fn occupancy(store: &GraphStore, spine_id: &str, baseline: f64) -> SlotOccupancy {
    let mut taken = SlotOccupancy::default();
    for rib in store
        .edges_of_style(EdgeStyle::Rib)
        .filter(|e| e.target == spine_id)
    {
        match store
            .node(&rib.source)
            .and_then(|n| Slot::classify(n.position.y, baseline))
        {
            Some(Slot::Above) => taken.above = true,
            Some(Slot::Below) => taken.below = true,
            None => {}
        }
    }
    taken
}

/// Connector pair (category side, spine side) for a rib in `slot`
///
/// Above categories leave from their bottom into the joint's top; below
/// categories leave from their top into the joint's bottom.
#[must_use]
pub fn rib_handles(slot: Slot) -> (Handle, Handle) {
    match slot {
        Slot::Above => (Handle::Bottom, Handle::Top),
        Slot::Below => (Handle::Top, Handle::Bottom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishbone_model::{Edge, Node, NodeKind, Point};

    fn joint_with(ys: &[f64]) -> GraphStore {
        let mut store = GraphStore::new();
        store.insert_node(Node::spine("s", Point::new(340.0, 300.0))).unwrap();
        for (i, y) in ys.iter().enumerate() {
            let id = format!("c{i}");
            store
                .insert_node(Node::new(id.clone(), NodeKind::Category, "", Point::new(220.0, *y)))
                .unwrap();
            store
                .insert_edge(Edge::new(format!("r{i}"), id, "s", EdgeStyle::Rib))
                .unwrap();
        }
        store
    }

    #[test]
    fn empty_joint_prefers_above() {
        let taken = occupancy(&joint_with(&[]), "s", 300.0);
        assert_eq!(taken.first_free(), Some(Slot::Above));
    }

    #[test]
    fn above_taken_offers_below() {
        let taken = occupancy(&joint_with(&[80.0]), "s", 300.0);
        assert_eq!(taken.first_free(), Some(Slot::Below));
    }

    #[test]
    fn below_only_still_offers_above() {
        let taken = occupancy(&joint_with(&[520.0]), "s", 300.0);
        assert_eq!(taken.first_free(), Some(Slot::Above));
    }

    #[test]
    fn both_taken_is_full() {
        let taken = occupancy(&joint_with(&[80.0, 520.0]), "s", 300.0);
        assert!(taken.is_full());
        assert_eq!(taken.first_free(), None);
    }

    #[test]
    fn connections_do_not_occupy_slots() {
        let mut store = joint_with(&[]);
        store
            .insert_node(Node::new("x", NodeKind::Category, "", Point::new(0.0, 80.0)))
            .unwrap();
        store
            .insert_edge(Edge::new("c", "x", "s", EdgeStyle::Connection))
            .unwrap();
        assert_eq!(occupancy(&store, "s", 300.0), SlotOccupancy::default());
    }

    #[test]
    fn handles_mirror_by_slot() {
        assert_eq!(rib_handles(Slot::Above), (Handle::Bottom, Handle::Top));
        assert_eq!(rib_handles(Slot::Below), (Handle::Top, Handle::Bottom));
    }
}
