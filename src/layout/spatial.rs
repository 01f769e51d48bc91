//! Point hit testing over laid-out nodes.
//!
//! [`SpatialMap`] holds document-coordinate regions in painter's order and
//! answers "which element is under this point", which is how positional
//! pointer input finds its target.

use crate::dom::node::NodeId;
use crate::geometry::{Offset, Region};

/// Node regions in painter's order (last = frontmost).
#[derive(Debug, Default)]
pub struct SpatialMap {
    entries: Vec<(NodeId, Region)>,
}

impl SpatialMap {
    /// Create an empty spatial map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `entries`. Slice order is z-order.
    pub fn update_ordered(&mut self, entries: &[(NodeId, Region)]) {
        self.entries.clear();
        self.entries.extend_from_slice(entries);
    }

    /// All nodes containing `point`, frontmost first.
    pub fn hit_test(&self, point: Offset) -> Vec<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, region)| region.contains(point.x, point.y))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The frontmost node containing `point`.
    pub fn node_at(&self, point: Offset) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, region)| region.contains(point.x, point.y))
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
