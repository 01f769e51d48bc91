//! DOM queries: by class, selector, predicate.

use crate::css::matching::{matches_list, MatchContext};
use crate::css::parser::{parse_selector_list, SelectorError};

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find all nodes that have the given CSS class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in
    /// tree order, like jQuery's `find`.
    pub fn select_all(
        &self,
        scope: NodeId,
        selector: &str,
        ctx: &MatchContext,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = parse_selector_list(selector)?;
        Ok(self
            .walk_depth_first(scope)
            .into_iter()
            .skip(1)
            .filter(|&node| matches_list(&list, node, self, ctx))
            .collect())
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap order is deterministic but not tree order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}
