//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] synchronizes the DOM tree to a taffy layout tree, runs
//! layout computation, and reports results as [`Region`]s, either relative
//! to the parent or in document coordinates.

use std::collections::{HashMap, HashSet};

use taffy::prelude::*;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::geometry::{Offset, Region};

use super::resolve::{resolve_node_style, LayoutMetrics};

/// Wraps a [`TaffyTree`] and maintains a mapping from DOM [`NodeId`]s to
/// taffy node ids. Provides methods to sync, compute, and query layout.
pub struct LayoutEngine {
    /// The taffy tree, parameterized with our DOM NodeId as context data.
    tree: TaffyTree<NodeId>,
    /// Maps DOM NodeId -> taffy NodeId for quick lookup.
    node_map: HashMap<NodeId, taffy::prelude::NodeId>,
    /// The taffy root node, if a layout has been synced.
    root: Option<taffy::prelude::NodeId>,
}

impl LayoutEngine {
    /// Create a new, empty layout engine.
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            node_map: HashMap::new(),
            root: None,
        }
    }

    /// Synchronize the taffy tree with the DOM structure.
    ///
    /// Walks the DOM depth-first from the root, creating or updating taffy
    /// nodes to match. Taffy nodes whose DOM node no longer exists are
    /// removed, and parent/child relationships are rebuilt.
    pub fn sync_tree(&mut self, dom: &Dom, metrics: &LayoutMetrics) {
        let Some(dom_root) = dom.root() else {
            self.clear();
            return;
        };

        let live_nodes = dom.walk_depth_first(dom_root);
        let live_set: HashSet<NodeId> = live_nodes.iter().copied().collect();

        let stale_keys: Vec<NodeId> = self
            .node_map
            .keys()
            .filter(|k| !live_set.contains(k))
            .copied()
            .collect();
        for key in stale_keys {
            if let Some(taffy_id) = self.node_map.remove(&key) {
                let _ = self.tree.remove(taffy_id);
            }
        }

        for &dom_id in &live_nodes {
            let Some(data) = dom.get(dom_id) else {
                continue;
            };
            let taffy_style = resolve_node_style(data, metrics);

            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                let _ = self.tree.set_style(taffy_id, taffy_style);
            } else {
                match self.tree.new_leaf_with_context(taffy_style, dom_id) {
                    Ok(taffy_id) => {
                        self.node_map.insert(dom_id, taffy_id);
                    }
                    Err(err) => tracing::warn!(%err, "failed to create layout node"),
                }
            }
        }

        for &dom_id in &live_nodes {
            let taffy_children: Vec<taffy::prelude::NodeId> = dom
                .children(dom_id)
                .iter()
                .filter_map(|child_id| self.node_map.get(child_id).copied())
                .collect();

            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                let _ = self.tree.set_children(taffy_id, &taffy_children);
            }
        }

        self.root = self.node_map.get(&dom_root).copied();
    }

    /// Run taffy layout computation on the root node.
    ///
    /// The root spans the full available width so its children stretch to
    /// the viewport; its height follows the content.
    pub fn compute(&mut self, available_width: f32, available_height: f32) {
        if let Some(root) = self.root {
            if let Ok(style) = self.tree.style(root) {
                let mut style = style.clone();
                style.size.width = Dimension::from_length(available_width);
                let _ = self.tree.set_style(root, style);
            }
            if let Err(err) = self.tree.compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(available_width),
                    height: AvailableSpace::Definite(available_height),
                },
            ) {
                tracing::warn!(%err, "layout computation failed");
            }
        }
    }

    /// Layout of a node relative to its parent's content origin.
    ///
    /// Taffy's f32 coordinates are rounded to the nearest integer unit.
    pub fn get_layout(&self, node: NodeId) -> Option<Region> {
        let taffy_id = self.node_map.get(&node)?;
        let layout = self.tree.layout(*taffy_id).ok()?;
        Some(Region {
            x: layout.location.x.round() as i32,
            y: layout.location.y.round() as i32,
            width: layout.size.width.round() as i32,
            height: layout.size.height.round() as i32,
        })
    }

    /// Layout of a node in document coordinates.
    ///
    /// Ancestor offsets are summed and each ancestor's `scroll_top` is
    /// subtracted, so entries inside a scrolled list move up.
    pub fn absolute_region(&self, dom: &Dom, node: NodeId) -> Option<Region> {
        let region = self.get_layout(node)?;
        let mut shift = Offset::ZERO;
        for ancestor in dom.ancestors(node) {
            let parent = self.get_layout(ancestor)?;
            let scroll = dom.get(ancestor).map_or(0, |data| data.scroll_top);
            shift = shift + Offset::new(parent.x, parent.y - scroll);
        }
        Some(region.translate(shift))
    }

    /// Height of the content inside `node`: the lowest bottom edge of its
    /// displayed children.
    pub fn content_height(&self, dom: &Dom, node: NodeId) -> i32 {
        dom.children(node)
            .iter()
            .filter(|&&child| dom.get(child).is_some_and(|data| data.visible))
            .filter_map(|&child| self.get_layout(child))
            .map(Region::bottom)
            .max()
            .unwrap_or(0)
    }

    /// Document-coordinate regions of all rendered nodes in depth-first
    /// order (painter's order).
    pub fn absolute_regions(&self, dom: &Dom) -> Vec<(NodeId, Region)> {
        let Some(root) = dom.root() else {
            return Vec::new();
        };
        dom.walk_depth_first(root)
            .into_iter()
            .filter(|&node| dom.is_rendered(node))
            .filter_map(|node| self.absolute_region(dom, node).map(|region| (node, region)))
            .collect()
    }

    /// Whether `node` has a layout node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.node_map.contains_key(&node)
    }

    /// Clear all state, removing all taffy nodes and mappings.
    fn clear(&mut self) {
        let keys: Vec<_> = self.node_map.drain().map(|(_, v)| v).collect();
        for taffy_id in keys {
            let _ = self.tree.remove(taffy_id);
        }
        self.root = None;
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
