//! Tree operations: insert, insert after, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The document tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a detached node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(id, parent, None);
        id
    }

    /// Insert a node as the next sibling of `sibling`.
    ///
    /// Returns `None` when `sibling` has no parent.
    pub fn insert_after(&mut self, sibling: NodeId, data: NodeData) -> Option<NodeId> {
        let parent = self.parent(sibling)?;
        let position = self.index_in_parent(sibling)? + 1;
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(id, parent, Some(position));
        Some(id)
    }

    /// Remove a node and all its descendants recursively.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// The sibling immediately following `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let position = self.index_in_parent(id)?;
        self.children(parent).get(position + 1).copied()
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `node` is `ancestor` itself or one of its descendants.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Apply `f` to a node's data if it exists.
    pub fn update(&mut self, id: NodeId, f: impl FnOnce(&mut NodeData)) {
        if let Some(data) = self.nodes.get_mut(id) {
            f(data);
        }
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the DOM contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` and all its ancestors are displayed (jQuery's `:visible`).
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let own = self.get(id).is_some_and(|data| data.visible);
        own && self
            .ancestors(id)
            .into_iter()
            .all(|a| self.get(a).is_some_and(|data| data.visible))
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Link `id` under `parent`, at `position` or last.
    fn attach(&mut self, id: NodeId, parent: NodeId, position: Option<usize>) {
        self.parent.insert(id, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            match position {
                Some(index) if index <= kids.len() => kids.insert(index, id),
                _ => kids.push(id),
            }
        }
    }

    /// Unlink `id` from its parent, if any.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent.remove(id) {
            if let Some(kids) = self.children.get_mut(parent) {
                kids.retain(|&kid| kid != id);
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body").with_id("root"));
        let a = dom.insert_child(root, NodeData::new("div").with_id("a").with_class("left"));
        let b = dom.insert_child(root, NodeData::new("div").with_id("b").with_class("right"));
        let c = dom.insert_child(a, NodeData::new("button").with_id("c"));
        let d = dom.insert_child(a, NodeData::new("span").with_id("d"));
        (dom, root, a, b, c, d)
    }

    #[test]
    fn insert_sets_root() {
        let mut dom = Dom::new();
        let id = dom.insert(NodeData::new("body"));
        assert_eq!(dom.root(), Some(id));
        let _second = dom.insert(NodeData::new("div"));
        assert_eq!(dom.root(), Some(id));
    }

    #[test]
    fn children_list() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
    }

    #[test]
    fn insert_after_places_sibling() {
        let (mut dom, root, a, b, ..) = build_tree();
        let x = dom.insert_after(a, NodeData::new("div")).unwrap();
        assert_eq!(dom.children(root), &[a, x, b]);
        assert_eq!(dom.next_sibling(a), Some(x));
        assert_eq!(dom.index_in_parent(b), Some(2));
    }

    #[test]
    fn insert_after_last_child_appends() {
        let (mut dom, root, a, b, ..) = build_tree();
        let x = dom.insert_after(b, NodeData::new("div")).unwrap();
        assert_eq!(dom.children(root), &[a, b, x]);
        assert_eq!(dom.next_sibling(x), None);
    }

    #[test]
    fn insert_after_detached_node_fails() {
        let (mut dom, root, ..) = build_tree();
        assert!(dom.insert_after(root, NodeData::new("div")).is_none());
    }

    #[test]
    fn ancestors_and_descendant_check() {
        let (dom, root, a, b, c, _d) = build_tree();
        assert_eq!(dom.ancestors(c), vec![a, root]);
        assert!(dom.is_inclusive_descendant(c, a));
        assert!(dom.is_inclusive_descendant(a, a));
        assert!(!dom.is_inclusive_descendant(c, b));
    }

    #[test]
    fn remove_subtree() {
        let (mut dom, root, a, b, c, d) = build_tree();
        dom.remove(a);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.len(), 2);
    }

    #[test]
    fn remove_root() {
        let (mut dom, root, ..) = build_tree();
        dom.remove(root);
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }

    #[test]
    fn remove_nonexistent() {
        let mut dom = Dom::new();
        let id = dom.insert(NodeData::new("x"));
        dom.remove(id);
        assert!(dom.remove(id).is_none());
    }

    #[test]
    fn is_rendered_checks_ancestors() {
        let (mut dom, _root, a, _b, c, _d) = build_tree();
        assert!(dom.is_rendered(c));
        dom.update(a, |data| data.visible = false);
        assert!(!dom.is_rendered(c));
        assert!(!dom.is_rendered(a));
    }

    #[test]
    fn walk_depth_first() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(dom.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn default_impl() {
        let dom = Dom::default();
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }
}
