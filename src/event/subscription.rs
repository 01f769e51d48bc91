//! Window-level listener subscriptions.
//!
//! Widgets never hold closures on the window. Instead they register a
//! [`ListenerKind`] in the page's [`WindowListeners`] and keep the returned
//! [`SubscriptionId`] in their own [`ActiveSubscriptions`]. The document
//! consults the registry when routing window-level input.

use slotmap::{new_key_type, SlotMap};

use super::input::PointerKind;
use crate::dom::node::NodeId;

new_key_type! {
    /// Token for one window listener registration.
    pub struct SubscriptionId;
}

/// What a window listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer gestures of the given kind anywhere in the document.
    OutsidePointer(PointerKind),
    /// Window resize and scroll.
    Viewport,
    /// Key presses.
    KeyDown,
}

/// One registration: which widget root listens for what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub owner: NodeId,
    pub kind: ListenerKind,
}

/// Registry of window listeners for one page.
#[derive(Debug, Default)]
pub struct WindowListeners {
    listeners: SlotMap<SubscriptionId, (u64, Listener)>,
    next_seq: u64,
}

impl WindowListeners {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `owner`.
    pub fn subscribe(&mut self, owner: NodeId, kind: ListenerKind) -> SubscriptionId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.listeners.insert((seq, Listener { owner, kind }));
        tracing::trace!(?kind, "window listener attached");
        id
    }

    /// Remove a listener. Returns `false` if the token was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.listeners.remove(id) {
            Some((_, listener)) => {
                tracing::trace!(kind = ?listener.kind, "window listener detached");
                true
            }
            None => false,
        }
    }

    /// Owners listening for `kind`, in registration order.
    pub fn subscribers(&self, kind: ListenerKind) -> Vec<NodeId> {
        let mut found: Vec<(u64, NodeId)> = self
            .listeners
            .values()
            .filter(|(_, listener)| listener.kind == kind)
            .map(|(seq, listener)| (*seq, listener.owner))
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        found.into_iter().map(|(_, owner)| owner).collect()
    }

    /// Number of listeners of `kind` registered by `owner`.
    pub fn count_for(&self, owner: NodeId, kind: ListenerKind) -> usize {
        self.listeners
            .values()
            .filter(|(_, listener)| listener.owner == owner && listener.kind == kind)
            .count()
    }

    /// Number of listeners registered by `owner`.
    pub fn count_owned(&self, owner: NodeId) -> usize {
        self.listeners.values().filter(|(_, listener)| listener.owner == owner).count()
    }

    /// Total number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// The subscriptions one widget currently holds, at most one per slot.
///
/// `attach` and `detach` are idempotent, so an open dropdown can never hold
/// two listeners of the same kind.
#[derive(Debug, Default)]
pub struct ActiveSubscriptions {
    outside: Option<SubscriptionId>,
    viewport: Option<SubscriptionId>,
    keydown: Option<SubscriptionId>,
}

impl ActiveSubscriptions {
    /// Attach a listener of `kind` unless one is already held.
    pub fn attach(&mut self, registry: &mut WindowListeners, owner: NodeId, kind: ListenerKind) {
        let slot = self.slot_mut(kind);
        if slot.is_none() {
            *slot = Some(registry.subscribe(owner, kind));
        }
    }

    /// Detach the listener held for `kind`, if any.
    pub fn detach(&mut self, registry: &mut WindowListeners, kind: ListenerKind) {
        if let Some(id) = self.slot_mut(kind).take() {
            registry.unsubscribe(id);
        }
    }

    /// Detach everything.
    pub fn detach_all(&mut self, registry: &mut WindowListeners) {
        for id in [self.outside.take(), self.viewport.take(), self.keydown.take()]
            .into_iter()
            .flatten()
        {
            registry.unsubscribe(id);
        }
    }

    fn slot_mut(&mut self, kind: ListenerKind) -> &mut Option<SubscriptionId> {
        match kind {
            ListenerKind::OutsidePointer(_) => &mut self.outside,
            ListenerKind::Viewport => &mut self.viewport,
            ListenerKind::KeyDown => &mut self.keydown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, NodeData};

    fn owners() -> (NodeId, NodeId) {
        let mut dom = Dom::new();
        let a = dom.insert(NodeData::new("div"));
        let b = dom.insert_child(a, NodeData::new("div"));
        (a, b)
    }

    const CLICK: ListenerKind = ListenerKind::OutsidePointer(PointerKind::Click);

    #[test]
    fn subscribe_and_query() {
        let (a, b) = owners();
        let mut registry = WindowListeners::new();
        registry.subscribe(a, CLICK);
        registry.subscribe(b, CLICK);
        registry.subscribe(a, ListenerKind::KeyDown);

        assert_eq!(registry.subscribers(CLICK), vec![a, b]);
        assert_eq!(registry.subscribers(ListenerKind::KeyDown), vec![a]);
        assert!(registry.subscribers(ListenerKind::Viewport).is_empty());
        assert_eq!(registry.count_owned(a), 2);
        assert_eq!(registry.count_for(b, CLICK), 1);
    }

    #[test]
    fn outside_pointer_kinds_are_distinct() {
        let (a, _) = owners();
        let mut registry = WindowListeners::new();
        registry.subscribe(a, ListenerKind::OutsidePointer(PointerKind::TouchStart));
        assert!(registry.subscribers(CLICK).is_empty());
    }

    #[test]
    fn unsubscribe_twice() {
        let (a, _) = owners();
        let mut registry = WindowListeners::new();
        let id = registry.subscribe(a, ListenerKind::Viewport);
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn active_attach_is_idempotent() {
        let (a, _) = owners();
        let mut registry = WindowListeners::new();
        let mut active = ActiveSubscriptions::default();
        active.attach(&mut registry, a, ListenerKind::KeyDown);
        active.attach(&mut registry, a, ListenerKind::KeyDown);
        assert_eq!(registry.count_for(a, ListenerKind::KeyDown), 1);
        assert_eq!(registry.count_for(a, ListenerKind::Viewport), 0);
    }

    #[test]
    fn active_detach_all_leaves_nothing() {
        let (a, _) = owners();
        let mut registry = WindowListeners::new();
        let mut active = ActiveSubscriptions::default();
        active.attach(&mut registry, a, CLICK);
        active.attach(&mut registry, a, ListenerKind::Viewport);
        active.attach(&mut registry, a, ListenerKind::KeyDown);
        assert_eq!(registry.len(), 3);

        active.detach(&mut registry, ListenerKind::KeyDown);
        active.detach(&mut registry, ListenerKind::KeyDown);
        assert_eq!(registry.len(), 2);

        active.detach_all(&mut registry);
        assert!(registry.is_empty());

        // Slots are free again.
        active.attach(&mut registry, a, ListenerKind::KeyDown);
        assert_eq!(registry.len(), 1);
    }
}
