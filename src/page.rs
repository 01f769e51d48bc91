//! Per-document state shared by every widget on a page.
//!
//! [`Page`] owns the DOM, the viewport, layout, focus, window listeners,
//! timers and the message queue. Widgets receive `&mut Page` in every hook;
//! the [`Document`](crate::document::Document) owns the page alongside the
//! widget registry.

use crate::css::MatchContext;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::event::handler::EventDispatcher;
use crate::event::input::PointerKind;
use crate::event::subscription::WindowListeners;
use crate::geometry::{Offset, Region};
use crate::layout::{LayoutEngine, LayoutMetrics, SpatialMap};
use crate::timer::TimerQueue;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    /// Vertical window scroll offset, in layout units.
    pub scroll_y: i32,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A single page: DOM, viewport, layout, focus, listeners, timers, messages.
pub struct Page {
    /// The DOM tree. Its root is the `<body>` element.
    pub dom: Dom,
    body: NodeId,
    viewport: Viewport,
    /// Row height and friends used to resolve node styles.
    pub metrics: LayoutMetrics,
    layout: LayoutEngine,
    spatial: SpatialMap,
    focus: Option<NodeId>,
    /// Window-level listener registry.
    pub listeners: WindowListeners,
    /// One-shot timers on the virtual clock.
    pub timers: TimerQueue,
    /// Messages emitted by widgets, drained by the host.
    pub dispatcher: EventDispatcher,
    touch_capable: bool,
}

impl Page {
    /// Create an empty page with a `<body>` root and the given viewport size.
    pub fn new(width: u16, height: u16) -> Self {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let mut page = Self {
            dom,
            body,
            viewport: Viewport { width, height, scroll_y: 0 },
            metrics: LayoutMetrics::default(),
            layout: LayoutEngine::new(),
            spatial: SpatialMap::new(),
            focus: None,
            listeners: WindowListeners::new(),
            timers: TimerQueue::new(),
            dispatcher: EventDispatcher::new(),
            touch_capable: false,
        };
        page.relayout();
        page
    }

    /// Mark the page as running on a touch-capable device (builder).
    pub fn with_touch(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_touch_capable(&self) -> bool {
        self.touch_capable
    }

    /// The pointer gesture outside-interaction listeners subscribe to:
    /// touchstart on touch devices, click elsewhere.
    pub fn outside_pointer_kind(&self) -> PointerKind {
        if self.touch_capable {
            PointerKind::TouchStart
        } else {
            PointerKind::Click
        }
    }

    // -- layout ---------------------------------------------------------

    /// Recompute layout for the whole document and refresh the hit map.
    pub fn relayout(&mut self) {
        self.layout.sync_tree(&self.dom, &self.metrics);
        self.layout
            .compute(f32::from(self.viewport.width), f32::from(self.viewport.height));
        let regions = self.layout.absolute_regions(&self.dom);
        self.spatial.update_ordered(&regions);
        self.scroll_to(self.viewport.scroll_y);
    }

    /// Resize the viewport and relayout.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.relayout();
    }

    /// Scroll the window to `y`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: i32) {
        let max = (self.document_height() - i32::from(self.viewport.height)).max(0);
        self.viewport.scroll_y = y.clamp(0, max);
    }

    /// Height of the laid-out document.
    pub fn document_height(&self) -> i32 {
        self.layout.get_layout(self.body).map_or(0, |region| region.height)
    }

    /// Region of `node` in document coordinates, as of the last relayout.
    pub fn region(&self, node: NodeId) -> Option<Region> {
        self.layout.absolute_region(&self.dom, node)
    }

    /// Region of `node` relative to its parent's content origin.
    pub fn local_region(&self, node: NodeId) -> Option<Region> {
        self.layout.get_layout(node)
    }

    /// Every rendered node with its document region, in tree order.
    pub fn rendered_regions(&self) -> Vec<(NodeId, Region)> {
        self.layout.absolute_regions(&self.dom)
    }

    /// Height of the displayed content inside `node`.
    pub fn content_height(&self, node: NodeId) -> i32 {
        self.layout.content_height(&self.dom, node)
    }

    /// The frontmost rendered node under window coordinates `(x, y)`.
    pub fn node_at(&self, x: i32, y: i32) -> Option<NodeId> {
        self.spatial.node_at(Offset::new(x, y + self.viewport.scroll_y))
    }

    // -- focus ----------------------------------------------------------

    /// The focused node, if it still exists.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.filter(|&node| self.dom.contains(node))
    }

    pub fn is_focused(&self, node: NodeId) -> bool {
        self.focused() == Some(node)
    }

    /// Whether `node` can take focus right now: focusable, enabled and
    /// rendered.
    pub fn can_focus(&self, node: NodeId) -> bool {
        self.dom
            .get(node)
            .is_some_and(|data| data.focusable && !data.disabled)
            && self.dom.is_rendered(node)
    }

    /// Focus `node`. Returns `false`, leaving focus unchanged, if the node
    /// cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.can_focus(node) {
            return false;
        }
        self.focus = Some(node);
        true
    }

    /// Drop focus if `node` holds it.
    pub fn blur(&mut self, node: NodeId) {
        if self.focus == Some(node) {
            self.focus = None;
        }
    }

    /// Drop focus if it lies anywhere inside `scope`.
    pub fn blur_within(&mut self, scope: NodeId) {
        if let Some(node) = self.focused() {
            if self.dom.is_inclusive_descendant(node, scope) {
                self.focus = None;
            }
        }
    }

    /// Focusable nodes in tab order (depth-first).
    pub fn tab_order(&self) -> Vec<NodeId> {
        self.dom
            .walk_depth_first(self.body)
            .into_iter()
            .filter(|&node| self.can_focus(node))
            .collect()
    }

    /// Move focus to the next node in tab order. Wraps around.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        let chain = self.tab_order();
        if chain.is_empty() {
            return None;
        }
        let next = match self.current_position(&chain) {
            Some(idx) => (idx + 1) % chain.len(),
            None => 0,
        };
        self.focus = Some(chain[next]);
        self.focus
    }

    /// Move focus to the previous node in tab order. Wraps around.
    pub fn focus_previous(&mut self) -> Option<NodeId> {
        let chain = self.tab_order();
        if chain.is_empty() {
            return None;
        }
        let prev = match self.current_position(&chain) {
            Some(0) | None => chain.len() - 1,
            Some(idx) => idx - 1,
        };
        self.focus = Some(chain[prev]);
        self.focus
    }

    fn current_position(&self, chain: &[NodeId]) -> Option<usize> {
        let current = self.focused()?;
        chain.iter().position(|&node| node == current)
    }

    // -- queries --------------------------------------------------------

    /// Selector state for the current focus.
    pub fn match_context(&self) -> MatchContext {
        MatchContext::with_focus(self.focused())
    }

    /// Descendants of `scope` matching `selector`, in tree order.
    ///
    /// An invalid selector matches nothing.
    pub fn select_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match self.dom.select_all(scope, selector, &self.match_context()) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(%err, selector, "invalid selector");
                Vec::new()
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
