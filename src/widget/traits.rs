//! Widget trait: the hooks a document calls while routing input.
//!
//! A widget owns a subtree of the page rooted at [`Widget::root`]. The
//! [`Document`](crate::document::Document) routes pointer, key, focus,
//! viewport and timer events to the widget that owns the target node or
//! that subscribed through the page's window listeners.

use std::any::Any;

use slotmap::new_key_type;

use crate::dom::node::NodeId;
use crate::event::input::{KeyEvent, PointerEvent};
use crate::page::Page;
use crate::timer::TimerKind;

new_key_type! {
    /// Handle for a widget registered with a document.
    pub struct WidgetId;
}

/// Whether the document should still run the default action for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFlow {
    #[default]
    Continue,
    /// Suppress the default action (text entry, button activation).
    PreventDefault,
}

impl EventFlow {
    pub fn is_prevented(self) -> bool {
        self == EventFlow::PreventDefault
    }
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by all widgets.
///
/// Every hook except `widget_type`, `root` and the `Any` casts has a no-op
/// default, so widgets implement only what they react to.
pub trait Widget {
    /// Type name, used in logs.
    fn widget_type(&self) -> &str;

    /// Root node of the subtree this widget owns.
    fn root(&self) -> NodeId;

    /// A click landed on `event.target`, which lies inside [`root`](Widget::root).
    fn on_click(&mut self, _page: &mut Page, _event: PointerEvent) {}

    /// A pointer gesture reached the window while this widget held an
    /// outside-pointer subscription. The target may lie anywhere.
    fn on_window_pointer(&mut self, _page: &mut Page, _event: PointerEvent) {}

    /// A key press reached the window while this widget held a keydown
    /// subscription.
    fn on_keydown(&mut self, _page: &mut Page, _key: &KeyEvent) -> EventFlow {
        EventFlow::Continue
    }

    /// The value of `target`, an input inside the widget, was edited.
    fn on_input(&mut self, _page: &mut Page, _target: NodeId) {}

    /// `target`, a node inside the widget, received focus from the user.
    fn on_focus(&mut self, _page: &mut Page, _target: NodeId) {}

    /// The window was resized or scrolled while subscribed.
    fn on_viewport_change(&mut self, _page: &mut Page) {}

    /// A timer this widget scheduled fired.
    fn on_timer(&mut self, _page: &mut Page, _kind: TimerKind) {}

    /// Re-derive rendered content from the bound source.
    fn reset(&mut self, _page: &mut Page) {}

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ===========================================================================
// Tests
// ===========================================================================
