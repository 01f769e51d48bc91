//! Document: widget registry, input routing, timer firing.
//!
//! [`Document`] ties together the [`Page`] and the widgets bound to it. Hosts
//! feed [`InputEvent`]s and advance the virtual clock; the document routes
//! each event to the owning widget and to window-listener subscribers, then
//! fires whatever timers became due.

use std::collections::HashMap;
use std::time::Duration;

use slotmap::SlotMap;

use crate::dom::node::NodeId;
use crate::error::{Error, Result};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent, PointerKind};
use crate::event::message::{Change, Envelope};
use crate::event::subscription::ListenerKind;
use crate::page::Page;
use crate::timer::Timer;
use crate::widget::traits::{EventFlow, Widget, WidgetId};
use crate::widgets::select::{SelectConfig, SelectWidget};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A page plus the widgets bound to it.
pub struct Document {
    /// DOM, viewport, focus, listeners, timers, messages.
    pub page: Page,
    widgets: SlotMap<WidgetId, Box<dyn Widget>>,
    /// Native element -> widget bound to it.
    bound: HashMap<NodeId, WidgetId>,
    /// Widget root -> widget.
    roots: HashMap<NodeId, WidgetId>,
}

impl Document {
    /// Create a document with an empty `<body>` and the given viewport.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_page(Page::new(width, height))
    }

    /// Create a document around an existing page.
    pub fn with_page(page: Page) -> Self {
        Self {
            page,
            widgets: SlotMap::with_key(),
            bound: HashMap::new(),
            roots: HashMap::new(),
        }
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.page.body()
    }

    // -- widgets --------------------------------------------------------

    /// Bind a [`SelectWidget`] to the native `select`.
    ///
    /// Binding an element twice returns the existing widget; the new
    /// configuration is ignored.
    pub fn custom_select(&mut self, select: NodeId, config: SelectConfig) -> Result<WidgetId> {
        if let Some(&id) = self.bound.get(&select) {
            tracing::debug!(?select, "select already bound");
            return Ok(id);
        }
        let widget = SelectWidget::mount(&mut self.page, select, config)?;
        let id = self.register(select, Box::new(widget));
        self.page.relayout();
        Ok(id)
    }

    /// Bind a [`SelectWidget`] to every element matching `selector`, in
    /// document order.
    pub fn custom_select_all(&mut self, selector: &str, config: SelectConfig) -> Result<Vec<WidgetId>> {
        let ctx = self.page.match_context();
        let targets = self.page.dom.select_all(self.body(), selector, &ctx)?;
        targets
            .into_iter()
            .map(|select| self.custom_select(select, config.clone()))
            .collect()
    }

    fn register(&mut self, bound_to: NodeId, widget: Box<dyn Widget>) -> WidgetId {
        let root = widget.root();
        let id = self.widgets.insert(widget);
        self.bound.insert(bound_to, id);
        self.roots.insert(root, id);
        id
    }

    /// Re-derive a widget's rendered content from its source element.
    pub fn reset(&mut self, id: WidgetId) -> Result<()> {
        self.dispatch(id, |widget, page| widget.reset(page))
            .ok_or(Error::UnknownWidget(id))?;
        self.page.relayout();
        Ok(())
    }

    /// The widget bound to `element`, if any.
    pub fn widget_for(&self, element: NodeId) -> Option<WidgetId> {
        self.bound.get(&element).copied()
    }

    /// Borrow a widget as its concrete type.
    pub fn widget<T: Widget + 'static>(&self, id: WidgetId) -> Option<&T> {
        self.widgets.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Number of bound widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Run `f` against widget `id` and the page.
    fn dispatch<R>(&mut self, id: WidgetId, f: impl FnOnce(&mut dyn Widget, &mut Page) -> R) -> Option<R> {
        let widget = self.widgets.get_mut(id)?;
        Some(f(widget.as_mut(), &mut self.page))
    }

    /// The widget whose subtree contains `node`.
    fn owner_of(&self, node: NodeId) -> Option<WidgetId> {
        std::iter::once(node)
            .chain(self.page.dom.ancestors(node))
            .find_map(|candidate| self.roots.get(&candidate).copied())
    }

    /// Widgets subscribed to `kind`, in subscription order.
    fn subscribers(&self, kind: ListenerKind) -> Vec<WidgetId> {
        self.page
            .listeners
            .subscribers(kind)
            .into_iter()
            .filter_map(|root| self.roots.get(&root).copied())
            .collect()
    }

    // -- input ----------------------------------------------------------

    /// Route one input event, then fire timers that became due.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::PointerAt { x, y, kind } => match self.page.node_at(x, y) {
                Some(target) => self.handle_pointer(PointerEvent { target, kind, trusted: true }),
                None => tracing::trace!(x, y, "pointer hit nothing"),
            },
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Resize { width, height } => {
                self.page.resize(width, height);
                self.notify_viewport();
            }
            InputEvent::Scroll { y } => {
                self.page.scroll_to(y);
                self.notify_viewport();
            }
            InputEvent::ScrollBy { dy } => {
                let y = self.page.viewport().scroll_y + dy;
                self.page.scroll_to(y);
                self.notify_viewport();
            }
            InputEvent::Paste(text) => self.edit_focused_input(|value| value.push_str(&text)),
        }
        self.settle();
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let target = event.target;
        if !self.page.dom.contains(target) {
            tracing::warn!(?target, "pointer event for unknown node");
            return;
        }
        // Users cannot hit hidden or disabled elements.
        let reachable = self.page.dom.is_rendered(target)
            && self.page.dom.get(target).is_some_and(|data| !data.disabled);
        if event.trusted && !reachable {
            tracing::trace!(?target, "pointer on unreachable node ignored");
            return;
        }

        if event.kind == PointerKind::Click {
            if event.trusted {
                self.focus_from_pointer(target);
            }
            if let Some(owner) = self.owner_of(target) {
                self.dispatch(owner, |widget, page| widget.on_click(page, event));
            }
        }
        for id in self.subscribers(ListenerKind::OutsidePointer(event.kind)) {
            self.dispatch(id, |widget, page| widget.on_window_pointer(page, event));
        }
    }

    /// Clicking moves focus to the target, or away from everything when the
    /// target cannot take focus.
    fn focus_from_pointer(&mut self, target: NodeId) {
        if self.page.is_focused(target) {
            return;
        }
        if self.page.focus(target) {
            self.notify_focus(target);
        } else {
            let body = self.body();
            self.page.blur_within(body);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let mut flow = EventFlow::Continue;
        for id in self.subscribers(ListenerKind::KeyDown) {
            if let Some(EventFlow::PreventDefault) = self.dispatch(id, |widget, page| widget.on_keydown(page, &key)) {
                flow = EventFlow::PreventDefault;
            }
        }
        if !flow.is_prevented() {
            self.default_key_action(key);
        }
    }

    /// What the page does with a key nobody prevented: tab focus, text entry
    /// into a focused input, button activation.
    fn default_key_action(&mut self, key: KeyEvent) {
        match key.code {
            Key::Tab => {
                if let Some(node) = self.page.focus_next() {
                    self.notify_focus(node);
                }
                return;
            }
            Key::BackTab => {
                if let Some(node) = self.page.focus_previous() {
                    self.notify_focus(node);
                }
                return;
            }
            _ => {}
        }

        let Some(focused) = self.page.focused() else {
            return;
        };
        let tag = self
            .page
            .dom
            .get(focused)
            .map(|data| data.tag.to_ascii_lowercase())
            .unwrap_or_default();
        let plain = !key.modifiers.contains(Modifiers::CTRL) && !key.modifiers.contains(Modifiers::ALT);

        match (tag.as_str(), key.code) {
            ("input", Key::Char(ch)) if plain => self.edit_focused_input(|value| value.push(ch)),
            ("input", Key::Backspace) => self.edit_focused_input(|value| {
                value.pop();
            }),
            ("button", Key::Enter | Key::Char(' ')) => self.handle_pointer(PointerEvent::click(focused)),
            _ => {}
        }
    }

    /// Apply `edit` to the focused `<input>`'s value and notify its owner.
    fn edit_focused_input(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(focused) = self.page.focused() else {
            return;
        };
        let is_input = self
            .page
            .dom
            .get(focused)
            .is_some_and(|data| data.tag.eq_ignore_ascii_case("input"));
        if !is_input {
            return;
        }
        self.page.dom.update(focused, |data| edit(&mut data.value));
        if let Some(owner) = self.owner_of(focused) {
            self.dispatch(owner, |widget, page| widget.on_input(page, focused));
        }
    }

    fn notify_focus(&mut self, node: NodeId) {
        if let Some(owner) = self.owner_of(node) {
            self.dispatch(owner, |widget, page| widget.on_focus(page, node));
        }
    }

    fn notify_viewport(&mut self) {
        for id in self.subscribers(ListenerKind::Viewport) {
            self.dispatch(id, |widget, page| widget.on_viewport_change(page));
        }
    }

    // -- time -----------------------------------------------------------

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.page.timers.now()
    }

    /// When the next timer is due, if any.
    pub fn next_timer_deadline(&self) -> Option<Duration> {
        self.page.timers.next_deadline()
    }

    /// Move the clock forward by `by`, firing timers in order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now().saturating_add(by);
        self.advance_to(target);
    }

    /// Move the clock to `target`, firing every timer due on the way at its
    /// own due time.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(deadline) = self.next_timer_deadline().filter(|deadline| *deadline <= target) {
            self.page.timers.set_now(deadline);
            self.fire_due_timers();
        }
        self.page.timers.set_now(target);
        self.page.relayout();
    }

    /// Fire every pending timer, advancing the clock as far as needed.
    pub fn flush(&mut self) {
        while let Some(timer) = self.page.timers.pop_next() {
            self.fire(timer);
        }
        self.page.relayout();
    }

    fn settle(&mut self) {
        self.fire_due_timers();
        self.page.relayout();
    }

    fn fire_due_timers(&mut self) {
        while let Some(timer) = self.page.timers.pop_due() {
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: Timer) {
        tracing::trace!(kind = ?timer.kind, due = ?timer.due, "timer fired");
        if let Some(&id) = self.roots.get(&timer.owner) {
            self.dispatch(id, |widget, page| widget.on_timer(page, timer.kind));
        }
    }

    // -- messages -------------------------------------------------------

    /// Drain every queued message.
    pub fn drain_messages(&mut self) -> Vec<Envelope> {
        self.page.dispatcher.drain()
    }

    /// Drain queued change notifications, leaving other messages queued.
    pub fn take_changes(&mut self) -> Vec<Change> {
        self.page.dispatcher.drain_of::<Change>()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
