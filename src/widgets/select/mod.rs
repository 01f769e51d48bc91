//! SelectWidget: a styleable dropdown bound to a native `<select>`.
//!
//! The widget hides the native element, inserts its own markup right after
//! it and keeps both in sync:
//!
//! ```text
//! div.{block}
//! ├── button.{block}__option.{block}__option--value
//! └── div.{block}__dropdown
//!     ├── input.{block}__input                (search only)
//!     └── div.{block}__option-wrap            (search only)
//!         └── button.{block}__option ...      one per listed option
//! ```
//!
//! Opening and closing run through [`Phase`]; each transition completes on a
//! timer, and the value display ignores clicks while one is in flight.

pub mod config;
pub mod keyboard;
pub mod option;
pub mod search;

use std::any::Any;
use std::time::Duration;

use crate::dom::node::{NodeData, NodeId};
use crate::error::{Error, Result};
use crate::event::binding::NavAction;
use crate::event::input::{KeyEvent, PointerEvent};
use crate::event::message::{Change, Envelope, Toggled};
use crate::event::subscription::{ActiveSubscriptions, ListenerKind};
use crate::page::Page;
use crate::timer::{Generation, TimerKind};
use crate::widget::scroll::ScrollState;
use crate::widget::traits::{EventFlow, Widget};

pub use config::{Callback, SelectConfig};
pub use keyboard::OptionCursor;
pub use option::SelectOption;
pub use search::SearchBox;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Open/close state of the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    /// Visible, open transition running.
    Opening,
    Open,
    /// Still visible, close transition running.
    Closing,
}

impl Phase {
    /// Whether the dropdown is open or opening.
    pub fn is_open(self) -> bool {
        matches!(self, Phase::Opening | Phase::Open)
    }

    /// Whether a transition is in flight.
    pub fn in_transition(self) -> bool {
        matches!(self, Phase::Opening | Phase::Closing)
    }
}

/// A rendered dropdown entry and the native option it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    node: NodeId,
    option: NodeId,
}

// ---------------------------------------------------------------------------
// SelectWidget
// ---------------------------------------------------------------------------

pub struct SelectWidget {
    config: SelectConfig,
    select: NodeId,
    root: NodeId,
    value: NodeId,
    dropdown: NodeId,
    search: Option<SearchBox>,
    options: Vec<SelectOption>,
    selected: Option<usize>,
    entries: Vec<Entry>,
    /// Class list currently copied onto the value display.
    value_class: Option<String>,
    phase: Phase,
    dropup: bool,
    transition: Generation,
    arming: Generation,
    cursor: OptionCursor,
    subscriptions: ActiveSubscriptions,
}

impl SelectWidget {
    /// Bind a new widget to the native `select`.
    ///
    /// Builds the widget markup right after `select`, hides `select` and
    /// renders the option list.
    pub fn mount(page: &mut Page, select: NodeId, config: SelectConfig) -> Result<Self> {
        let data = page.dom.get(select).ok_or(Error::UnknownNode(select))?;
        if !data.tag.eq_ignore_ascii_case("select") {
            return Err(Error::NotASelect { node: select, tag: data.tag.clone() });
        }

        let mut root_data = NodeData::new("div").with_class(config.block_name.clone());
        if let Some(modifier) = &config.modifier_class {
            root_data.add_class_list(modifier);
        }
        let root = page
            .dom
            .insert_after(select, root_data)
            .ok_or(Error::Detached(select))?;
        page.dom.update(select, |data| data.visible = false);

        let value = page.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes([config.element("__option"), config.element("__option--value")])
                .focusable(true),
        );
        let dropdown = page.dom.insert_child(
            root,
            NodeData::new("div")
                .with_class(config.element("__dropdown"))
                .visible(false),
        );
        let search = config.search_enabled.then(|| {
            SearchBox::mount(&mut page.dom, dropdown, &config.block_name, config.search_placeholder.as_deref())
        });

        let mut widget = Self {
            config,
            select,
            root,
            value,
            dropdown,
            search,
            options: Vec::new(),
            selected: None,
            entries: Vec::new(),
            value_class: None,
            phase: Phase::Closed,
            dropup: false,
            transition: Generation::default(),
            arming: Generation::default(),
            cursor: OptionCursor::default(),
            subscriptions: ActiveSubscriptions::default(),
        };
        widget.fill(page);
        tracing::debug!(
            block = %widget.config.block_name,
            options = widget.options.len(),
            "custom select mounted"
        );
        Ok(widget)
    }

    // -- accessors ------------------------------------------------------

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// The bound native `<select>`.
    pub fn select_node(&self) -> NodeId {
        self.select
    }

    /// The always-visible value display.
    pub fn value_display(&self) -> NodeId {
        self.value
    }

    pub fn dropdown(&self) -> NodeId {
        self.dropdown
    }

    /// The filter input, when search is enabled.
    pub fn search_input(&self) -> Option<NodeId> {
        self.search.as_ref().map(SearchBox::input)
    }

    /// The entries' scroll wrap, when search is enabled.
    pub fn option_wrap(&self) -> Option<NodeId> {
        self.search.as_ref().map(SearchBox::wrap)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn is_dropup(&self) -> bool {
        self.dropup
    }

    /// Snapshot of the native options as of the last synchronization.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Index of the selected option, `None` while the placeholder shows.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.selected.and_then(|index| self.options.get(index))
    }

    /// Keyboard cursor position among the navigable entries.
    pub fn focus_index(&self) -> Option<usize> {
        self.cursor.index()
    }

    /// Current filter text (trimmed), empty without search.
    pub fn search_query(&self, page: &Page) -> String {
        self.search
            .as_ref()
            .map(|search| search.query(&page.dom))
            .unwrap_or_default()
    }

    /// Rendered entry nodes, in order.
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        self.entries.iter().map(|entry| entry.node).collect()
    }

    /// Labels of the rendered entries, in order.
    pub fn entry_labels(&self, page: &Page) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| page.dom.text_content(entry.node))
            .collect()
    }

    /// Labels of the entries not hidden by the filter.
    pub fn visible_entry_labels(&self, page: &Page) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| page.dom.get(entry.node).is_some_and(|data| data.visible))
            .map(|entry| page.dom.text_content(entry.node))
            .collect()
    }

    // -- rendering ------------------------------------------------------

    /// Container the entries live in: the option wrap with search, the
    /// dropdown otherwise.
    fn entry_container(&self) -> NodeId {
        self.search.as_ref().map_or(self.dropdown, SearchBox::wrap)
    }

    fn position_of(&self, option: NodeId) -> Option<usize> {
        self.options.iter().position(|candidate| candidate.node == option)
    }

    /// Snapshot the native options, settle the initial selection and render.
    fn fill(&mut self, page: &mut Page) {
        self.options = SelectOption::snapshot(&page.dom, self.select);
        self.selected = match page.dom.selected_option(self.select) {
            Some(explicit) => {
                page.dom.set_selected(self.select, explicit);
                self.position_of(explicit)
            }
            None if self.config.placeholder_html.is_some() => None,
            None => match self.options.first() {
                Some(first) => {
                    page.dom.set_selected(self.select, first.node);
                    Some(0)
                }
                None => None,
            },
        };
        self.render_value(page);
        self.render_entries(page);
    }

    /// Show the selected label (or the placeholder) and its class list in
    /// the value display.
    fn render_value(&mut self, page: &mut Page) {
        let (text, class) = match self.selected_option() {
            Some(option) => (option.text.clone(), option.class.clone()),
            None => (self.config.placeholder_html.clone().unwrap_or_default(), None),
        };
        let stale = std::mem::replace(&mut self.value_class, class.clone());
        page.dom.update(self.value, |data| {
            data.text = text;
            if let Some(stale) = &stale {
                data.remove_class_list(stale);
            }
            if let Some(class) = &class {
                data.add_class_list(class);
            }
        });
    }

    /// Bring the entry list in line with `options`: every option except the
    /// selection, or all of them when the selection stays listed or nothing
    /// is selected. Entry nodes are reused in order; surplus ones are removed.
    fn render_entries(&mut self, page: &mut Page) {
        let include_all = self.config.include_value_in_dropdown || self.selected.is_none();
        let listed: Vec<usize> = (0..self.options.len())
            .filter(|&index| include_all || Some(index) != self.selected)
            .collect();

        while self.entries.len() > listed.len() {
            if let Some(surplus) = self.entries.pop() {
                page.dom.remove(surplus.node);
            }
        }

        let container = self.entry_container();
        let marker = self.config.element("__option--selected");
        for (slot, &index) in listed.iter().enumerate() {
            let option = &self.options[index];
            let mut data = entry_data(&self.config.element("__option"), option);
            if self.config.include_value_in_dropdown && Some(index) == self.selected {
                data.add_class(&marker);
            }
            match self.entries.get_mut(slot) {
                Some(entry) => {
                    entry.option = option.node;
                    if let Some(existing) = page.dom.get_mut(entry.node) {
                        *existing = data;
                    }
                }
                None => {
                    let node = page.dom.insert_child(container, data);
                    self.entries.push(Entry { node, option: option.node });
                }
            }
        }

        let empty = self.entries.is_empty();
        page.dom.update(self.value, |data| data.disabled = empty);
    }

    /// Move the selected marker onto the entry for `option`.
    fn mark_selected(&self, page: &mut Page, option: NodeId) {
        let marker = self.config.element("__option--selected");
        for entry in &self.entries {
            page.dom
                .update(entry.node, |data| data.set_class(&marker, entry.option == option));
        }
    }

    // -- state machine --------------------------------------------------

    fn toggle(&mut self, page: &mut Page) {
        match self.phase {
            Phase::Closed => self.show(page),
            Phase::Open => self.hide(page),
            Phase::Opening | Phase::Closing => {
                tracing::trace!(phase = ?self.phase, "toggle ignored during transition");
            }
        }
    }

    /// Start opening the dropdown.
    fn show(&mut self, page: &mut Page) {
        if self.phase != Phase::Closed {
            return;
        }
        self.phase = Phase::Opening;
        let active = self.config.element("--active");
        page.dom.update(self.dropdown, |data| data.visible = true);
        page.dom.update(self.root, |data| data.add_class(&active));
        self.update_dropup(page);

        let generation = self.transition.bump();
        page.timers.schedule(
            self.root,
            self.config.transition_duration,
            TimerKind::TransitionEnd { generation },
        );
        let generation = self.arming.bump();
        page.timers
            .schedule(self.root, Duration::ZERO, TimerKind::ArmOutsideListener { generation });
        self.subscriptions
            .attach(&mut page.listeners, self.root, ListenerKind::Viewport);
        if self.config.keyboard_enabled {
            self.cursor.reset();
            self.subscriptions
                .attach(&mut page.listeners, self.root, ListenerKind::KeyDown);
        }
        tracing::debug!(dropup = self.dropup, "dropdown opening");
    }

    /// Start closing the dropdown.
    fn hide(&mut self, page: &mut Page) {
        if !self.phase.is_open() {
            return;
        }
        self.phase = Phase::Closing;
        self.arming.bump();

        let entries = self.entry_nodes();
        if let Some(search) = &mut self.search {
            search.clear(page, &entries);
        }
        if self.config.keyboard_enabled {
            for &entry in &entries {
                page.blur(entry);
            }
            self.subscriptions.detach(&mut page.listeners, ListenerKind::KeyDown);
        }

        let generation = self.transition.bump();
        page.timers.schedule(
            self.root,
            self.config.transition_duration,
            TimerKind::TransitionEnd { generation },
        );
        tracing::debug!("dropdown closing");
    }

    fn finish_show(&mut self, page: &mut Page) {
        self.phase = Phase::Open;
        if let Some(input) = self.search_input() {
            if page.focus(input) {
                self.on_search_focus(page);
            }
        }
        if self.config.include_value_in_dropdown {
            self.center_selected(page);
        }
        if let Some(hook) = &self.config.on_show {
            hook(self.root);
        }
        page.dispatcher
            .push(Envelope::new(Toggled { root: self.root, open: true }, self.root));
        tracing::debug!("dropdown open");
    }

    fn finish_hide(&mut self, page: &mut Page) {
        self.phase = Phase::Closed;
        self.dropup = false;
        let active = self.config.element("--active");
        let dropup = self.config.element("--dropup");
        page.dom.update(self.dropdown, |data| data.visible = false);
        page.dom.update(self.root, |data| {
            data.remove_class(&active);
            data.remove_class(&dropup);
        });
        self.subscriptions.detach_all(&mut page.listeners);

        if let Some(hook) = &self.config.on_hide {
            hook(self.root);
        }
        page.dispatcher
            .push(Envelope::new(Toggled { root: self.root, open: false }, self.root));
        tracing::debug!("dropdown closed");
    }

    /// Flip the dropdown above the control when the space below the value
    /// display is smaller than the dropdown.
    fn update_dropup(&mut self, page: &mut Page) {
        page.relayout();
        let viewport = page.viewport();
        let (Some(control), Some(dropdown)) = (page.region(self.value), page.region(self.dropdown)) else {
            return;
        };
        let space_below = i32::from(viewport.height) - (control.bottom() - viewport.scroll_y);
        self.dropup = space_below < dropdown.height;
        let class = self.config.element("--dropup");
        let dropup = self.dropup;
        page.dom.update(self.root, |data| data.set_class(&class, dropup));
    }

    /// Scroll the entry container so the selected entry sits in its middle.
    fn center_selected(&self, page: &mut Page) {
        let Some(option) = self.selected_option().map(|option| option.node) else {
            return;
        };
        let Some(entry) = self.entries.iter().find(|entry| entry.option == option) else {
            return;
        };
        page.relayout();
        let container = self.entry_container();
        let (Some(frame), Some(row)) = (page.local_region(container), page.local_region(entry.node)) else {
            return;
        };
        let mut scroll = ScrollState::new(page.content_height(container), frame.height);
        scroll.center_on(row.y, row.height);
        page.dom.update(container, |data| data.scroll_top = scroll.offset);
    }

    fn on_search_focus(&mut self, page: &mut Page) {
        self.cursor.reset();
        if let Some(search) = &self.search {
            search.reset_scroll(&mut page.dom);
        }
    }

    // -- selection ------------------------------------------------------

    /// Commit `option` as the selection and close.
    fn select(&mut self, page: &mut Page, option: NodeId, trusted: bool) {
        page.dom.set_selected(self.select, option);
        self.options = SelectOption::snapshot(&page.dom, self.select);
        self.selected = self.position_of(option);
        self.render_value(page);
        self.hide(page);

        if self.config.include_value_in_dropdown {
            self.mark_selected(page, option);
        } else {
            self.render_entries(page);
        }

        tracing::debug!(label = ?self.selected_option().map(|o| o.text.as_str()), trusted, "option selected");
        if trusted {
            self.notify_change(page);
        }
    }

    fn notify_change(&self, page: &mut Page) {
        let Some(option) = self.selected_option() else {
            return;
        };
        let change = Change {
            select: self.select,
            value: option.value.clone(),
            label: option.text.clone(),
        };
        page.dispatcher
            .push(Envelope::targeted(change, self.root, self.select));
    }

    // -- keyboard -------------------------------------------------------

    /// Entries the keyboard can move between: rendered and enabled.
    fn navigable(&self, page: &Page) -> Vec<NodeId> {
        let selector = format!(".{}:visible:enabled", self.config.element("__option"));
        page.select_all(self.dropdown, &selector)
    }

    fn move_cursor(&mut self, page: &mut Page, action: NavAction) {
        let candidates = self.navigable(page);
        let index = match action {
            NavAction::Previous => self.cursor.previous(candidates.len()),
            _ => self.cursor.next(candidates.len()),
        };
        if let Some(&target) = index.and_then(|index| candidates.get(index)) {
            page.focus(target);
        }
    }

    /// Enter/Space: click the value display or entry that has focus, then
    /// hand focus back to the value display.
    ///
    /// Returns `false` without touching focus when the focused node is not
    /// one of ours (the search input, another widget, nothing at all).
    fn activate_focused(&mut self, page: &mut Page) -> bool {
        let Some(focused) = page.focused() else {
            return false;
        };
        if focused == self.value {
            self.toggle(page);
        } else if let Some(entry) = self.entries.iter().find(|entry| entry.node == focused).copied() {
            self.select(page, entry.option, false);
            self.notify_change(page);
        } else {
            return false;
        }
        page.focus(self.value);
        true
    }
}

/// Markup for one entry button.
fn entry_data(base_class: &str, option: &SelectOption) -> NodeData {
    let mut data = NodeData::new("button")
        .with_class(base_class)
        .with_text(option.text.clone())
        .focusable(true)
        .disabled(option.disabled);
    if let Some(class) = &option.class {
        data.add_class_list(class);
    }
    data
}

// ---------------------------------------------------------------------------
// Widget impl
// ---------------------------------------------------------------------------

impl Widget for SelectWidget {
    fn widget_type(&self) -> &str {
        "CustomSelect"
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn on_click(&mut self, page: &mut Page, event: PointerEvent) {
        if event.target == self.value {
            self.toggle(page);
            return;
        }
        if let Some(entry) = self.entries.iter().find(|entry| entry.node == event.target).copied() {
            self.select(page, entry.option, event.trusted);
        }
    }

    fn on_window_pointer(&mut self, page: &mut Page, event: PointerEvent) {
        if self.phase.is_open() && !page.dom.is_inclusive_descendant(event.target, self.root) {
            tracing::trace!("pointer outside the widget");
            self.hide(page);
        }
    }

    fn on_keydown(&mut self, page: &mut Page, key: &KeyEvent) -> EventFlow {
        if !self.config.keyboard_enabled || !self.phase.is_open() {
            return EventFlow::Continue;
        }
        let Some(action) = self.config.bindings.resolve(key) else {
            return EventFlow::Continue;
        };
        match action {
            NavAction::Next | NavAction::Previous => self.move_cursor(page, action),
            NavAction::Activate => {
                if !self.activate_focused(page) {
                    return EventFlow::Continue;
                }
            }
            NavAction::Dismiss => {
                self.hide(page);
                page.focus(self.value);
            }
        }
        EventFlow::PreventDefault
    }

    fn on_input(&mut self, page: &mut Page, target: NodeId) {
        if self.search_input() != Some(target) {
            return;
        }
        let entries = self.entry_nodes();
        let debounce = self.config.search_debounce;
        if let Some(search) = &mut self.search {
            search.on_edit(page, self.root, debounce, &entries);
        }
    }

    fn on_focus(&mut self, page: &mut Page, target: NodeId) {
        if self.search_input() == Some(target) {
            self.on_search_focus(page);
        }
    }

    fn on_viewport_change(&mut self, page: &mut Page) {
        if self.phase.is_open() {
            self.update_dropup(page);
        }
    }

    fn on_timer(&mut self, page: &mut Page, kind: TimerKind) {
        match kind {
            TimerKind::ArmOutsideListener { generation } => {
                if self.arming.is_current(generation) && self.phase.is_open() {
                    let outside = ListenerKind::OutsidePointer(page.outside_pointer_kind());
                    self.subscriptions.attach(&mut page.listeners, self.root, outside);
                }
            }
            TimerKind::SearchDebounce { generation } => {
                let entries = self.entry_nodes();
                if let Some(search) = &self.search {
                    search.apply(&mut page.dom, generation, &entries);
                }
            }
            TimerKind::TransitionEnd { generation } => {
                if !self.transition.is_current(generation) {
                    return;
                }
                match self.phase {
                    Phase::Opening => self.finish_show(page),
                    Phase::Closing => self.finish_hide(page),
                    Phase::Closed | Phase::Open => {}
                }
            }
        }
    }

    fn reset(&mut self, page: &mut Page) {
        self.cursor.reset();
        self.fill(page);
        // Rebuilt entries come back visible; an open filter still applies.
        let entries = self.entry_nodes();
        if let Some(search) = &self.search {
            search.refilter(&mut page.dom, &entries);
        }
        tracing::debug!(options = self.options.len(), "custom select reset");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
