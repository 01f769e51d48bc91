//! Filter input for the dropdown.
//!
//! Edits schedule a debounced filter pass; each edit bumps a generation so
//! only the most recent pass applies. Clearing the query shows every entry
//! at once.

use std::time::Duration;

use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::page::Page;
use crate::timer::{Generation, TimerKind};

/// Whether an entry labelled `label` survives the filter `query`.
///
/// Case-insensitive substring match on the trimmed label and query.
pub fn matches(label: &str, query: &str) -> bool {
    label
        .trim()
        .to_lowercase()
        .contains(&query.trim().to_lowercase())
}

/// The filter input and the scrollable wrap holding the entries.
#[derive(Debug)]
pub struct SearchBox {
    input: NodeId,
    wrap: NodeId,
    generation: Generation,
}

impl SearchBox {
    /// Build `input.{block}__input` and `div.{block}__option-wrap` inside
    /// `dropdown`, in that order.
    pub fn mount(dom: &mut Dom, dropdown: NodeId, block: &str, placeholder: Option<&str>) -> Self {
        let mut input = NodeData::new("input")
            .with_class(format!("{block}__input"))
            .focusable(true);
        if let Some(text) = placeholder {
            input = input.with_attr("placeholder", text);
        }
        let input = dom.insert_child(dropdown, input);
        let wrap = dom.insert_child(dropdown, NodeData::new("div").with_class(format!("{block}__option-wrap")));
        Self { input, wrap, generation: Generation::default() }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Scroll container of the entries.
    pub fn wrap(&self) -> NodeId {
        self.wrap
    }

    /// Current trimmed query.
    pub fn query(&self, dom: &Dom) -> String {
        dom.get(self.input)
            .map(|data| data.value.trim().to_string())
            .unwrap_or_default()
    }

    /// Scroll the entries back to the top.
    pub fn reset_scroll(&self, dom: &mut Dom) {
        dom.update(self.wrap, |data| data.scroll_top = 0);
    }

    /// React to an edit: schedule a filter pass, or show everything now when
    /// the query is empty.
    pub fn on_edit(&mut self, page: &mut Page, owner: NodeId, debounce: Duration, entries: &[NodeId]) {
        let generation = self.generation.bump();
        if self.query(&page.dom).is_empty() {
            show_all(&mut page.dom, entries);
        } else {
            page.timers
                .schedule(owner, debounce, TimerKind::SearchDebounce { generation });
        }
    }

    /// Run a scheduled filter pass. Stale passes do nothing and return `false`.
    pub fn apply(&self, dom: &mut Dom, generation: Generation, entries: &[NodeId]) -> bool {
        if !self.generation.is_current(generation) {
            tracing::trace!("stale search pass skipped");
            return false;
        }
        self.refilter(dom, entries);
        true
    }

    /// Apply the current query to `entries` right away.
    pub fn refilter(&self, dom: &mut Dom, entries: &[NodeId]) {
        let query = self.query(dom);
        for &entry in entries {
            let shown = matches(&dom.text_content(entry), &query);
            dom.update(entry, |data| data.visible = shown);
        }
    }

    /// Empty and blur the input, show every entry and scroll to the top.
    pub fn clear(&mut self, page: &mut Page, entries: &[NodeId]) {
        self.generation.bump();
        page.dom.update(self.input, |data| data.value.clear());
        page.blur(self.input);
        show_all(&mut page.dom, entries);
        self.reset_scroll(&mut page.dom);
    }
}

fn show_all(dom: &mut Dom, entries: &[NodeId]) {
    for &entry in entries {
        dom.update(entry, |data| data.visible = true);
    }
}
