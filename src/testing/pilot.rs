//! Pilot: programmatic interaction with a headless document.
//!
//! The `Pilot` wraps a [`Document`] and provides methods to simulate user
//! input (clicks, taps, key presses, typing, resize, scroll), move the
//! virtual clock, and inspect widgets and emitted messages.

use std::time::Duration;

use crate::document::Document;
use crate::dom::node::NodeId;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent};
use crate::event::message::Change;
use crate::widget::traits::WidgetId;
use crate::widgets::select::SelectWidget;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless document driver for testing.
///
/// # Examples
///
/// ```ignore
/// use custom_select::testing::Pilot;
/// use custom_select::event::Key;
///
/// let mut pilot = Pilot::new(80, 24);
/// pilot.press_key(Key::Tab);
/// pilot.advance_ms(100);
/// ```
pub struct Pilot {
    document: Document,
}

impl Pilot {
    /// Create an empty document with the given viewport size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { document: Document::new(width, height) }
    }

    /// Drive an existing document.
    pub fn with_document(document: Document) -> Self {
        Self { document }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a user click on `node`.
    pub fn click(&mut self, node: NodeId) {
        self.document.handle_input(InputEvent::Pointer(PointerEvent::click(node)));
    }

    /// Simulate a tap on `node`: touchstart, then the click that follows it.
    pub fn tap(&mut self, node: NodeId) {
        self.document.handle_input(InputEvent::Pointer(PointerEvent::touch(node)));
        self.click(node);
    }

    /// Trigger a click from code rather than from the user.
    pub fn trigger_click(&mut self, node: NodeId) {
        self.document
            .handle_input(InputEvent::Pointer(PointerEvent::synthetic(node)));
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.document
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Simulate a window resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.document.handle_input(InputEvent::Resize { width, height });
    }

    /// Simulate scrolling the window to `y`.
    pub fn scroll_to(&mut self, y: i32) {
        self.document.handle_input(InputEvent::Scroll { y });
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Move the virtual clock forward by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.document.advance(Duration::from_millis(ms));
    }

    /// Fire every pending timer.
    pub fn settle(&mut self) {
        self.document.flush();
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying document immutably.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Borrow the underlying document mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Take back the document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Borrow a bound select widget.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live [`SelectWidget`].
    pub fn select(&self, id: WidgetId) -> &SelectWidget {
        match self.document.widget::<SelectWidget>(id) {
            Some(widget) => widget,
            None => panic!("no select widget {id:?}"),
        }
    }

    /// Labels of the dropdown entries the filter leaves visible.
    pub fn dropdown_labels(&self, id: WidgetId) -> Vec<String> {
        self.select(id).visible_entry_labels(&self.document.page)
    }

    /// Drain the change notifications emitted so far.
    pub fn changes(&mut self) -> Vec<Change> {
        self.document.take_changes()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NativeOption;
    use crate::widgets::select::SelectConfig;

    fn pilot_with_select(config: SelectConfig) -> (Pilot, WidgetId) {
        let mut pilot = Pilot::new(80, 24);
        let doc = pilot.document_mut();
        let body = doc.body();
        let select = doc
            .page
            .dom
            .build_select(body, "color", ["Red", "Green", "Blue"].map(NativeOption::new));
        let id = doc.custom_select(select, config).unwrap();
        (pilot, id)
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_creates_empty_document() {
        let pilot = Pilot::new(120, 40);
        assert_eq!(pilot.document().widget_count(), 0);
        assert_eq!(pilot.document().page.viewport().width, 120);
    }

    // ── Pointer ──────────────────────────────────────────────────────

    #[test]
    fn click_and_advance_open_the_dropdown() {
        let (mut pilot, id) = pilot_with_select(SelectConfig::new());
        let value = pilot.select(id).value_display();
        pilot.click(value);
        assert!(pilot.select(id).is_open());
        pilot.advance_ms(100);
        assert_eq!(pilot.dropdown_labels(id), vec!["Green", "Blue"]);
    }

    #[test]
    fn tap_on_touch_page_closes_from_outside() {
        let mut pilot = Pilot::with_document(Document::with_page(crate::page::Page::new(80, 24).with_touch(true)));
        let doc = pilot.document_mut();
        let body = doc.body();
        let select = doc
            .page
            .dom
            .build_select(body, "color", ["Red", "Green"].map(NativeOption::new));
        let outside = doc
            .page
            .dom
            .insert_child(body, crate::dom::NodeData::new("button").with_text("Elsewhere"));
        let id = doc.custom_select(select, SelectConfig::new()).unwrap();

        let value = pilot.select(id).value_display();
        pilot.tap(value);
        pilot.settle();
        assert!(pilot.select(id).is_open());

        pilot.tap(outside);
        pilot.settle();
        assert!(!pilot.select(id).is_open());
    }

    #[test]
    fn trigger_click_selects_without_change() {
        let (mut pilot, id) = pilot_with_select(SelectConfig::new().with_transition(Duration::ZERO));
        let value = pilot.select(id).value_display();
        pilot.click(value);
        let blue = pilot.select(id).entry_nodes()[1];
        pilot.trigger_click(blue);
        pilot.settle();

        assert_eq!(pilot.select(id).selected_option().map(|o| o.text.as_str()), Some("Blue"));
        assert!(pilot.changes().is_empty());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn type_text_fills_search_input() {
        let (mut pilot, id) = pilot_with_select(SelectConfig::new().search(true));
        let value = pilot.select(id).value_display();
        pilot.click(value);
        pilot.advance_ms(100);
        pilot.type_text("bl");
        assert_eq!(pilot.select(id).search_query(&pilot.document().page), "bl");
        pilot.advance_ms(300);
        assert_eq!(pilot.dropdown_labels(id), vec!["Blue"]);
    }

    #[test]
    fn escape_closes_and_refocuses_value() {
        let (mut pilot, id) = pilot_with_select(SelectConfig::new().with_transition(Duration::ZERO));
        let value = pilot.select(id).value_display();
        pilot.click(value);
        pilot.press_key(Key::Escape);
        pilot.settle();
        assert!(!pilot.select(id).is_open());
        assert!(pilot.document().page.is_focused(value));
    }

    // ── Viewport ─────────────────────────────────────────────────────

    #[test]
    fn resize_and_scroll_reach_the_page() {
        let mut pilot = Pilot::new(80, 24);
        pilot.resize(100, 10);
        pilot.scroll_to(5);
        let viewport = pilot.document().page.viewport();
        assert_eq!((viewport.width, viewport.height), (100, 10));
        // Nothing to scroll in an empty document.
        assert_eq!(viewport.scroll_y, 0);
    }
}
