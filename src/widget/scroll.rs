//! Vertical scroll state for scrollable containers.
//!
//! `ScrollState` tracks the scroll position of one container, clamping it to
//! `[0, max_scroll]` where `max_scroll = content_height - viewport_height`
//! (clamped to zero). The DOM keeps the committed position in
//! `NodeData::scroll_top`; this type does the arithmetic.

/// Tracks the vertical scroll position for a scrollable container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset (always >= 0, clamped to max).
    pub offset: i32,
    /// Total height of the scrollable content.
    pub content_height: i32,
    /// Height of the visible part of the container.
    pub viewport_height: i32,
}

impl ScrollState {
    /// Create a new scroll state with zero offset.
    pub fn new(content_height: i32, viewport_height: i32) -> Self {
        Self { offset: 0, content_height, viewport_height }
    }

    /// Create a scroll state at `offset`, clamped.
    pub fn at(content_height: i32, viewport_height: i32, offset: i32) -> Self {
        let mut state = Self::new(content_height, viewport_height);
        state.scroll_to(offset);
        state
    }

    /// The maximum scroll offset: `max(0, content_height - viewport_height)`.
    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    /// Scroll to an absolute position, clamping to valid range.
    pub fn scroll_to(&mut self, y: i32) {
        self.offset = y.clamp(0, self.max_scroll());
    }

    /// Scroll so the band `[top, top + height)` sits in the vertical center
    /// of the viewport. `top` is measured from the content origin.
    pub fn center_on(&mut self, top: i32, height: i32) {
        self.scroll_to(top + height / 2 - self.viewport_height / 2);
    }
}
