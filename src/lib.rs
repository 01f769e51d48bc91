//! # custom-select
//!
//! A styleable dropdown that replaces native `<select>` elements, built over
//! a headless document model.
//!
//! Binding a widget to a `<select>` hides the native element and builds a
//! block-named structure after it: a value display button and a dropdown of
//! option buttons, optionally with a filter input. Selections are written
//! back to the native element and reported as [`Change`](event::Change)
//! messages.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: Slotmap-backed DOM arena with form helpers and markup serialization
//! - **[`css`]**: Selector tokenizer, parser and matcher with jQuery-style pseudo-classes
//! - **[`layout`]**: Taffy-powered column layout, scroll containers and hit testing
//! - **[`event`]**: Input events, key bindings, messages, window listeners
//! - **[`timer`]**: One-shot timers on a virtual clock
//! - **[`page`]**: Viewport, focus and per-page shared state
//! - **[`widget`]**: Widget trait and scroll state
//! - **[`widgets`]**: The custom select widget
//! - **[`document`]**: Widget registry and input routing
//! - **[`runtime`]**: Async driver over tokio
//! - **[`testing`]**: Headless pilot and snapshot helpers
//!
//! ## Example
//!
//! ```ignore
//! use custom_select::prelude::*;
//!
//! let mut doc = Document::new(80, 24);
//! let body = doc.body();
//! let select = doc.page.dom.build_select(body, "color", ["Red", "Green"].map(NativeOption::new));
//! let id = doc.custom_select(select, SelectConfig::new().search(true))?;
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod css;
pub mod dom;
pub mod layout;

// Events and time
pub mod event;
pub mod timer;

// Widget system
pub mod page;
pub mod widget;
pub mod widgets;

// Document
pub mod document;
pub mod runtime;

// Headless testing
pub mod testing;

pub use document::Document;
pub use error::{Error, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::document::Document;
    pub use crate::dom::{Dom, NativeOption, NodeData, NodeId};
    pub use crate::error::{Error, Result};
    pub use crate::event::{Change, InputEvent, Key, KeyEvent, PointerEvent, PointerKind, Toggled};
    pub use crate::page::Page;
    pub use crate::widget::{Widget, WidgetId};
    pub use crate::widgets::select::{Phase, SelectConfig, SelectWidget};
}
