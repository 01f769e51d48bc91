//! Widget system: trait, ids, scrolling.

pub mod traits;
pub mod scroll;

pub use traits::{EventFlow, Widget, WidgetId};
pub use scroll::ScrollState;
