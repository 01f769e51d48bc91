//! Built-in widgets.

pub mod select;

pub use select::{SelectConfig, SelectWidget};
