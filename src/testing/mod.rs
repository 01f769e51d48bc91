//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`Document`](crate::document::Document)
//! programmatically. Use [`screen_to_string`] and [`pretty_markup`] to
//! capture the page as plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{markup, pretty_markup, screen_to_string};
