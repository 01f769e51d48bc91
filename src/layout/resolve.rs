//! Node -> taffy Style conversion.
//!
//! The document has no stylesheet, so every element gets the same block-like
//! treatment: a column flex container that never shrinks. Form controls are
//! one row tall unless a fixed height is set.

use taffy::prelude::*;

use crate::dom::node::NodeData;

/// Elements laid out as a single row of text.
const ROW_ELEMENTS: &[&str] = &["button", "input", "option", "select", "label", "span"];

/// Page-wide layout metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Height of one row of text, in layout units.
    pub row_height: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self { row_height: 1.0 }
    }
}

/// Resolve a node's taffy style.
///
/// - hidden nodes -> `Display::None`
/// - everything else -> `Display::Flex` with `FlexDirection::Column`
/// - `style.height` -> fixed height; row elements default to `row_height`
/// - `style.max_height` -> `max_size.height` plus vertical `Overflow::Scroll`
pub fn resolve_node_style(data: &NodeData, metrics: &LayoutMetrics) -> taffy::Style {
    let mut style = taffy::Style {
        display: if data.visible { Display::Flex } else { Display::None },
        flex_direction: FlexDirection::Column,
        flex_shrink: 0.0,
        ..taffy::Style::default()
    };

    let is_row = ROW_ELEMENTS.contains(&data.tag.to_ascii_lowercase().as_str());
    match data.style.height {
        Some(height) => style.size.height = Dimension::from_length(height),
        None if is_row => style.size.height = Dimension::from_length(metrics.row_height),
        None => {}
    }

    if let Some(max) = data.style.max_height {
        style.max_size.height = Dimension::from_length(max);
        style.overflow = taffy::geometry::Point {
            x: taffy::style::Overflow::Visible,
            y: taffy::style::Overflow::Scroll,
        };
    }

    style
}
