//! Snapshot rendering helpers.
//!
//! Functions for turning a page into plain-text strings suitable for
//! snapshot testing: the serialized markup of a subtree, or a character grid
//! of what the viewport currently shows.

use crate::dom::node::NodeId;
use crate::page::Page;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialized markup of `node` and its subtree.
pub fn markup(page: &Page, node: NodeId) -> String {
    page.dom.outer_html(node)
}

/// Serialized markup with one element per line, indented by depth.
///
/// Easier to review in snapshot diffs than a single long line.
pub fn pretty_markup(page: &Page, node: NodeId) -> String {
    let mut lines = Vec::new();
    write_pretty(page, node, 0, &mut lines);
    lines.join("\n")
}

fn write_pretty(page: &Page, node: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(data) = page.dom.get(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let children = page.dom.children(node);
    if children.is_empty() {
        lines.push(format!("{indent}{}", page.dom.outer_html(node)));
        return;
    }
    // Opening tag including the element's own text, children below.
    let open = page.dom.outer_html(node);
    let head_len = open.find('>').map_or(open.len(), |i| i + 1);
    lines.push(format!("{indent}{}{}", &open[..head_len], data.text));
    for &child in children {
        write_pretty(page, child, depth + 1, lines);
    }
    lines.push(format!("{indent}</{}>", data.tag));
}

/// Render the visible viewport to a plain text string.
///
/// Builds a `width` x `height` grid of spaces, then writes each rendered
/// node's own text (or an input's value, falling back to its placeholder)
/// at its position relative to the window scroll. Each row is right-trimmed
/// of spaces, and rows are joined with `'\n'`.
pub fn screen_to_string(page: &Page) -> String {
    let viewport = page.viewport();
    let width = i32::from(viewport.width);
    let height = i32::from(viewport.height);
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let mut grid: Vec<Vec<char>> = vec![vec![' '; width as usize]; height as usize];

    for (node, region) in page.rendered_regions() {
        let Some(data) = page.dom.get(node) else {
            continue;
        };
        let text = if data.tag == "input" {
            if data.value.is_empty() {
                data.attr("placeholder").unwrap_or_default()
            } else {
                data.value.as_str()
            }
        } else {
            data.text.trim()
        };
        if text.is_empty() || region.height <= 0 {
            continue;
        }

        let y = region.y - viewport.scroll_y;
        if y < 0 || y >= height {
            continue;
        }
        let row = &mut grid[y as usize];
        for (i, ch) in text.chars().enumerate() {
            let x = region.x + i as i32;
            if x < 0 || x >= width.min(region.right()) {
                continue;
            }
            row[x as usize] = ch;
        }
    }

    let lines: Vec<String> = grid
        .into_iter()
        .map(|row| {
            let s: String = row.into_iter().collect();
            s.trim_end().to_owned()
        })
        .collect();

    // Trailing blank rows add nothing to a snapshot.
    let last = lines.iter().rposition(|line| !line.is_empty()).map_or(0, |i| i + 1);
    lines[..last].join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
