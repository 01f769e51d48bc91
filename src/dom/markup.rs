//! Deterministic HTML serialization of DOM subtrees.
//!
//! Attribute order is fixed: `id`, `class`, plain attributes sorted by
//! name, then the boolean flags `disabled`, `selected` and `hidden`.

use std::fmt::Write;

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["input", "br", "hr", "img"];

impl Dom {
    /// Serialize `node` and its subtree. Unknown nodes serialize to `""`.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node);
        out
    }

    /// Serialize the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_node(&mut out, child);
        }
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        let Some(data) = self.get(node) else {
            return;
        };
        out.push('<');
        out.push_str(&data.tag);
        write_attributes(out, data);
        out.push('>');

        if VOID_ELEMENTS.contains(&data.tag.as_str()) {
            return;
        }

        out.push_str(&escape(&data.text, false));
        for &child in self.children(node) {
            self.write_node(out, child);
        }
        let _ = write!(out, "</{}>", data.tag);
    }
}

fn write_attributes(out: &mut String, data: &NodeData) {
    if let Some(id) = &data.id {
        let _ = write!(out, " id=\"{}\"", escape(id, true));
    }
    if let Some(class) = data.class_attr() {
        let _ = write!(out, " class=\"{}\"", escape(&class, true));
    }
    for (name, value) in &data.attributes {
        let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
    }
    if data.tag == "input" && !data.value.is_empty() {
        let _ = write!(out, " value=\"{}\"", escape(&data.value, true));
    }
    if data.disabled {
        out.push_str(" disabled");
    }
    if data.selected {
        out.push_str(" selected");
    }
    if !data.visible {
        out.push_str(" hidden");
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
