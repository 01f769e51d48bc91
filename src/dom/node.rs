//! Node types: NodeId, NodeData, NodeStyle.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Layout hints for a node. Unset fields fall back to the page metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStyle {
    /// Fixed height in layout units.
    pub height: Option<f32>,
    /// Maximum height; content beyond it scrolls.
    pub max_height: Option<f32>,
}

/// Data associated with a single DOM element.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Element tag name (e.g. "div", "button", "option").
    pub tag: String,
    /// Optional unique id (CSS #id selector).
    pub id: Option<String>,
    /// CSS classes (for .class selector), in insertion order.
    pub classes: Vec<String>,
    /// Plain attributes other than `id`, `class` and `disabled`.
    pub attributes: BTreeMap<String, String>,
    /// Text content owned directly by this element.
    pub text: String,
    /// Live value of form inputs.
    pub value: String,
    /// Whether this node is displayed.
    pub visible: bool,
    /// Whether this node can receive focus.
    pub focusable: bool,
    /// Whether this node is disabled.
    pub disabled: bool,
    /// Selectedness of `<option>` elements.
    pub selected: bool,
    /// Vertical scroll offset of a scroll container.
    pub scroll_top: i32,
    /// Layout hints.
    pub style: NodeStyle,
}

impl NodeData {
    /// Create a new `NodeData` with the given tag and sensible defaults.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            visible: true,
            focusable: false,
            disabled: false,
            selected: false,
            scroll_top: 0,
            style: NodeStyle::default(),
        }
    }

    /// Set the CSS id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single CSS class (builder). Empty names are ignored.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_class(&class);
        self
    }

    /// Add multiple CSS classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            let class = class.into();
            self.add_class(&class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set whether this node can receive focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set whether this node is disabled (builder).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set whether this node is displayed (builder).
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the option selectedness (builder).
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set a fixed layout height (builder).
    pub fn with_height(mut self, height: f32) -> Self {
        self.style.height = Some(height);
        self
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a CSS class. No-op if already present or empty.
    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Add every whitespace-separated class in `list`, as jQuery's `addClass` does.
    pub fn add_class_list(&mut self, list: &str) {
        for class in list.split_whitespace() {
            self.add_class(class);
        }
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Remove every whitespace-separated class in `list`.
    pub fn remove_class_list(&mut self, list: &str) {
        for class in list.split_whitespace() {
            self.remove_class(class);
        }
    }

    /// Add or remove a class according to `on`.
    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Space-joined class attribute, `None` when there are no classes.
    pub fn class_attr(&self) -> Option<String> {
        if self.classes.is_empty() {
            None
        } else {
            Some(self.classes.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let data = NodeData::new("button");
        assert_eq!(data.tag, "button");
        assert!(data.id.is_none());
        assert!(data.classes.is_empty());
        assert!(data.attributes.is_empty());
        assert!(data.text.is_empty());
        assert!(data.visible);
        assert!(!data.focusable);
        assert!(!data.disabled);
        assert!(!data.selected);
        assert_eq!(data.scroll_top, 0);
    }

    #[test]
    fn builder_with_class_dedup() {
        let data = NodeData::new("div").with_class("primary").with_class("primary");
        assert_eq!(data.classes, vec!["primary"]);
    }

    #[test]
    fn builder_ignores_empty_class() {
        let data = NodeData::new("div").with_class("");
        assert!(data.classes.is_empty());
    }

    #[test]
    fn builder_with_classes() {
        let data = NodeData::new("div").with_class("a").with_classes(["a", "b", "c"]);
        assert_eq!(data.classes, vec!["a", "b", "c"]);
    }

    #[test]
    fn attributes() {
        let data = NodeData::new("option").with_attr("value", "r");
        assert_eq!(data.attr("value"), Some("r"));
        assert_eq!(data.attr("missing"), None);
    }

    #[test]
    fn class_lists() {
        let mut data = NodeData::new("button");
        data.add_class_list("red  swatch");
        assert_eq!(data.classes, vec!["red", "swatch"]);
        data.remove_class_list("swatch red");
        assert!(data.classes.is_empty());
    }

    #[test]
    fn set_class_adds_and_removes() {
        let mut data = NodeData::new("div");
        data.set_class("open", true);
        assert!(data.has_class("open"));
        data.set_class("open", false);
        assert!(!data.has_class("open"));
    }

    #[test]
    fn class_attr_joins() {
        let data = NodeData::new("div").with_classes(["a", "b"]);
        assert_eq!(data.class_attr().as_deref(), Some("a b"));
        assert_eq!(NodeData::new("div").class_attr(), None);
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
