//! Native form controls: `<select>` and `<option>` helpers.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// Description of one native `<option>`, used to build select elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeOption {
    pub text: String,
    pub value: Option<String>,
    pub class: Option<String>,
    pub disabled: bool,
    pub selected: bool,
}

impl NativeOption {
    /// An option labelled `text`, with no explicit value.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// Set the `value` attribute (builder).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the class attribute (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the disabled flag (builder).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark the option selected in markup (builder).
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn into_node(self) -> NodeData {
        let mut data = NodeData::new("option")
            .with_text(self.text)
            .disabled(self.disabled)
            .selected(self.selected);
        if let Some(value) = self.value {
            data = data.with_attr("value", value);
        }
        if let Some(class) = self.class {
            data.add_class_list(&class);
        }
        data
    }
}

impl Dom {
    /// Append a `<select name=..>` with the given options under `parent`.
    pub fn build_select(
        &mut self,
        parent: NodeId,
        name: &str,
        options: impl IntoIterator<Item = NativeOption>,
    ) -> NodeId {
        let select = self.insert_child(
            parent,
            NodeData::new("select").with_attr("name", name).focusable(true),
        );
        for option in options {
            self.append_option(select, option);
        }
        select
    }

    /// Append one `<option>` to `select`.
    pub fn append_option(&mut self, select: NodeId, option: NativeOption) -> NodeId {
        self.insert_child(select, option.into_node())
    }

    /// All `<option>` descendants of `select`, in document order.
    pub fn native_options(&self, select: NodeId) -> Vec<NodeId> {
        self.walk_depth_first(select)
            .into_iter()
            .skip(1)
            .filter(|&node| self.get(node).is_some_and(|data| data.tag.eq_ignore_ascii_case("option")))
            .collect()
    }

    /// The option's label: its text content, trimmed.
    pub fn option_text(&self, option: NodeId) -> String {
        self.text_content(option).trim().to_string()
    }

    /// The option's submitted value: the `value` attribute, or its label.
    pub fn option_value(&self, option: NodeId) -> String {
        match self.get(option).and_then(|data| data.attr("value")) {
            Some(value) => value.to_string(),
            None => self.option_text(option),
        }
    }

    /// The first option of `select` explicitly marked selected.
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        self.native_options(select)
            .into_iter()
            .find(|&option| self.get(option).is_some_and(|data| data.selected))
    }

    /// Mark `option` selected and every other option of `select` unselected.
    pub fn set_selected(&mut self, select: NodeId, option: NodeId) {
        for candidate in self.native_options(select) {
            self.update(candidate, |data| data.selected = candidate == option);
        }
    }

    /// The submitted value of `select`, if any option is selected.
    pub fn select_value(&self, select: NodeId) -> Option<String> {
        self.selected_option(select).map(|option| self.option_value(option))
    }

    /// Concatenated text of `node` and its descendants, like jQuery's `text()`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.walk_depth_first(node)
            .into_iter()
            .filter_map(|id| self.get(id))
            .map(|data| data.text.as_str())
            .collect()
    }
}
