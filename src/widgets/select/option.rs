//! Snapshot of the native option list.

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// One choice, as read from a native `<option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Trimmed label.
    pub text: String,
    /// The option's class list, copied onto its rendered entry.
    pub class: Option<String>,
    pub disabled: bool,
    /// Submitted value: the `value` attribute, or the label.
    pub value: String,
    /// The originating native option.
    pub node: NodeId,
}

impl SelectOption {
    /// Read `option` from the DOM.
    pub fn read(dom: &Dom, option: NodeId) -> Self {
        let data = dom.get(option);
        Self {
            text: dom.option_text(option),
            class: data.and_then(|data| data.class_attr()),
            disabled: data.is_some_and(|data| data.disabled),
            value: dom.option_value(option),
            node: option,
        }
    }

    /// Every option of `select`, in document order.
    pub fn snapshot(dom: &Dom, select: NodeId) -> Vec<Self> {
        dom.native_options(select)
            .into_iter()
            .map(|option| Self::read(dom, option))
            .collect()
    }
}
