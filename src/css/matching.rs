//! Selector matching against the DOM.
//!
//! Selectors are matched right to left: the subject compound must match the
//! node itself, then each combinator walks up the tree looking for the next
//! compound to the left.

use crate::css::model::*;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;

/// Runtime state consulted by state-dependent pseudo-classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchContext {
    /// The node that currently holds document focus.
    pub focused: Option<NodeId>,
}

impl MatchContext {
    /// Context with the given focused node.
    pub fn with_focus(focused: Option<NodeId>) -> Self {
        Self { focused }
    }
}

/// Whether any selector of `list` matches `node_id`.
pub fn matches_list(list: &SelectorList, node_id: NodeId, dom: &Dom, ctx: &MatchContext) -> bool {
    list.selectors
        .iter()
        .any(|selector| matches_selector(selector, node_id, dom, ctx))
}

/// Check whether a full selector matches a given node.
pub fn matches_selector(selector: &Selector, node_id: NodeId, dom: &Dom, ctx: &MatchContext) -> bool {
    let parts = &selector.parts;
    let Some(subject) = selector.subject() else {
        return false;
    };
    if !matches_compound(subject, node_id, dom, ctx) {
        return false;
    }

    let mut part_idx = parts.len() - 1;
    let mut current_node = node_id;

    while part_idx > 0 {
        // Combinator followed (leftward) by a compound.
        let combinator = match &parts[part_idx - 1] {
            SelectorPart::Combinator(c) => *c,
            SelectorPart::Compound(_) => return false,
        };
        if part_idx < 2 {
            return false;
        }
        let compound = match &parts[part_idx - 2] {
            SelectorPart::Compound(c) => c,
            SelectorPart::Combinator(_) => return false,
        };
        part_idx -= 2;

        match combinator {
            Combinator::Child => {
                let Some(parent_id) = dom.parent(current_node) else {
                    return false;
                };
                if !matches_compound(compound, parent_id, dom, ctx) {
                    return false;
                }
                current_node = parent_id;
            }
            Combinator::Descendant => {
                let found = dom
                    .ancestors(current_node)
                    .into_iter()
                    .find(|&ancestor| matches_compound(compound, ancestor, dom, ctx));
                match found {
                    Some(ancestor) => current_node = ancestor,
                    None => return false,
                }
            }
        }
    }

    true
}

/// Check whether a compound selector matches a single node.
fn matches_compound(compound: &CompoundSelector, node_id: NodeId, dom: &Dom, ctx: &MatchContext) -> bool {
    let Some(node) = dom.get(node_id) else {
        return false;
    };
    compound.components.iter().all(|component| match component {
        SelectorComponent::Type(name) => node.tag.eq_ignore_ascii_case(name),
        SelectorComponent::Class(name) => node.has_class(name),
        SelectorComponent::Id(name) => node.id.as_deref() == Some(name.as_str()),
        SelectorComponent::Universal => true,
        SelectorComponent::Attribute { name, value } => match attribute_value(node, name) {
            Some(actual) => value.as_deref().is_none_or(|expected| actual == expected),
            None => false,
        },
        SelectorComponent::PseudoClass(pseudo) => matches_pseudo(*pseudo, node_id, node, dom, ctx),
    })
}

fn matches_pseudo(pseudo: PseudoClass, node_id: NodeId, node: &NodeData, dom: &Dom, ctx: &MatchContext) -> bool {
    match pseudo {
        PseudoClass::Visible => dom.is_rendered(node_id),
        PseudoClass::Hidden => !dom.is_rendered(node_id),
        PseudoClass::Disabled => node.disabled,
        PseudoClass::Enabled => !node.disabled,
        PseudoClass::Selected => node.selected,
        PseudoClass::Focus => ctx.focused == Some(node_id),
    }
}

/// Attribute lookup for `[name=value]`, including the attributes the DOM
/// stores as dedicated fields.
fn attribute_value(node: &NodeData, name: &str) -> Option<String> {
    match name {
        "id" => node.id.clone(),
        "class" => node.class_attr(),
        "disabled" => node.disabled.then(String::new),
        "selected" => node.selected.then(String::new),
        _ => node.attr(name).map(str::to_owned),
    }
}
