//! Crate error type.

use crate::css::SelectorError;
use crate::dom::node::NodeId;
use crate::widget::WidgetId;

/// Errors returned by document operations.
///
/// Widget behavior itself never fails; only binding a widget to a node and
/// parsing selectors can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("node {node:?} is a <{tag}>, expected a <select>")]
    NotASelect { node: NodeId, tag: String },

    #[error("node {0:?} has no parent to insert the widget after")]
    Detached(NodeId),

    #[error("widget {0:?} does not exist")]
    UnknownWidget(WidgetId),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

pub type Result<T> = std::result::Result<T, Error>;
