//! DOM arena: slotmap-backed element tree with selector queries, native form
//! helpers and HTML serialization.

pub mod node;
pub mod tree;
pub mod query;
pub mod form;
pub mod markup;

pub use form::NativeOption;
pub use node::{NodeData, NodeId, NodeStyle};
pub use tree::Dom;
