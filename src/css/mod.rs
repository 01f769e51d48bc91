//! Selector engine: tokenizer, parser, matcher.

pub mod tokenizer;
pub mod model;
pub mod parser;
pub mod matching;

pub use matching::MatchContext;
pub use model::{PseudoClass, Selector, SelectorList};
pub use parser::{parse_selector_list, SelectorError};
