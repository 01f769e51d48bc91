//! Selector AST: Selector, CompoundSelector, SelectorComponent, PseudoClass.

use std::fmt;

/// jQuery-style pseudo-classes understood by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// The node and all its ancestors are displayed.
    Visible,
    /// The node or one of its ancestors is hidden.
    Hidden,
    /// The node is disabled.
    Disabled,
    /// The node is not disabled.
    Enabled,
    /// An `<option>` marked selected.
    Selected,
    /// The node holds document focus.
    Focus,
}

impl PseudoClass {
    /// Look up a pseudo-class by name (without the leading `:`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "disabled" => Some(Self::Disabled),
            "enabled" => Some(Self::Enabled),
            "selected" => Some(Self::Selected),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    /// The name as written in a selector.
    pub fn name(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::Selected => "selected",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

/// A single simple selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Type selector: matches the element tag (e.g. `option`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// Attribute selector: `[name]` or `[name="value"]`.
    Attribute { name: String, value: Option<String> },
    /// Pseudo-class: `:visible`, `:focus`, etc.
    PseudoClass(PseudoClass),
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// A single compound selector (sequence of components without combinators).
///
/// For example, `button.custom-select__option:visible` is one
/// `CompoundSelector` with three components.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component to this compound selector.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }

    /// Returns `true` if this selector is the universal selector `*` alone.
    pub fn is_universal(&self) -> bool {
        self.components.len() == 1 && matches!(self.components[0], SelectorComponent::Universal)
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// A compound selector (one or more simple selectors).
    Compound(CompoundSelector),
    /// A combinator between compound selectors.
    Combinator(Combinator),
}

/// A full selector: chain of compound selectors joined by combinators.
///
/// `select > option:selected` has parts
/// `[Compound(select), Combinator(Child), Compound(option:selected)]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    /// Alternating compound selectors and combinators.
    /// Always starts and ends with a `SelectorPart::Compound`.
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rightmost compound, which must match the subject node.
    pub fn subject(&self) -> Option<&CompoundSelector> {
        match self.parts.last() {
            Some(SelectorPart::Compound(compound)) => Some(compound),
            _ => None,
        }
    }
}

/// A comma-separated group of selectors; a node matches if any member does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}
