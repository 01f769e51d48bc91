//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`NavAction`]s.
//! `with_defaults()` installs the dropdown navigation keys.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// NavAction
// ---------------------------------------------------------------------------

/// Dropdown navigation action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    /// Focus the next visible, enabled entry.
    Next,
    /// Focus the previous visible, enabled entry.
    Previous,
    /// Activate the focused entry or value display.
    Activate,
    /// Close the dropdown.
    Dismiss,
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> NavAction.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), NavAction>,
}

impl KeyBindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard dropdown bindings.
    ///
    /// Defaults:
    /// - `Down` -> Next
    /// - `Up` -> Previous
    /// - `Enter`, `Space` -> Activate
    /// - `Escape` -> Dismiss
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Down, Modifiers::NONE, NavAction::Next);
        registry.bind(Key::Up, Modifiers::NONE, NavAction::Previous);
        registry.bind(Key::Enter, Modifiers::NONE, NavAction::Activate);
        registry.bind(Key::Char(' '), Modifiers::NONE, NavAction::Activate);
        registry.bind(Key::Escape, Modifiers::NONE, NavAction::Dismiss);
        registry
    }

    /// Register a key binding.
    ///
    /// If a binding already exists for this key+modifier combination, it is replaced.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: NavAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a key binding, returning the removed action.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<NavAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a key event (exact key + modifiers match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
