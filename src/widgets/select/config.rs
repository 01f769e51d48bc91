//! Select widget configuration.
//!
//! [`SelectConfig`] is built with chained setters or read from a loose JSON
//! object. JSON fields are parsed one at a time: a malformed field keeps its
//! default and logs a warning, it never rejects the whole configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dom::node::NodeId;
use crate::event::binding::KeyBindingRegistry;

/// Hook run after an open or close transition, with the widget root.
pub type Callback = Arc<dyn Fn(NodeId) + Send + Sync>;

const DEFAULT_BLOCK: &str = "custom-select";
const DEFAULT_TRANSITION: Duration = Duration::from_millis(100);
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Named transition speeds, in milliseconds.
const SPEED_FAST: u64 = 200;
const SPEED_SLOW: u64 = 600;
const SPEED_DEFAULT: u64 = 400;

// ---------------------------------------------------------------------------
// SelectConfig
// ---------------------------------------------------------------------------

/// Configuration for one select widget.
#[derive(Clone)]
pub struct SelectConfig {
    /// BEM block name used as the prefix of every generated class.
    pub block_name: String,
    /// Extra class list for the root element.
    pub modifier_class: Option<String>,
    /// Keep the current selection listed in the dropdown, with a marker.
    pub include_value_in_dropdown: bool,
    /// Shown in the value display while nothing is selected.
    pub placeholder_html: Option<String>,
    pub keyboard_enabled: bool,
    /// Add a filter input above the entries.
    pub search_enabled: bool,
    /// `placeholder` attribute of the filter input.
    pub search_placeholder: Option<String>,
    /// Delay between the last edit and filtering.
    pub search_debounce: Duration,
    /// Open/close transition length.
    pub transition_duration: Duration,
    pub on_show: Option<Callback>,
    pub on_hide: Option<Callback>,
    /// Keys driving dropdown navigation.
    pub bindings: KeyBindingRegistry,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            block_name: DEFAULT_BLOCK.to_string(),
            modifier_class: None,
            include_value_in_dropdown: false,
            placeholder_html: None,
            keyboard_enabled: true,
            search_enabled: false,
            search_placeholder: None,
            search_debounce: DEFAULT_DEBOUNCE,
            transition_duration: DEFAULT_TRANSITION,
            on_show: None,
            on_hide: None,
            bindings: KeyBindingRegistry::with_defaults(),
        }
    }
}

impl fmt::Debug for SelectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectConfig")
            .field("block_name", &self.block_name)
            .field("modifier_class", &self.modifier_class)
            .field("include_value_in_dropdown", &self.include_value_in_dropdown)
            .field("placeholder_html", &self.placeholder_html)
            .field("keyboard_enabled", &self.keyboard_enabled)
            .field("search_enabled", &self.search_enabled)
            .field("search_placeholder", &self.search_placeholder)
            .field("search_debounce", &self.search_debounce)
            .field("transition_duration", &self.transition_duration)
            .field("on_show", &self.on_show.is_some())
            .field("on_hide", &self.on_hide.is_some())
            .finish_non_exhaustive()
    }
}

impl SelectConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block name (builder).
    pub fn with_block_name(mut self, block: impl Into<String>) -> Self {
        self.block_name = block.into();
        self
    }

    /// Set the root modifier class (builder).
    pub fn with_modifier_class(mut self, class: impl Into<String>) -> Self {
        self.modifier_class = Some(class.into());
        self
    }

    /// Keep the selected option in the dropdown (builder).
    pub fn include_value_in_dropdown(mut self, include: bool) -> Self {
        self.include_value_in_dropdown = include;
        self
    }

    /// Set the placeholder shown before any selection (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_html = Some(placeholder.into());
        self
    }

    /// Enable or disable keyboard navigation (builder).
    pub fn keyboard(mut self, enabled: bool) -> Self {
        self.keyboard_enabled = enabled;
        self
    }

    /// Enable or disable the filter input (builder).
    pub fn search(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    /// Set the filter input's placeholder attribute (builder).
    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = Some(placeholder.into());
        self
    }

    /// Set the search debounce delay (builder).
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Set the transition length (builder).
    pub fn with_transition(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    /// Run `hook` after the dropdown finishes opening (builder).
    pub fn on_show(mut self, hook: impl Fn(NodeId) + Send + Sync + 'static) -> Self {
        self.on_show = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after the dropdown finishes closing (builder).
    pub fn on_hide(mut self, hook: impl Fn(NodeId) + Send + Sync + 'static) -> Self {
        self.on_hide = Some(Arc::new(hook));
        self
    }

    /// Replace the navigation key bindings (builder).
    pub fn with_bindings(mut self, bindings: KeyBindingRegistry) -> Self {
        self.bindings = bindings;
        self
    }

    /// The selector class for an element of this block, e.g. `__option`.
    pub fn element(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.block_name)
    }

    /// Read a configuration from a JSON value, merged over the defaults.
    ///
    /// Keys are camelCase (`blockName`, `searchEnabled`, ...); the short
    /// names of the jQuery plugin (`block`, `autocomplete`, ...) are
    /// accepted too. A non-object value yields the defaults.
    pub fn from_json(value: &Value) -> Self {
        let mut config = Self::default();
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!(kind = json_kind(value), "select configuration is not an object");
            }
            return config;
        };

        if let Some(block) = field::<String>(object, &["blockName", "block"]) {
            if block.trim().is_empty() {
                tracing::warn!("empty block name ignored");
            } else {
                config.block_name = block;
            }
        }
        if let Some(modifier) = field::<TextOrFalse>(object, &["modifierClass", "modifier"]) {
            config.modifier_class = modifier.into_option();
        }
        if let Some(include) = field::<bool>(object, &["includeValueInDropdown", "includeValue"]) {
            config.include_value_in_dropdown = include;
        }
        if let Some(placeholder) = field::<TextOrFalse>(object, &["placeholderHtml"]) {
            config.placeholder_html = placeholder.into_option();
        }
        if let Some(keyboard) = field::<bool>(object, &["keyboardEnabled", "keyboard"]) {
            config.keyboard_enabled = keyboard;
        }
        if let Some(search) = field::<bool>(object, &["searchEnabled", "autocomplete"]) {
            config.search_enabled = search;
        }
        if let Some(placeholder) = field::<TextOrFalse>(object, &["searchPlaceholder", "placeholder"]) {
            config.search_placeholder = placeholder.into_option();
        }
        if let Some(speed) = field::<Speed>(object, &["transitionDuration", "transition"]) {
            config.transition_duration = speed.duration();
        }
        if let Some(delay) = field::<Speed>(object, &["searchDebounce"]) {
            config.search_debounce = delay.duration();
        }
        config
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// A string, or `false` to switch the feature off.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrFalse {
    Text(String),
    Flag(bool),
}

impl TextOrFalse {
    fn into_option(self) -> Option<String> {
        match self {
            TextOrFalse::Text(text) if !text.is_empty() => Some(text),
            TextOrFalse::Text(_) | TextOrFalse::Flag(false) => None,
            TextOrFalse::Flag(true) => {
                tracing::warn!("`true` is not a class or placeholder, ignored");
                None
            }
        }
    }
}

/// A jQuery animation speed: milliseconds or a speed name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Speed {
    Millis(f64),
    Named(String),
}

impl Speed {
    fn duration(&self) -> Duration {
        let millis = match self {
            Speed::Millis(ms) => ms.max(0.0),
            Speed::Named(name) => match name.trim() {
                "fast" => SPEED_FAST as f64,
                "slow" => SPEED_SLOW as f64,
                other => other
                    .parse::<f64>()
                    .ok()
                    .filter(|ms| ms.is_finite() && *ms >= 0.0)
                    .unwrap_or(SPEED_DEFAULT as f64),
            },
        };
        Duration::from_micros((millis * 1000.0).round() as u64)
    }
}

/// Parse the first present key of `keys`. Malformed values log and yield
/// `None` so the caller keeps its default.
fn field<T: DeserializeOwned>(object: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| object.get(*key).map(|value| (*key, value)))?;
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(key, %err, "malformed select option, using default");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ===========================================================================
// Tests
// ===========================================================================
