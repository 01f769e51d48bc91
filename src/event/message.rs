//! Message trait, envelope, and the messages widgets emit.
//!
//! The [`Message`] trait is object-safe and supports downcasting via `Any`.
//! [`Envelope`] wraps a boxed message with routing metadata (sender, target).

use std::any::Any;

use crate::dom::node::NodeId;

// ---------------------------------------------------------------------------
// Message trait
// ---------------------------------------------------------------------------

/// Object-safe message trait.
///
/// All messages must implement `as_any` for downcasting and `message_name`
/// for debug/logging purposes.
pub trait Message: Send + 'static {
    /// Upcast to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable name for this message type.
    fn message_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wraps a boxed message with routing metadata.
pub struct Envelope {
    /// The message payload.
    pub message: Box<dyn Message>,
    /// The node that sent this message.
    pub sender: NodeId,
    /// If `Some`, the message is addressed to a specific node.
    pub target: Option<NodeId>,
}

impl Envelope {
    /// Create a new envelope from the sender.
    pub fn new(message: impl Message, sender: NodeId) -> Self {
        Self { message: Box::new(message), sender, target: None }
    }

    /// Create a new envelope addressed to a specific node.
    pub fn targeted(message: impl Message, sender: NodeId, target: NodeId) -> Self {
        Self { message: Box::new(message), sender, target: Some(target) }
    }

    /// Attempt to downcast the message to a concrete type.
    pub fn downcast_ref<T: Message + 'static>(&self) -> Option<&T> {
        self.message.as_any().downcast_ref::<T>()
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Message + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("message_name", &self.message.message_name())
            .field("sender", &self.sender)
            .field("target", &self.target)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A user-driven selection changed a native `<select>`.
///
/// Dispatched on the native element, so the envelope target is `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The native select element.
    pub select: NodeId,
    /// Submitted value of the newly selected option.
    pub value: String,
    /// Trimmed label of the newly selected option.
    pub label: String,
}

impl Message for Change {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Change"
    }
}

/// A dropdown finished opening or closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// The widget's root element.
    pub root: NodeId,
    pub open: bool,
}

impl Message for Toggled {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        if self.open {
            "Shown"
        } else {
            "Hidden"
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
