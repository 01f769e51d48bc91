//! Event dispatch: the message queue.
//!
//! [`EventDispatcher`] maintains a queue of [`Envelope`]s. Hosts drain it
//! after feeding input to learn what the widgets reported.

use std::collections::VecDeque;

use super::message::{Envelope, Message};

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Queue-based event dispatcher.
///
/// Messages are enqueued via `push` and drained via `drain`.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    queue: VecDeque<Envelope>,
}

impl EventDispatcher {
    /// Create a new, empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message envelope for later processing.
    pub fn push(&mut self, envelope: Envelope) {
        tracing::trace!(message = envelope.message.message_name(), "message queued");
        self.queue.push_back(envelope);
    }

    /// Drain all pending messages and return them as a `Vec`.
    ///
    /// The queue is empty after this call.
    pub fn drain(&mut self) -> Vec<Envelope> {
        self.queue.drain(..).collect()
    }

    /// Remove and return the pending messages of type `T`, keeping the rest
    /// queued in order.
    pub fn drain_of<T: Message + Clone>(&mut self) -> Vec<T> {
        let mut taken = Vec::new();
        self.queue.retain(|envelope| match envelope.downcast_ref::<T>() {
            Some(message) => {
                taken.push(message.clone());
                false
            }
            None => true,
        });
        taken
    }

    /// Number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

}

// ===========================================================================
// Tests
// ===========================================================================
