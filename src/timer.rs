//! One-shot timers on a virtual clock.
//!
//! [`TimerQueue`] never reads the wall clock: the owner advances `now`
//! explicitly and pops due timers in `(due, order)` sequence. Timers are
//! never cancelled by their consumers; a [`Generation`] stamped into the
//! [`TimerKind`] lets the consumer recognise and ignore stale ones.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::dom::node::NodeId;

new_key_type! {
    /// Handle for a scheduled timer.
    pub struct TimerId;
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Monotonic counter answering "is this the most recent scheduled check".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Advance to a new generation and return it.
    pub fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }

    /// Whether `stamp` was issued by the latest `bump`.
    pub fn is_current(self, stamp: Generation) -> bool {
        self == stamp
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Attach the outside-pointer listener after the opening gesture.
    ArmOutsideListener { generation: Generation },
    /// Apply the search filter if the query is unchanged.
    SearchDebounce { generation: Generation },
    /// An open or close transition finished.
    TransitionEnd { generation: Generation },
}

/// A scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// Virtual time at which the timer fires.
    pub due: Duration,
    /// Root node of the widget that scheduled it.
    pub owner: NodeId,
    pub kind: TimerKind,
    order: u64,
}

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

/// Per-document queue of one-shot timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
    now: Duration,
    next_order: u64,
}

impl TimerQueue {
    /// Create an empty queue at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `kind` for `owner`, firing `delay` after now.
    pub fn schedule(&mut self, owner: NodeId, delay: Duration, kind: TimerKind) -> TimerId {
        let order = self.next_order;
        self.next_order += 1;
        let due = self.now.saturating_add(delay);
        tracing::trace!(?kind, ?due, "timer scheduled");
        self.timers.insert(Timer { due, owner, kind, order })
    }

    /// Move the clock forward. Moving backwards is ignored.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Remove and return the earliest timer due at or before now.
    pub fn pop_due(&mut self) -> Option<Timer> {
        let id = self.next_id(Some(self.now))?;
        self.timers.remove(id)
    }

    /// Remove and return the earliest timer regardless of its due time,
    /// advancing the clock to it.
    pub fn pop_next(&mut self) -> Option<Timer> {
        let id = self.next_id(None)?;
        let timer = self.timers.remove(id)?;
        self.set_now(timer.due);
        Some(timer)
    }

    /// Due time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_id(None)
            .and_then(|id| self.timers.get(id))
            .map(|timer| timer.due)
    }

    /// Pending timers in firing order.
    pub fn pending(&self) -> Vec<Timer> {
        let mut timers: Vec<Timer> = self.timers.values().copied().collect();
        timers.sort_by_key(|timer| (timer.due, timer.order));
        timers
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn next_id(&self, due_limit: Option<Duration>) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, timer)| due_limit.is_none_or(|limit| timer.due <= limit))
            .min_by_key(|(_, timer)| (timer.due, timer.order))
            .map(|(id, _)| id)
    }
}
