//! Input event types, decoupled from crossterm.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`PointerEvent`] and supporting
//! types. Crossterm events are converted via `From` impls so hosts driving
//! the document from a terminal never hand crossterm types to widgets.

use std::ops::{BitAnd, BitOr};

use crate::dom::node::NodeId;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A key the document has no name for.
    Unidentified,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// Pointer events
// ---------------------------------------------------------------------------

/// Which pointer gesture occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse click (or the click synthesized after a tap).
    Click,
    /// Start of a touch.
    TouchStart,
}

/// A pointer gesture on a known node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub target: NodeId,
    pub kind: PointerKind,
    /// `true` for user-generated input, `false` for programmatic triggers.
    pub trusted: bool,
}

impl PointerEvent {
    /// A user click on `target`.
    pub fn click(target: NodeId) -> Self {
        Self { target, kind: PointerKind::Click, trusted: true }
    }

    /// A user touch on `target`.
    pub fn touch(target: NodeId) -> Self {
        Self { target, kind: PointerKind::TouchStart, trusted: true }
    }

    /// A click raised by code rather than by the user.
    pub fn synthetic(target: NodeId) -> Self {
        Self { target, kind: PointerKind::Click, trusted: false }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event fed into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    /// Pointer gesture at document coordinates; the target is hit-tested.
    PointerAt { x: i32, y: i32, kind: PointerKind },
    Resize { width: u16, height: u16 },
    /// Scroll the window to an absolute vertical offset.
    Scroll { y: i32 },
    /// Scroll the window by a relative amount.
    ScrollBy { dy: i32 },
    Paste(String),
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let code = match ct.code {
            crossterm::event::KeyCode::Char(c) => Key::Char(c),
            crossterm::event::KeyCode::Enter => Key::Enter,
            crossterm::event::KeyCode::Esc => Key::Escape,
            crossterm::event::KeyCode::Tab => Key::Tab,
            crossterm::event::KeyCode::BackTab => Key::BackTab,
            crossterm::event::KeyCode::Backspace => Key::Backspace,
            crossterm::event::KeyCode::Delete => Key::Delete,
            crossterm::event::KeyCode::Left => Key::Left,
            crossterm::event::KeyCode::Right => Key::Right,
            crossterm::event::KeyCode::Up => Key::Up,
            crossterm::event::KeyCode::Down => Key::Down,
            crossterm::event::KeyCode::Home => Key::Home,
            crossterm::event::KeyCode::End => Key::End,
            crossterm::event::KeyCode::PageUp => Key::PageUp,
            crossterm::event::KeyCode::PageDown => Key::PageDown,
            crossterm::event::KeyCode::F(n) => Key::F(n),
            _ => Key::Unidentified,
        };
        KeyEvent { code, modifiers: convert_modifiers(ct.modifiers) }
    }
}

/// Convert a crossterm `Event` into our `InputEvent`.
///
/// Returns `None` for events the document does not consume: key releases,
/// pointer moves, drags, and non-left buttons.
pub fn try_from_crossterm(event: crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};

    match event {
        Event::Key(ke) if ke.kind == KeyEventKind::Release => None,
        Event::Key(ke) => Some(InputEvent::Key(KeyEvent::from(ke))),
        Event::Mouse(me) => match me.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerAt {
                x: i32::from(me.column),
                y: i32::from(me.row),
                kind: PointerKind::Click,
            }),
            MouseEventKind::ScrollUp => Some(InputEvent::ScrollBy { dy: -1 }),
            MouseEventKind::ScrollDown => Some(InputEvent::ScrollBy { dy: 1 }),
            _ => None,
        },
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::Paste(text) => Some(InputEvent::Paste(text)),
        Event::FocusGained | Event::FocusLost => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
