//! Event system: input, key bindings, messages, dispatch, window listeners.

pub mod binding;
pub mod handler;
pub mod input;
pub mod message;
pub mod subscription;

pub use binding::{KeyBindingRegistry, NavAction};
pub use handler::EventDispatcher;
pub use input::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent, PointerKind};
pub use message::{Change, Envelope, Message, Toggled};
pub use subscription::{ActiveSubscriptions, ListenerKind, SubscriptionId, WindowListeners};
