//! Event system: listeners, component events, shortcuts, client RPC calls and
//! their queue.

pub mod events;
pub mod listener;
pub mod rpc;
pub mod shortcut;

pub use events::{ClickEvent, MultiSelectionEvent, SingleSelectionEvent, ValueChangeEvent};
pub use listener::{ListenerRegistry, Registration};
pub use rpc::{RpcCall, RpcEnvelope, RpcQueue};
pub use shortcut::{Key, Modifiers, Shortcut};
