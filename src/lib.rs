//! # trellis
//!
//! A server-side UI component tree. Components live on the server, keep their
//! state there and exchange small JSON payloads with a thin client.
//!
//! trellis covers the parts of such a framework that hold the actual
//! behavior: selection state machines for single and multi selects, a data
//! communicator that turns provider items into keyed rows, declarative
//! markup read and write, and a session that routes client calls and
//! reports state diffs.
//!
//! ## Core Systems
//!
//! - **[`value`]**: Attribute value grammar: sizes, colors, resources (logos tokenizer)
//! - **[`design`]**: Slotmap-backed markup tree, attribute conversion, design context
//! - **[`data`]**: Items, identity, data providers, key mapping, data communicator
//! - **[`event`]**: Listeners, component events, shortcuts, client RPC calls
//! - **[`component`]**: Component traits, listing and selection machinery, state diffs
//! - **[`components`]**: Buttons, fields, color picker, selects and ordered layouts
//! - **[`session`]**: Component ownership, RPC dispatch, change collection
//! - **[`testing`]**: Headless client and snapshot helpers
//!
//! A session is driven by one caller at a time: every mutation takes
//! `&mut`, and components hold `Rc` so they stay on the session's thread.

// Foundation
pub mod error;
pub mod value;

// Markup and data
pub mod data;
pub mod design;

// Components
pub mod component;
pub mod components;
pub mod event;

// Ownership and dispatch
pub mod session;

// Test support
pub mod testing;

pub use component::{Component, HasItems, HasSelection, HasValue};
pub use error::{ComponentError, DesignError, RpcError, ValueParseError};
pub use session::{ComponentId, Session, SessionConfig};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use trellis_macros::design;
