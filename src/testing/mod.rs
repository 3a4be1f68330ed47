//! Headless testing support: a client that drives a session, and text
//! renderings for snapshot assertions.

pub mod client;
pub mod snapshot;

pub use client::TestClient;
pub use snapshot::{changes_to_string, component_to_string, design_to_string, payload_to_string};
