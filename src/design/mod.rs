//! Declarative markup: slotmap-backed element tree, attribute conversion,
//! HTML rendering and the design context used to read and write components.

pub mod attribute;
pub mod context;
pub mod html;
pub mod node;
pub mod tree;

pub use attribute::{read_attribute, write_attribute, DesignValue};
pub use context::{ComponentFactory, DesignContext};
pub use html::to_html;
pub use node::{ElementData, ElementId};
pub use tree::Design;
