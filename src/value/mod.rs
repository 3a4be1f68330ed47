//! Attribute value grammar: sizes, colors and resource references.
//!
//! Values arrive as strings from two places: declarative markup attributes
//! and free-form client input (a color typed into a picker's text field).
//! Both go through the same `logos` tokenizer.

pub mod color;
pub mod resource;
pub mod size;
pub mod tokenizer;

pub use color::{parse_color, Color};
pub use resource::Resource;
pub use size::{parse_size, Size, Sizing, Unit};
pub use tokenizer::{tokenize, Token};
