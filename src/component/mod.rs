//! Component traits, common state and the listing/selection machinery shared
//! by concrete components.

pub mod common;
pub mod field;
pub mod listing;
pub mod multi_select;
pub mod presentation;
pub mod single_select;
pub mod state;
pub mod traits;

pub use common::CommonState;
pub use field::ValueField;
pub use listing::{Listing, ITEM_TAG};
pub use multi_select::MultiSelection;
pub use presentation::{ItemCaption, ItemEnabled, ItemIcon, Presentation};
pub use single_select::SingleSelection;
pub use state::{StateDiff, StateTracker};
pub use traits::{unsupported, Component, HasItems, HasSelection, HasValue};
