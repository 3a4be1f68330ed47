//! Items, identity and data communication for listing components.

pub mod communicator;
pub mod generator;
pub mod item;
pub mod key_mapper;
pub mod provider;

pub use communicator::{DataChange, DataCommunicator};
pub use generator::{DataGenerator, GeneratorId, RowData};
pub use item::{display_identity, natural_identity, IdentityFn, Identifiable, Item, ItemId};
pub use key_mapper::KeyMapper;
pub use provider::{DataProvider, ListDataProvider};
