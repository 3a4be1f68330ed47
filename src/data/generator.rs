//! Data generators and the per-item row payload they fill.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use slotmap::new_key_type;

use super::item::ItemId;

new_key_type! {
    /// Handle for a registered data generator.
    pub struct GeneratorId;
}

/// Key under which every row carries its item key.
pub const KEY: &str = "k";

/// The outgoing JSON object for one item.
///
/// Keys are kept in insertion order. A key, once written, belongs to whoever
/// wrote it first: later writes of the same key are dropped and logged.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    id: ItemId,
    values: Map<String, Value>,
}

impl RowData {
    /// A row for `id`, with the item key already written.
    pub fn new(id: ItemId, key: &str) -> Self {
        let mut values = Map::new();
        values.insert(KEY.to_owned(), Value::String(key.to_owned()));
        Self { id, values }
    }

    /// Identity of the item this row describes.
    pub fn item_id(&self) -> &ItemId {
        &self.id
    }

    /// The item key (`"k"`).
    pub fn key(&self) -> &str {
        self.values.get(KEY).and_then(Value::as_str).unwrap_or_default()
    }

    /// Write `value` under `name`. Returns `false` and keeps the existing value
    /// if an earlier generator already wrote `name`.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> bool {
        if self.values.contains_key(name) {
            tracing::debug!(
                key = name,
                item = %self.id,
                "row key already written by an earlier generator, ignoring"
            );
            return false;
        }
        self.values.insert(name.to_owned(), value.into());
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl Serialize for RowData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Attaches values to the outgoing row of each item.
pub trait DataGenerator<T> {
    /// Add this generator's values to `row`.
    fn generate_data(&self, item: &T, row: &mut RowData);

    /// Release anything kept for `item`; called when the item leaves the client.
    fn destroy_data(&self, _item: &T) {}
}

impl<T, F> DataGenerator<T> for F
where
    F: Fn(&T, &mut RowData),
{
    fn generate_data(&self, item: &T, row: &mut RowData) {
        self(item, row)
    }
}
