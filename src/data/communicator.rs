//! Data communicator: turns provider items into row payloads for the client.
//!
//! The communicator owns the provider, the key mapper and the generator
//! registry. Mutations only mark work as pending; [`DataCommunicator::flush`]
//! produces the payload.

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use slotmap::SlotMap;

use super::generator::{DataGenerator, GeneratorId, RowData};
use super::item::{Item, ItemId};
use super::key_mapper::KeyMapper;
use super::provider::DataProvider;

/// Payload produced by one flush.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataChange {
    /// Every fetched item; the client drops whatever it had.
    Reset { size: usize, rows: Vec<RowData> },
    /// Only the listed items changed.
    Update { rows: Vec<RowData> },
}

impl DataChange {
    pub fn rows(&self) -> &[RowData] {
        match self {
            DataChange::Reset { rows, .. } | DataChange::Update { rows } => rows,
        }
    }
}

/// Bridges a [`DataProvider`] and the client.
pub struct DataCommunicator<T: Item> {
    provider: Box<dyn DataProvider<T>>,
    key_mapper: KeyMapper<T>,
    generators: SlotMap<GeneratorId, Rc<dyn DataGenerator<T>>>,
    order: Vec<GeneratorId>,
    fetched: Vec<T>,
    reset_pending: bool,
    refresh_order: Vec<ItemId>,
    refreshed: HashMap<ItemId, Option<T>>,
}

impl<T: Item> DataCommunicator<T> {
    /// A communicator over `provider`. The first flush is a full reset.
    pub fn new(provider: impl DataProvider<T> + 'static) -> Self {
        let key_mapper = KeyMapper::new(provider.identity());
        Self {
            provider: Box::new(provider),
            key_mapper,
            generators: SlotMap::with_key(),
            order: Vec::new(),
            fetched: Vec::new(),
            reset_pending: true,
            refresh_order: Vec::new(),
            refreshed: HashMap::new(),
        }
    }

    // ----- Provider -----

    pub fn data_provider(&self) -> &dyn DataProvider<T> {
        self.provider.as_ref()
    }

    /// Swap the provider. Every item currently on the client is destroyed and
    /// the next flush is a full reset.
    pub fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        let previous = std::mem::take(&mut self.fetched);
        for item in &previous {
            self.destroy(item);
        }
        self.key_mapper = KeyMapper::new(provider.identity());
        self.provider = Box::new(provider);
        self.reset();
    }

    /// Identity of `item` under the current provider.
    pub fn id(&self, item: &T) -> ItemId {
        self.key_mapper.item_id(item)
    }

    pub fn key_mapper(&self) -> &KeyMapper<T> {
        &self.key_mapper
    }

    /// Items sent in the last reset, updated by later refreshes.
    pub fn fetched_items(&self) -> &[T] {
        &self.fetched
    }

    // ----- Generators -----

    /// Register a generator. Registering the same generator twice returns the
    /// existing id. Generators run in registration order.
    pub fn add_generator(&mut self, generator: Rc<dyn DataGenerator<T>>) -> GeneratorId {
        if let Some(existing) = self
            .order
            .iter()
            .copied()
            .find(|&id| {
                self.generators
                    .get(id)
                    .is_some_and(|existing| Rc::ptr_eq(existing, &generator))
            })
        {
            return existing;
        }
        let id = self.generators.insert(generator);
        self.order.push(id);
        self.reset();
        id
    }

    /// Unregister a generator, destroying its data for every fetched item.
    pub fn remove_generator(&mut self, id: GeneratorId) -> bool {
        let Some(generator) = self.generators.remove(id) else {
            return false;
        };
        self.order.retain(|&other| other != id);
        for item in &self.fetched {
            generator.destroy_data(item);
        }
        self.reset();
        true
    }

    pub fn generator_count(&self) -> usize {
        self.order.len()
    }

    // ----- Invalidation -----

    /// Invalidate every pending row.
    pub fn reset(&mut self) {
        self.reset_pending = true;
        self.refresh_order.clear();
        self.refreshed.clear();
    }

    /// Invalidate the row of one item. `item` may be a newer instance with the
    /// same identity.
    pub fn refresh(&mut self, item: &T) {
        if self.reset_pending {
            return;
        }
        let id = self.id(item);
        if self.refreshed.insert(id.clone(), Some(item.clone())).is_none() {
            self.refresh_order.push(id);
        }
    }

    /// Invalidate the row of the fetched item with identity `id`. The row is
    /// rebuilt from the instance already held, so item data never changes.
    pub fn refresh_id(&mut self, id: &ItemId) {
        if self.reset_pending {
            return;
        }
        if !self.refreshed.contains_key(id) {
            self.refreshed.insert(id.clone(), None);
            self.refresh_order.push(id.clone());
        }
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn has_pending_changes(&self) -> bool {
        self.reset_pending || !self.refresh_order.is_empty()
    }

    // ----- Flush -----

    /// Produce the pending payload, if any.
    pub fn flush(&mut self) -> Option<DataChange> {
        if self.reset_pending {
            self.reset_pending = false;
            let items = self.provider.fetch();
            let mut stale = std::mem::take(&mut self.fetched);
            let live: Vec<ItemId> = items.iter().map(|item| self.id(item)).collect();
            stale.retain(|item| !live.contains(&self.key_mapper.item_id(item)));
            for item in &stale {
                self.destroy(item);
            }
            let rows: Vec<RowData> = items.iter().map(|item| self.row(item)).collect();
            tracing::trace!(size = items.len(), "flushing full data reset");
            self.fetched = items;
            return Some(DataChange::Reset {
                size: self.fetched.len(),
                rows,
            });
        }

        if self.refresh_order.is_empty() {
            return None;
        }
        let order = std::mem::take(&mut self.refresh_order);
        let mut refreshed = std::mem::take(&mut self.refreshed);
        let mut rows = Vec::with_capacity(order.len());
        for id in order {
            let Some(replacement) = refreshed.remove(&id) else {
                continue;
            };
            let Some(slot) = self
                .fetched
                .iter()
                .position(|fetched| self.key_mapper.item_id(fetched) == id)
            else {
                continue;
            };
            if let Some(item) = replacement {
                self.fetched[slot] = item;
            }
            let item = self.fetched[slot].clone();
            rows.push(self.row(&item));
        }
        tracing::trace!(rows = rows.len(), "flushing item refreshes");
        if rows.is_empty() {
            None
        } else {
            Some(DataChange::Update { rows })
        }
    }

    fn row(&mut self, item: &T) -> RowData {
        let key = self.key_mapper.key(item);
        let mut row = RowData::new(self.id(item), &key);
        for generator in self.order.iter().filter_map(|id| self.generators.get(*id)) {
            generator.generate_data(item, &mut row);
        }
        row
    }

    fn destroy(&mut self, item: &T) {
        for generator in self.order.iter().filter_map(|id| self.generators.get(*id)) {
            generator.destroy_data(item);
        }
        self.key_mapper.remove(item);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::data::provider::ListDataProvider;

    fn letters() -> DataCommunicator<String> {
        DataCommunicator::new(ListDataProvider::new(
            ["a", "b", "c"].map(String::from),
        ))
    }

    fn keys(change: &DataChange) -> Vec<String> {
        change.rows().iter().map(|row| row.key().to_owned()).collect()
    }

    #[test]
    fn first_flush_is_reset() {
        let mut communicator = letters();
        let change = communicator.flush().unwrap();
        assert!(matches!(change, DataChange::Reset { size: 3, .. }));
        assert_eq!(keys(&change), vec!["1", "2", "3"]);
        assert_eq!(communicator.flush(), None);
    }

    #[test]
    fn generators_run_in_order() {
        let mut communicator = letters();
        communicator.add_generator(Rc::new(|item: &String, row: &mut RowData| {
            row.insert("v", item.to_uppercase());
        }));
        communicator.add_generator(Rc::new(|_: &String, row: &mut RowData| {
            row.insert("v", "ignored");
            row.insert("x", 1);
        }));
        let change = communicator.flush().unwrap();
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "1", "v": "A", "x": 1 })
        );
    }

    #[test]
    fn duplicate_generator_is_rejected() {
        let mut communicator = letters();
        let generator: Rc<dyn DataGenerator<String>> = Rc::new(|_: &String, _: &mut RowData| {});
        let first = communicator.add_generator(Rc::clone(&generator));
        let second = communicator.add_generator(generator);
        assert_eq!(first, second);
        assert_eq!(communicator.generator_count(), 1);
    }

    #[test]
    fn refresh_sends_only_that_row() {
        let mut communicator = letters();
        communicator.flush();
        communicator.refresh(&"b".to_owned());
        communicator.refresh(&"b".to_owned());
        let change = communicator.flush().unwrap();
        assert!(matches!(change, DataChange::Update { .. }));
        assert_eq!(keys(&change), vec!["2"]);
    }

    #[test]
    fn refresh_id_rebuilds_from_fetched_instance() {
        let mut communicator = letters();
        communicator.add_generator(Rc::new(|item: &String, row: &mut RowData| {
            row.insert("v", item.as_str());
        }));
        communicator.flush();
        let id = communicator.id(&"b".to_owned());
        communicator.refresh_id(&id);
        communicator.refresh_id(&id);
        let change = communicator.flush().unwrap();
        assert_eq!(
            serde_json::to_value(change.rows()).unwrap(),
            json!([{ "k": "2", "v": "b" }])
        );
        assert_eq!(communicator.fetched_items(), &["a", "b", "c"].map(String::from));
    }

    #[test]
    fn refresh_id_after_refresh_keeps_newer_instance() {
        let mut communicator = letters();
        communicator.flush();
        communicator.refresh(&"b".to_owned());
        let id = communicator.id(&"b".to_owned());
        communicator.refresh_id(&id);
        assert_eq!(keys(&communicator.flush().unwrap()), vec!["2"]);
    }

    #[test]
    fn refresh_of_unknown_item_is_dropped() {
        let mut communicator = letters();
        communicator.flush();
        communicator.refresh(&"zzz".to_owned());
        assert_eq!(communicator.flush(), None);
    }

    #[test]
    fn refresh_during_pending_reset_is_absorbed() {
        let mut communicator = letters();
        communicator.refresh(&"a".to_owned());
        assert!(matches!(communicator.flush(), Some(DataChange::Reset { .. })));
        assert_eq!(communicator.flush(), None);
    }

    #[test]
    fn set_data_provider_destroys_and_resets() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));

        struct Tracking(Rc<RefCell<Vec<String>>>);
        impl DataGenerator<String> for Tracking {
            fn generate_data(&self, _item: &String, _row: &mut RowData) {}
            fn destroy_data(&self, item: &String) {
                self.0.borrow_mut().push(item.clone());
            }
        }

        let mut communicator = letters();
        communicator.add_generator(Rc::new(Tracking(Rc::clone(&destroyed))));
        communicator.flush();
        communicator.set_data_provider(ListDataProvider::new(["x".to_owned()]));
        assert_eq!(*destroyed.borrow(), vec!["a", "b", "c"]);
        let change = communicator.flush().unwrap();
        assert!(matches!(change, DataChange::Reset { size: 1, .. }));
        assert_eq!(communicator.fetched_items(), &["x".to_owned()]);
    }

    /// Provider whose contents can change behind the communicator's back.
    struct SharedProvider(Rc<RefCell<Vec<String>>>);

    impl DataProvider<String> for SharedProvider {
        fn fetch(&self) -> Vec<String> {
            self.0.borrow().clone()
        }

        fn identity(&self) -> crate::data::IdentityFn<String> {
            crate::data::natural_identity()
        }
    }

    #[test]
    fn reset_destroys_items_that_disappeared() {
        let backing = Rc::new(RefCell::new(vec!["a".to_owned(), "b".to_owned()]));
        let mut communicator = DataCommunicator::new(SharedProvider(Rc::clone(&backing)));
        communicator.flush();
        assert!(communicator.key_mapper().has(&"b".to_owned()));

        backing.borrow_mut().retain(|item| item != "b");
        communicator.reset();
        let change = communicator.flush().unwrap();
        assert_eq!(keys(&change), vec!["1"]);
        assert!(communicator.key_mapper().has(&"a".to_owned()));
        assert!(!communicator.key_mapper().has(&"b".to_owned()));
    }

    #[test]
    fn data_change_serializes_tagged() {
        let mut communicator = letters();
        let change = communicator.flush().unwrap();
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["type"], "reset");
        assert_eq!(value["size"], 3);
        assert_eq!(value["rows"][2], json!({ "k": "3" }));
    }
}
