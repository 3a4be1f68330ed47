//! Single-selection core: at most one selected item.
//!
//! State is `{no selection, item selected}`. Setting the value that is
//! already selected (structurally or by identity) is a no-op. Any other
//! change fires one [`SingleSelectionEvent`] and refreshes the rows of the old
//! and new item so their `"s"` flag is recomputed on the next flush.

use std::cell::RefCell;
use std::rc::Rc;

use super::listing::{Listing, Selected};
use super::presentation::SELECTED;
use crate::data::{DataProvider, Item, RowData};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{
    ListenerRegistry, Registration, RpcCall, SingleSelectionEvent, ValueChangeEvent,
};

type SharedSelection<T> = Rc<RefCell<Option<Selected<T>>>>;

/// Listing plus single-selection state.
pub struct SingleSelection<T: Item> {
    listing: Listing<T>,
    selected: SharedSelection<T>,
    listeners: ListenerRegistry<SingleSelectionEvent<T>>,
}

impl<T: Item> SingleSelection<T> {
    pub fn new() -> Self {
        Self::with_listing(Listing::new())
    }

    pub fn with_listing(mut listing: Listing<T>) -> Self {
        let selected: SharedSelection<T> = Rc::new(RefCell::new(None));
        let shared = Rc::clone(&selected);
        listing.add_data_generator(Rc::new(move |_: &T, row: &mut RowData| {
            let is_selected = shared
                .borrow()
                .as_ref()
                .is_some_and(|selected| &selected.id == row.item_id());
            if is_selected {
                row.insert(SELECTED, true);
            }
        }));
        Self {
            listing,
            selected,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn listing(&self) -> &Listing<T> {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing<T> {
        &mut self.listing
    }

    /// Swap the provider. The selection is kept and re-identified with the new
    /// provider's identity function.
    pub fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.listing.set_data_provider(provider);
        let mut selected = self.selected.borrow_mut();
        if let Some(selected) = selected.as_mut() {
            selected.id = self.listing.id(&selected.item);
        }
    }

    // ----- Queries -----

    pub fn selected_item(&self) -> Option<T> {
        self.selected.borrow().as_ref().map(|s| s.item.clone())
    }

    /// Key of the selected item as issued to the client, if it has one.
    pub fn selected_key(&self) -> Option<String> {
        let selected = self.selected.borrow();
        let selected = selected.as_ref()?;
        self.listing
            .communicator()
            .key_mapper()
            .existing_key(&selected.item)
            .map(str::to_owned)
    }

    /// Whether `item` is selected, structurally or by identity.
    pub fn is_selected(&self, item: &T) -> bool {
        self.selected
            .borrow()
            .as_ref()
            .is_some_and(|selected| selected.item == *item || selected.id == self.listing.id(item))
    }

    fn same_selection(&self, current: Option<&T>, value: Option<&T>) -> bool {
        match (current, value) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b || self.listing.id(a) == self.listing.id(b),
            _ => false,
        }
    }

    // ----- Mutation -----

    /// Select `value` from server code. `None` clears the selection.
    pub fn set_selected_item(&mut self, value: Option<T>) -> bool {
        self.set_selected(value, false)
    }

    /// Select `value`. Returns `true` if the selection changed.
    pub fn set_selected(&mut self, value: Option<T>, user_originated: bool) -> bool {
        let old_value = self.selected_item();
        if self.same_selection(old_value.as_ref(), value.as_ref()) {
            return false;
        }
        *self.selected.borrow_mut() = value.as_ref().map(|item| Selected {
            id: self.listing.id(item),
            item: item.clone(),
        });
        for item in old_value.iter().chain(value.iter()) {
            let id = self.listing.id(item);
            self.listing.communicator_mut().refresh_id(&id);
        }
        tracing::trace!(
            old = ?old_value,
            new = ?value,
            user_originated,
            "single selection changed"
        );
        self.listeners.fire(&SingleSelectionEvent {
            old_value,
            value,
            user_originated,
        });
        true
    }

    /// Deselect `item` if it is the selected one.
    pub fn deselect(&mut self, item: &T) -> bool {
        if self.is_selected(item) {
            self.set_selected(None, false)
        } else {
            false
        }
    }

    /// Swap the stored instance for a same-identity item with newer data.
    /// No event fires.
    pub fn refresh_selected_item(&mut self, item: T) {
        if !self.is_selected(&item) {
            return;
        }
        self.listing.communicator_mut().refresh(&item);
        if let Some(selected) = self.selected.borrow_mut().as_mut() {
            selected.item = item;
        }
    }

    pub fn add_selection_listener(
        &mut self,
        listener: impl FnMut(&SingleSelectionEvent<T>) + 'static,
    ) -> Registration {
        self.listeners.add(listener)
    }

    pub fn remove_selection_listener(&mut self, registration: Registration) -> bool {
        self.listeners.remove(registration)
    }

    /// Listen to selection changes as changes of an `Option<T>` value.
    /// Remove with [`Self::remove_selection_listener`].
    pub fn add_value_change_listener(
        &mut self,
        mut listener: impl FnMut(&ValueChangeEvent<Option<T>>) + 'static,
    ) -> Registration {
        self.listeners.add(move |event: &SingleSelectionEvent<T>| {
            listener(&ValueChangeEvent {
                old_value: event.old_value.clone(),
                value: event.value.clone(),
                user_originated: event.user_originated,
            })
        })
    }

    // ----- Client -----

    /// Handle `select` and `deselect`. Unknown keys are ignored.
    /// Returns `Ok(false)` for calls this core does not handle.
    pub fn handle_rpc(&mut self, call: &RpcCall) -> Result<bool, RpcError> {
        match call {
            RpcCall::Select { key } => {
                match self.listing.item_for_key(key) {
                    Some(item) => {
                        self.set_selected(Some(item), true);
                    }
                    None => tracing::debug!(key = %key, "select of unknown key ignored"),
                }
                Ok(true)
            }
            RpcCall::Deselect { key } => {
                match self.listing.item_for_key(key) {
                    Some(item) if self.is_selected(&item) => {
                        self.set_selected(None, true);
                    }
                    _ => tracing::debug!(key = %key, "deselect of unselected key ignored"),
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // ----- Design -----

    pub fn write_items(&self, design: &mut Design, element: ElementId, ctx: &DesignContext) {
        self.listing
            .write_items(design, element, ctx, |item| self.is_selected(item));
    }

    /// Read items; the last item marked `selected` becomes the selection.
    pub fn read_items(&mut self, design: &Design, element: ElementId) -> Result<(), DesignError> {
        let selected = self.listing.read_items(design, element)?;
        if let Some(item) = selected.into_iter().last() {
            self.set_selected(Some(item), false);
        }
        Ok(())
    }
}

impl<T: Item> Default for SingleSelection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::data::{ItemId, ListDataProvider};

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: i64,
        name: String,
    }

    impl std::fmt::Display for Person {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.name)
        }
    }

    fn person(id: i64, name: &str) -> Person {
        Person {
            id,
            name: name.to_owned(),
        }
    }

    fn people() -> SingleSelection<Person> {
        SingleSelection::with_listing(Listing::with_provider(ListDataProvider::identified_by(
            [person(1, "Ann"), person(2, "Bob"), person(3, "Cid")],
            |p: &Person| ItemId::Int(p.id),
        )))
    }

    fn recorded(
        selection: &mut SingleSelection<Person>,
    ) -> Rc<RefCell<Vec<SingleSelectionEvent<Person>>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        selection.add_selection_listener(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn select_by_identity() {
        let mut selection = people();
        selection.set_selected_item(Some(person(1, "Ann")));
        assert!(selection.is_selected(&person(1, "Ann (renamed)")));
        assert!(!selection.is_selected(&person(2, "Ann")));
    }

    #[test]
    fn same_value_twice_fires_once() {
        let mut selection = people();
        let events = recorded(&mut selection);
        assert!(selection.set_selected_item(Some(person(2, "Bob"))));
        assert!(!selection.set_selected_item(Some(person(2, "Bob"))));
        assert!(!selection.set_selected_item(Some(person(2, "Robert"))));
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].old_value, None);
        assert!(!events.borrow()[0].user_originated);
    }

    #[test]
    fn event_carries_old_value() {
        let mut selection = people();
        let events = recorded(&mut selection);
        selection.set_selected_item(Some(person(1, "Ann")));
        selection.set_selected_item(Some(person(3, "Cid")));
        selection.set_selected_item(None);
        let events = events.borrow();
        assert_eq!(events[1].old_value, Some(person(1, "Ann")));
        assert_eq!(events[1].value, Some(person(3, "Cid")));
        assert_eq!(events[2].old_value, Some(person(3, "Cid")));
        assert_eq!(events[2].value, None);
    }

    #[test]
    fn deselect_unselected_is_noop() {
        let mut selection = people();
        let events = recorded(&mut selection);
        assert!(!selection.deselect(&person(1, "Ann")));
        assert!(!selection.set_selected_item(None));
        selection.set_selected_item(Some(person(1, "Ann")));
        assert!(!selection.deselect(&person(2, "Bob")));
        assert!(selection.deselect(&person(1, "Ann")));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn refreshes_old_and_new_rows_only() {
        let mut selection = people();
        selection.listing_mut().flush();
        selection.set_selected_item(Some(person(1, "Ann")));
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(change.rows().len(), 1);
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "1", "v": "Ann", "s": true })
        );

        selection.set_selected_item(Some(person(2, "Bob")));
        let change = selection.listing_mut().flush().unwrap();
        let rows: Vec<_> = change
            .rows()
            .iter()
            .map(|row| serde_json::to_value(row).unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                json!({ "k": "1", "v": "Ann" }),
                json!({ "k": "2", "v": "Bob", "s": true }),
            ]
        );
    }

    #[test]
    fn other_instances_do_not_leak_into_rows() {
        let mut selection = people();
        selection.listing_mut().flush();
        selection.set_selected_item(Some(person(1, "Annie")));
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "1", "v": "Ann", "s": true })
        );

        selection.set_selected_item(None);
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "1", "v": "Ann" })
        );
        assert_eq!(selection.listing().item_for_key("1"), Some(person(1, "Ann")));
    }

    #[test]
    fn rpc_select_and_stale_keys() {
        let mut selection = people();
        let events = recorded(&mut selection);
        selection.listing_mut().flush();
        selection
            .handle_rpc(&RpcCall::Select { key: "3".into() })
            .unwrap();
        assert_eq!(selection.selected_item(), Some(person(3, "Cid")));
        assert!(events.borrow()[0].user_originated);

        selection
            .handle_rpc(&RpcCall::Select { key: "42".into() })
            .unwrap();
        selection
            .handle_rpc(&RpcCall::Deselect { key: "1".into() })
            .unwrap();
        assert_eq!(selection.selected_item(), Some(person(3, "Cid")));
        assert_eq!(events.borrow().len(), 1);

        selection
            .handle_rpc(&RpcCall::Deselect { key: "3".into() })
            .unwrap();
        assert_eq!(selection.selected_item(), None);
        assert_eq!(selection.handle_rpc(&RpcCall::Click).unwrap(), false);
    }

    #[test]
    fn selected_key_follows_key_mapper() {
        let mut selection = people();
        selection.set_selected_item(Some(person(2, "Bob")));
        assert_eq!(selection.selected_key(), None);
        selection.listing_mut().flush();
        assert_eq!(selection.selected_key(), Some("2".to_owned()));
    }

    #[test]
    fn refresh_selected_item_swaps_instance_silently() {
        let mut selection = people();
        let events = recorded(&mut selection);
        selection.set_selected_item(Some(person(2, "Bob")));
        selection.listing_mut().flush();
        selection.refresh_selected_item(person(2, "Robert"));
        assert_eq!(selection.selected_item(), Some(person(2, "Robert")));
        assert_eq!(events.borrow().len(), 1);
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(change.rows()[0].get("v"), Some(&json!("Robert")));

        selection.refresh_selected_item(person(3, "Cyd"));
        assert_eq!(selection.selected_item(), Some(person(2, "Robert")));
    }
}
