//! Multi-selection core: an ordered set of selected items.
//!
//! Selection order is insertion order. Every change goes through
//! [`MultiSelection::update_selection`], which cancels items present in both
//! the added and removed sets, skips calls that would change nothing, applies
//! removals before additions and fires exactly one [`MultiSelectionEvent`].

use std::cell::RefCell;
use std::rc::Rc;

use super::listing::{Listing, Selected};
use super::presentation::SELECTED;
use crate::data::{DataProvider, Item, ItemId, RowData};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{
    ListenerRegistry, MultiSelectionEvent, Registration, RpcCall, ValueChangeEvent,
};

type SharedSelection<T> = Rc<RefCell<Vec<Selected<T>>>>;

/// Listing plus multi-selection state.
pub struct MultiSelection<T: Item> {
    listing: Listing<T>,
    selected: SharedSelection<T>,
    listeners: ListenerRegistry<MultiSelectionEvent<T>>,
}

impl<T: Item> MultiSelection<T> {
    pub fn new() -> Self {
        Self::with_listing(Listing::new())
    }

    pub fn with_listing(mut listing: Listing<T>) -> Self {
        let selected: SharedSelection<T> = Rc::new(RefCell::new(Vec::new()));
        let shared = Rc::clone(&selected);
        listing.add_data_generator(Rc::new(move |_: &T, row: &mut RowData| {
            let is_selected = shared
                .borrow()
                .iter()
                .any(|selected| &selected.id == row.item_id());
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

    /// Swap the provider, keeping the selection and re-identifying it with
    /// the new provider's identity function.
    pub fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.listing.set_data_provider(provider);
        for selected in self.selected.borrow_mut().iter_mut() {
            selected.id = self.listing.id(&selected.item);
        }
    }

    // ----- Queries -----

    /// Selected items in selection order.
    pub fn selected_items(&self) -> Vec<T> {
        self.selected
            .borrow()
            .iter()
            .map(|selected| selected.item.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.borrow().len()
    }

    /// Whether an item with the same identity as `item` is selected.
    pub fn is_selected(&self, item: &T) -> bool {
        self.contains_id(&self.listing.id(item))
    }

    fn contains_id(&self, id: &ItemId) -> bool {
        self.selected.borrow().iter().any(|selected| &selected.id == id)
    }

    /// Keys of the selected items that have been issued to the client.
    pub fn selected_keys(&self) -> Vec<String> {
        let key_mapper = self.listing.communicator().key_mapper();
        self.selected
            .borrow()
            .iter()
            .filter_map(|selected| key_mapper.existing_key(&selected.item))
            .map(str::to_owned)
            .collect()
    }

    // ----- Mutation -----

    /// Add `added` and remove `removed` in one step.
    ///
    /// Returns `true` if the selection changed. Items present in both sets
    /// are left as they were.
    pub fn update_selection(
        &mut self,
        added: impl IntoIterator<Item = T>,
        removed: impl IntoIterator<Item = T>,
        user_originated: bool,
    ) -> bool {
        let mut added = self.identified(added);
        let mut removed = self.identified(removed);
        let both: Vec<ItemId> = added
            .iter()
            .filter(|(id, _)| removed.iter().any(|(other, _)| other == id))
            .map(|(id, _)| id.clone())
            .collect();
        added.retain(|(id, _)| !both.contains(id));
        removed.retain(|(id, _)| !both.contains(id));

        added.retain(|(id, _)| !self.contains_id(id));
        removed.retain(|(id, _)| self.contains_id(id));
        if added.is_empty() && removed.is_empty() {
            return false;
        }

        let old_selection = self.selected_items();
        {
            let mut selected = self.selected.borrow_mut();
            selected.retain(|selected| !removed.iter().any(|(id, _)| *id == selected.id));
            selected.extend(
                added
                    .iter()
                    .map(|(id, item)| Selected {
                        id: id.clone(),
                        item: item.clone(),
                    }),
            );
        }
        let communicator = self.listing.communicator_mut();
        for (id, _) in removed.iter().chain(added.iter()) {
            communicator.refresh_id(id);
        }

        let added: Vec<T> = added.into_iter().map(|(_, item)| item).collect();
        let removed: Vec<T> = removed.into_iter().map(|(_, item)| item).collect();
        tracing::trace!(
            added = added.len(),
            removed = removed.len(),
            user_originated,
            "multi selection changed"
        );
        let event = MultiSelectionEvent {
            old_selection,
            value: self.selected_items(),
            added,
            removed,
            user_originated,
        };
        self.listeners.fire(&event);
        true
    }

    /// Pair items with their identity, dropping repeated identities.
    fn identified(&self, items: impl IntoIterator<Item = T>) -> Vec<(ItemId, T)> {
        let mut out: Vec<(ItemId, T)> = Vec::new();
        for item in items {
            let id = self.listing.id(&item);
            if !out.iter().any(|(other, _)| *other == id) {
                out.push((id, item));
            }
        }
        out
    }

    pub fn select(&mut self, item: T) -> bool {
        self.update_selection([item], [], false)
    }

    pub fn deselect(&mut self, item: T) -> bool {
        self.update_selection([], [item], false)
    }

    pub fn select_items(&mut self, items: impl IntoIterator<Item = T>) -> bool {
        self.update_selection(items, [], false)
    }

    pub fn deselect_items(&mut self, items: impl IntoIterator<Item = T>) -> bool {
        self.update_selection([], items, false)
    }

    pub fn deselect_all(&mut self) -> bool {
        let all = self.selected_items();
        self.update_selection([], all, false)
    }

    /// Swap the stored instance of a selected item for `item`, keeping its
    /// position. No event fires.
    pub fn refresh_selected_item(&mut self, item: T) {
        let id = self.listing.id(&item);
        let swapped = {
            let mut selected = self.selected.borrow_mut();
            match selected.iter_mut().find(|selected| selected.id == id) {
                Some(slot) => {
                    slot.item = item.clone();
                    true
                }
                None => false,
            }
        };
        if swapped {
            self.listing.communicator_mut().refresh(&item);
        }
    }

    pub fn add_selection_listener(
        &mut self,
        listener: impl FnMut(&MultiSelectionEvent<T>) + 'static,
    ) -> Registration {
        self.listeners.add(listener)
    }

    pub fn remove_selection_listener(&mut self, registration: Registration) -> bool {
        self.listeners.remove(registration)
    }

    /// Listen to selection changes as changes of a `Vec<T>` value.
    /// Remove with [`Self::remove_selection_listener`].
    pub fn add_value_change_listener(
        &mut self,
        mut listener: impl FnMut(&ValueChangeEvent<Vec<T>>) + 'static,
    ) -> Registration {
        self.listeners.add(move |event: &MultiSelectionEvent<T>| {
            listener(&ValueChangeEvent {
                old_value: event.old_selection.clone(),
                value: event.value.clone(),
                user_originated: event.user_originated,
            })
        })
    }

    /// Replace the selection with `items`: everything else is deselected.
    pub fn set_selected_items(&mut self, items: Vec<T>, user_originated: bool) -> bool {
        let ids: Vec<ItemId> = items.iter().map(|item| self.listing.id(item)).collect();
        let removed: Vec<T> = self
            .selected
            .borrow()
            .iter()
            .filter(|selected| !ids.contains(&selected.id))
            .map(|selected| selected.item.clone())
            .collect();
        self.update_selection(items, removed, user_originated)
    }

    // ----- Client -----

    /// Resolve client keys to enabled items. Unknown keys and disabled items
    /// are dropped.
    fn resolve_keys(&self, keys: &[String]) -> Vec<T> {
        keys.iter()
            .filter_map(|key| {
                let item = self.listing.item_for_key(key);
                match item {
                    Some(item) if self.listing.is_item_enabled(&item) => Some(item),
                    Some(_) => {
                        tracing::debug!(key = %key, "selection of disabled item dropped");
                        None
                    }
                    None => {
                        tracing::debug!(key = %key, "selection of unknown key dropped");
                        None
                    }
                }
            })
            .collect()
    }

    /// Handle `update_selection`, `select` and `deselect`.
    /// Returns `Ok(false)` for calls this core does not handle.
    pub fn handle_rpc(&mut self, call: &RpcCall) -> Result<bool, RpcError> {
        let (selected, deselected) = match call {
            RpcCall::UpdateSelection {
                selected,
                deselected,
            } => (self.resolve_keys(selected), self.resolve_keys(deselected)),
            RpcCall::Select { key } => (self.resolve_keys(std::slice::from_ref(key)), Vec::new()),
            RpcCall::Deselect { key } => (Vec::new(), self.resolve_keys(std::slice::from_ref(key))),
            _ => return Ok(false),
        };
        self.update_selection(selected, deselected, true);
        Ok(true)
    }

    // ----- Design -----

    pub fn write_items(&self, design: &mut Design, element: ElementId, ctx: &DesignContext) {
        self.listing
            .write_items(design, element, ctx, |item| self.is_selected(item));
    }

    /// Read items and select every item marked `selected`, in document order.
    pub fn read_items(&mut self, design: &Design, element: ElementId) -> Result<(), DesignError> {
        let selected = self.listing.read_items(design, element)?;
        if !selected.is_empty() {
            self.update_selection(selected, [], false);
        }
        Ok(())
    }
}

impl<T: Item> Default for MultiSelection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::data::ListDataProvider;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: i64,
        label: String,
    }

    impl std::fmt::Display for Tag {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.label)
        }
    }

    fn tag(id: i64, label: &str) -> Tag {
        Tag {
            id,
            label: label.to_owned(),
        }
    }

    fn tags() -> MultiSelection<Tag> {
        MultiSelection::with_listing(Listing::with_provider(ListDataProvider::identified_by(
            [tag(1, "a"), tag(2, "b"), tag(3, "c")],
            |t: &Tag| ItemId::Int(t.id),
        )))
    }

    fn letters() -> MultiSelection<String> {
        MultiSelection::with_listing(Listing::with_provider(ListDataProvider::new(
            ["a", "b", "c"].map(String::from),
        )))
    }

    fn recorded<T: Item>(
        selection: &mut MultiSelection<T>,
    ) -> Rc<RefCell<Vec<MultiSelectionEvent<T>>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        selection.add_selection_listener(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    fn s(text: &str) -> String {
        text.to_owned()
    }

    #[test]
    fn selection_order_is_insertion_order() {
        let mut selection = letters();
        selection.select(s("b"));
        selection.select(s("a"));
        selection.deselect(s("b"));
        selection.select(s("b"));
        assert_eq!(selection.selected_items(), vec![s("a"), s("b")]);
    }

    #[test]
    fn symmetric_cancellation() {
        let mut selection = letters();
        let events = recorded(&mut selection);
        assert!(!selection.update_selection([s("x")], [s("x")], false));
        selection.select(s("a"));
        assert!(!selection.update_selection([s("a")], [s("a")], false));
        assert_eq!(selection.selected_items(), vec![s("a")]);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn idempotent_update_is_noop() {
        let mut selection = letters();
        selection.select_items([s("a"), s("b")]);
        let events = recorded(&mut selection);
        assert!(!selection.update_selection([s("a"), s("b")], [s("c")], false));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn one_event_with_effective_changes() {
        let mut selection = letters();
        selection.select_items([s("a"), s("b")]);
        let events = recorded(&mut selection);
        assert!(selection.update_selection([s("b"), s("c"), s("c")], [s("a")], true));
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            MultiSelectionEvent {
                old_selection: vec![s("a"), s("b")],
                value: vec![s("b"), s("c")],
                added: vec![s("c")],
                removed: vec![s("a")],
                user_originated: true,
            }
        );
    }

    #[test]
    fn membership_by_identity() {
        let mut selection = tags();
        selection.select(tag(2, "b"));
        assert!(selection.is_selected(&tag(2, "renamed")));
        assert!(!selection.select(tag(2, "other instance")));
        assert!(selection.deselect(tag(2, "whatever")));
        assert!(selection.selected_items().is_empty());
    }

    #[test]
    fn refresh_selected_item_keeps_position() {
        let mut selection = tags();
        selection.select_items([tag(1, "a"), tag(2, "b"), tag(3, "c")]);
        let events = recorded(&mut selection);
        selection.refresh_selected_item(tag(2, "B"));
        assert_eq!(
            selection.selected_items(),
            vec![tag(1, "a"), tag(2, "B"), tag(3, "c")]
        );
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn refreshes_only_changed_rows() {
        let mut selection = letters();
        selection.listing_mut().flush();
        selection.select(s("a"));
        selection.listing_mut().flush();

        selection.update_selection([s("c")], [s("a")], false);
        let change = selection.listing_mut().flush().unwrap();
        let rows: Vec<_> = change
            .rows()
            .iter()
            .map(|row| serde_json::to_value(row).unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                json!({ "k": "1", "v": "a" }),
                json!({ "k": "3", "v": "c", "s": true }),
            ]
        );
    }

    #[test]
    fn other_instances_do_not_leak_into_rows() {
        let mut selection = tags();
        selection.listing_mut().flush();
        selection.select(tag(2, "other"));
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "2", "v": "b", "s": true })
        );

        selection.deselect(tag(2, "STALE"));
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(
            serde_json::to_value(&change.rows()[0]).unwrap(),
            json!({ "k": "2", "v": "b" })
        );
        assert_eq!(selection.listing().item_for_key("2"), Some(tag(2, "b")));
        assert_eq!(
            selection.listing().communicator().fetched_items(),
            &[tag(1, "a"), tag(2, "b"), tag(3, "c")]
        );
    }

    #[test]
    fn rpc_drops_disabled_and_unknown_keys() {
        let mut selection = letters();
        selection
            .listing_mut()
            .set_item_enabled_provider(|item| item != "b");
        selection.listing_mut().flush();
        let events = recorded(&mut selection);

        selection
            .handle_rpc(&RpcCall::UpdateSelection {
                selected: vec!["1".into(), "2".into(), "9".into()],
                deselected: vec![],
            })
            .unwrap();
        assert_eq!(selection.selected_items(), vec![s("a")]);
        assert!(events.borrow()[0].user_originated);

        selection
            .handle_rpc(&RpcCall::Select { key: "3".into() })
            .unwrap();
        selection
            .handle_rpc(&RpcCall::Deselect { key: "1".into() })
            .unwrap();
        assert_eq!(selection.selected_items(), vec![s("c")]);
        assert_eq!(selection.selected_keys(), vec![s("3")]);
        assert_eq!(selection.handle_rpc(&RpcCall::Click).unwrap(), false);
    }

    #[test]
    fn provider_change_keeps_selection() {
        let mut selection = letters();
        selection.select(s("b"));
        selection.set_data_provider(ListDataProvider::new([s("b"), s("d")]));
        assert_eq!(selection.selected_items(), vec![s("b")]);
        let change = selection.listing_mut().flush().unwrap();
        assert_eq!(change.rows()[0].get("s"), Some(&json!(true)));
        assert_eq!(change.rows()[1].get("s"), None);
    }

    #[test]
    fn deselect_all_fires_once() {
        let mut selection = letters();
        selection.select_items([s("a"), s("c")]);
        let events = recorded(&mut selection);
        assert!(selection.deselect_all());
        assert!(!selection.deselect_all());
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].removed, vec![s("a"), s("c")]);
    }
}
