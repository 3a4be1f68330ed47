//! Data providers: where a listing's items come from.

use std::rc::Rc;

use super::item::{natural_identity, IdentityFn, Identifiable, Item, ItemId};

/// Source of items for a listing.
pub trait DataProvider<T: Item> {
    /// Current items in display order.
    fn fetch(&self) -> Vec<T>;

    /// The identity function used to compare items.
    fn identity(&self) -> IdentityFn<T>;

    /// Identity of one item.
    fn id(&self, item: &T) -> ItemId {
        (self.identity())(item)
    }

    /// Number of items.
    fn size(&self) -> usize {
        self.fetch().len()
    }
}

/// In-memory provider backed by a `Vec`, in insertion order.
pub struct ListDataProvider<T: Item> {
    items: Vec<T>,
    identity: IdentityFn<T>,
}

impl<T: Item + Identifiable> ListDataProvider<T> {
    /// A provider using the items' natural identity.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self::with_identity(items, natural_identity::<T>())
    }
}

impl<T: Item> ListDataProvider<T> {
    /// A provider with a custom identity function.
    pub fn with_identity(items: impl IntoIterator<Item = T>, identity: IdentityFn<T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            identity,
        }
    }

    /// A provider identifying items with `f`.
    pub fn identified_by(
        items: impl IntoIterator<Item = T>,
        f: impl Fn(&T) -> ItemId + 'static,
    ) -> Self {
        Self::with_identity(items, Rc::new(f))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the item with the same identity as `item`, keeping its position.
    /// Returns `false` if no such item exists.
    pub fn replace_item(&mut self, item: T) -> bool {
        let id = (self.identity)(&item);
        match self.items.iter_mut().find(|slot| (self.identity)(slot) == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove the item with the same identity. Returns the removed item.
    pub fn remove_item(&mut self, item: &T) -> Option<T> {
        let id = (self.identity)(item);
        let index = self.items.iter().position(|slot| (self.identity)(slot) == id)?;
        Some(self.items.remove(index))
    }
}

impl<T: Item> DataProvider<T> for ListDataProvider<T> {
    fn fetch(&self) -> Vec<T> {
        self.items.clone()
    }

    fn identity(&self) -> IdentityFn<T> {
        Rc::clone(&self.identity)
    }

    fn size(&self) -> usize {
        self.items.len()
    }
}
