//! Key mapper: short string keys for items on the wire.

use std::collections::HashMap;

use super::item::{IdentityFn, Item, ItemId};

/// Maps item identities to opaque string keys and back.
///
/// Keys are sequential numbers rendered as strings, assigned on first use and
/// stable for as long as the identity stays mapped.
pub struct KeyMapper<T: Item> {
    identity: IdentityFn<T>,
    next_key: u64,
    keys: HashMap<ItemId, String>,
    items: HashMap<String, T>,
}

impl<T: Item> KeyMapper<T> {
    pub fn new(identity: IdentityFn<T>) -> Self {
        Self {
            identity,
            next_key: 1,
            keys: HashMap::new(),
            items: HashMap::new(),
        }
    }

    /// Identity of `item` under this mapper's identity function.
    pub fn item_id(&self, item: &T) -> ItemId {
        (self.identity)(item)
    }

    /// Key for `item`, assigning a new one if needed. The stored instance is
    /// replaced by `item`.
    pub fn key(&mut self, item: &T) -> String {
        let id = self.item_id(item);
        let key = match self.keys.get(&id) {
            Some(key) => key.clone(),
            None => {
                let key = self.next_key.to_string();
                self.next_key += 1;
                self.keys.insert(id, key.clone());
                key
            }
        };
        self.items.insert(key.clone(), item.clone());
        key
    }

    /// Item for a key, if the key is live.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    /// Whether `item`'s identity has a key.
    pub fn has(&self, item: &T) -> bool {
        self.keys.contains_key(&self.item_id(item))
    }

    /// Existing key for `item`, without assigning one.
    pub fn existing_key(&self, item: &T) -> Option<&str> {
        self.keys.get(&self.item_id(item)).map(String::as_str)
    }

    /// Swap the stored instance for a same-identity item. No-op if unmapped.
    pub fn refresh(&mut self, item: &T) {
        if let Some(key) = self.keys.get(&self.item_id(item)) {
            self.items.insert(key.clone(), item.clone());
        }
    }

    /// Drop the mapping for `item`. Returns the key it had.
    pub fn remove(&mut self, item: &T) -> Option<String> {
        let key = self.keys.remove(&self.item_id(item))?;
        self.items.remove(&key);
        Some(key)
    }

    /// Drop every mapping. Keys are never reused.
    pub fn remove_all(&mut self) {
        self.keys.clear();
        self.items.clear();
    }

    /// Live items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::data::item::natural_identity;

    #[test]
    fn keys_are_sequential_and_stable() {
        let mut mapper = KeyMapper::new(natural_identity::<String>());
        assert_eq!(mapper.key(&"a".to_owned()), "1");
        assert_eq!(mapper.key(&"b".to_owned()), "2");
        assert_eq!(mapper.key(&"a".to_owned()), "1");
        assert_eq!(mapper.len(), 2);
    }

    #[test]
    fn get_and_has() {
        let mut mapper = KeyMapper::new(natural_identity::<i32>());
        let key = mapper.key(&5);
        assert_eq!(mapper.get(&key), Some(&5));
        assert!(mapper.has(&5));
        assert!(!mapper.has(&6));
        assert_eq!(mapper.get("99"), None);
    }

    #[test]
    fn same_identity_shares_key() {
        // Case-insensitive identity: "Ann" and "ANN" are the same member.
        let identity: IdentityFn<String> = Rc::new(|s: &String| ItemId::Text(s.to_lowercase()));
        let mut mapper = KeyMapper::new(identity);
        let key = mapper.key(&"Ann".to_owned());
        assert_eq!(mapper.key(&"ANN".to_owned()), key);
        assert_eq!(mapper.get(&key).map(String::as_str), Some("ANN"));
    }

    #[test]
    fn refresh_replaces_instance() {
        let identity: IdentityFn<String> = Rc::new(|s: &String| ItemId::Text(s.to_lowercase()));
        let mut mapper = KeyMapper::new(identity);
        let key = mapper.key(&"bob".to_owned());
        mapper.refresh(&"BOB".to_owned());
        assert_eq!(mapper.get(&key).map(String::as_str), Some("BOB"));
        mapper.refresh(&"eve".to_owned());
        assert!(!mapper.has(&"eve".to_owned()));
    }

    #[test]
    fn remove_does_not_reuse_keys() {
        let mut mapper = KeyMapper::new(natural_identity::<i32>());
        let first = mapper.key(&1);
        assert_eq!(mapper.remove(&1), Some(first.clone()));
        assert_eq!(mapper.get(&first), None);
        assert_ne!(mapper.key(&1), first);
    }
}
