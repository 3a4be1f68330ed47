//! A value with change listeners, embedded by every [`HasValue`] component.
//!
//! [`HasValue`]: super::HasValue

use crate::event::{ListenerRegistry, Registration, ValueChangeEvent};

/// Holds one value and notifies listeners when it changes.
pub struct ValueField<V> {
    value: V,
    listeners: ListenerRegistry<ValueChangeEvent<V>>,
}

impl<V: Clone + PartialEq> ValueField<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    /// Store `value`. Listeners run only when it differs from the current one.
    pub fn set(&mut self, value: V, user_originated: bool) -> bool {
        if value == self.value {
            return false;
        }
        let old_value = std::mem::replace(&mut self.value, value);
        self.listeners.fire(&ValueChangeEvent {
            old_value,
            value: self.value.clone(),
            user_originated,
        });
        true
    }

    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<V>) + 'static,
    ) -> Registration {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, registration: Registration) -> bool {
        self.listeners.remove(registration)
    }
}

impl<V: Clone + PartialEq + Default> Default for ValueField<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}
