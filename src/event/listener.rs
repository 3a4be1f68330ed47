//! Listener registry: synchronous, insertion-ordered event listeners.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned when a listener is added; pass it back to remove it.
    pub struct Registration;
}

/// Listeners for one event type, fired in the order they were added.
pub struct ListenerRegistry<E> {
    listeners: SlotMap<Registration, Box<dyn FnMut(&E)>>,
    order: Vec<Registration>,
}

impl<E> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add a listener.
    pub fn add(&mut self, listener: impl FnMut(&E) + 'static) -> Registration {
        let registration = self.listeners.insert(Box::new(listener));
        self.order.push(registration);
        registration
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn remove(&mut self, registration: Registration) -> bool {
        if self.listeners.remove(registration).is_none() {
            return false;
        }
        self.order.retain(|&other| other != registration);
        true
    }

    /// Invoke every listener with `event`, directly and in order.
    pub fn fire(&mut self, event: &E) {
        for registration in &self.order {
            if let Some(listener) = self.listeners.get_mut(*registration) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.order.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn fires_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::<u32>::new();
        let first = Rc::clone(&log);
        registry.add(move |e| first.borrow_mut().push(("first", *e)));
        let second = Rc::clone(&log);
        registry.add(move |e| second.borrow_mut().push(("second", *e)));
        registry.fire(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = ListenerRegistry::<()>::new();
        let sink = Rc::clone(&count);
        let registration = registry.add(move |_| *sink.borrow_mut() += 1);
        registry.fire(&());
        assert!(registry.remove(registration));
        assert!(!registry.remove(registration));
        registry.fire(&());
        assert_eq!(*count.borrow(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn listeners_may_keep_state() {
        let total = Rc::new(RefCell::new(0));
        let mut registry = ListenerRegistry::<i32>::new();
        let sink = Rc::clone(&total);
        let mut calls = 0;
        registry.add(move |e| {
            calls += 1;
            *sink.borrow_mut() += e * calls;
        });
        registry.fire(&1);
        registry.fire(&1);
        assert_eq!(*total.borrow(), 3);
    }
}
