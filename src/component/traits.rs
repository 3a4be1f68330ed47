//! Component trait and the capability traits that replace a class hierarchy.
//!
//! [`Component`] is object-safe: the session stores `Box<dyn Component>` and
//! reaches concrete types through `as_any`. Capabilities that need generics or
//! `impl Trait` arguments live on separate traits ([`HasValue`], [`HasItems`],
//! [`HasSelection`]) implemented by the concrete structs.

use std::any::Any;

use serde_json::Value;

use super::common::CommonState;
use crate::data::{DataChange, DataProvider, Identifiable, Item, ListDataProvider};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{Registration, RpcCall, ValueChangeEvent};

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Core trait implemented by every server-side component.
pub trait Component: Any {
    /// Unprefixed design tag, e.g. `"check-box-group"`.
    fn tag_name(&self) -> &'static str;

    /// Properties every component has.
    fn common(&self) -> &CommonState;

    fn common_mut(&mut self) -> &mut CommonState;

    /// Snapshot of the client-visible state as a JSON object.
    fn state(&self) -> Value;

    /// Handle one call from the client.
    ///
    /// Calls the component does not understand fail with
    /// [`RpcError::Unsupported`]. Stale input (unknown keys) is not an error.
    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        Err(unsupported(self.tag_name(), &call))
    }

    /// Pending item payload, for components that list items.
    fn flush_data(&mut self) -> Option<DataChange> {
        None
    }

    /// Write this component's attributes (and children) into `element`.
    fn write_design(
        &self,
        design: &mut Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError>;

    /// Read attributes (and children) of `element` into this component.
    fn read_design(
        &mut self,
        design: &Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError>;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The error for a call a component does not accept. Logged at `warn`.
pub fn unsupported(tag: &str, call: &RpcCall) -> RpcError {
    tracing::warn!(component = tag, method = call.method(), "unsupported rpc call");
    RpcError::Unsupported {
        component: tag.to_owned(),
        method: call.method().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// HasValue
// ---------------------------------------------------------------------------

/// A component holding a single value the user can edit.
pub trait HasValue {
    type Value: Clone + PartialEq;

    fn value(&self) -> Self::Value;

    /// Set the value from server code. Fires a value change event with
    /// `user_originated == false` if the value changed.
    fn set_value(&mut self, value: Self::Value);

    /// The value representing "nothing entered".
    fn empty_value(&self) -> Self::Value;

    fn is_empty(&self) -> bool {
        self.value() == self.empty_value()
    }

    fn clear(&mut self) {
        let empty = self.empty_value();
        self.set_value(empty);
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<Self::Value>) + 'static,
    ) -> Registration;

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool;
}

// ---------------------------------------------------------------------------
// HasItems
// ---------------------------------------------------------------------------

/// A component that shows items from a [`DataProvider`].
pub trait HasItems<T: Item> {
    fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static);

    fn data_provider(&self) -> &dyn DataProvider<T>;

    /// Show a fixed list of items identified by their natural identity.
    fn set_items(&mut self, items: impl IntoIterator<Item = T>)
    where
        T: Identifiable,
    {
        self.set_data_provider(ListDataProvider::new(items));
    }

    /// Every item the provider currently returns.
    fn data_provider_items(&self) -> Vec<T> {
        self.data_provider().fetch()
    }
}

// ---------------------------------------------------------------------------
// HasSelection
// ---------------------------------------------------------------------------

/// A component whose items can be selected.
///
/// All methods are server-side calls: events they fire carry
/// `user_originated == false`.
pub trait HasSelection<T: Item> {
    /// Selected items in selection order.
    fn selected_items(&self) -> Vec<T>;

    /// Whether an item with the same identity as `item` is selected.
    fn is_selected(&self, item: &T) -> bool;

    fn select(&mut self, item: T);

    fn deselect(&mut self, item: &T);

    fn deselect_all(&mut self);

    fn first_selected_item(&self) -> Option<T> {
        self.selected_items().into_iter().next()
    }
}
