//! ListSelect: a multi-select list box showing a fixed number of rows.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{
    unsupported, CommonState, Component, HasItems, HasSelection, HasValue, MultiSelection,
};
use crate::data::{DataChange, DataProvider, Item};
use crate::design::attribute::{read_attribute, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{ComponentError, DesignError, RpcError};
use crate::event::{MultiSelectionEvent, Registration, RpcCall, ValueChangeEvent};

const DEFAULT_ROWS: u32 = 10;

/// A list box. Design attribute `rows` (default 10, at least 1), plus
/// `option` children.
pub struct ListSelect<T: Item> {
    common: CommonState,
    selection: MultiSelection<T>,
    rows: u32,
}

impl<T: Item> ListSelect<T> {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            selection: MultiSelection::new(),
            rows: DEFAULT_ROWS,
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut select = Self::new();
        select.common.caption = Some(caption.into());
        select
    }

    pub fn selection(&self) -> &MultiSelection<T> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut MultiSelection<T> {
        &mut self.selection
    }

    pub fn add_selection_listener(
        &mut self,
        listener: impl FnMut(&MultiSelectionEvent<T>) + 'static,
    ) -> Registration {
        self.selection.add_selection_listener(listener)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of visible rows. Must be at least 1.
    pub fn set_rows(&mut self, rows: u32) -> Result<(), ComponentError> {
        if rows < 1 {
            return Err(ComponentError::illegal("rows", "must be at least 1"));
        }
        self.rows = rows;
        Ok(())
    }
}

impl<T: Item> Default for ListSelect<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> HasItems<T> for ListSelect<T> {
    fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.selection.set_data_provider(provider);
    }

    fn data_provider(&self) -> &dyn DataProvider<T> {
        self.selection.listing().data_provider()
    }
}

impl<T: Item> HasSelection<T> for ListSelect<T> {
    fn selected_items(&self) -> Vec<T> {
        self.selection.selected_items()
    }

    fn is_selected(&self, item: &T) -> bool {
        self.selection.is_selected(item)
    }

    fn select(&mut self, item: T) {
        self.selection.select(item);
    }

    fn deselect(&mut self, item: &T) {
        self.selection.deselect(item.clone());
    }

    fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }
}

impl<T: Item> HasValue for ListSelect<T> {
    type Value = Vec<T>;

    fn value(&self) -> Vec<T> {
        self.selection.selected_items()
    }

    fn set_value(&mut self, value: Vec<T>) {
        self.selection.set_selected_items(value, false);
    }

    fn empty_value(&self) -> Vec<T> {
        Vec::new()
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<Vec<T>>) + 'static,
    ) -> Registration {
        self.selection.add_value_change_listener(listener)
    }

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool {
        self.selection.remove_selection_listener(registration)
    }
}

impl<T: Item> Component for ListSelect<T> {
    fn tag_name(&self) -> &'static str {
        "list-select"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("selectedItemKeys".into(), json!(self.selection.selected_keys()));
        state.insert("rows".into(), json!(self.rows));
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        if self.common.read_only {
            tracing::debug!(method = call.method(), "selection on read-only list dropped");
            return Ok(());
        }
        if self.selection.handle_rpc(&call)? {
            Ok(())
        } else {
            Err(unsupported(self.tag_name(), &call))
        }
    }

    fn flush_data(&mut self) -> Option<DataChange> {
        self.selection.listing_mut().flush()
    }

    fn write_design(
        &self,
        design: &mut Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        if let Some(data) = design.get_mut(element) {
            self.common.write_design(data, ctx);
            write_attribute(data, "rows", &self.rows, &DEFAULT_ROWS, ctx);
        }
        self.selection.write_items(design, element, ctx);
        Ok(())
    }

    fn read_design(
        &mut self,
        design: &Design,
        element: ElementId,
        _ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        if let Some(data) = design.get(element) {
            self.common.read_design(data)?;
            if let Some(rows) = read_attribute::<u32>(data, "rows")? {
                self.set_rows(rows)?;
            }
        }
        self.selection.read_items(design, element)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
