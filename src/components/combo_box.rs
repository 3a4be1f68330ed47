//! ComboBox: a filterable single-select drop-down.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{
    unsupported, CommonState, Component, HasItems, HasSelection, HasValue, SingleSelection,
};
use crate::data::{DataChange, DataProvider, Item};
use crate::design::attribute::{read_attribute, read_into, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{Registration, RpcCall, SingleSelectionEvent, ValueChangeEvent};

const DEFAULT_PAGE_LENGTH: u32 = 10;

/// A drop-down list with a text input for filtering.
///
/// Design attributes: `placeholder`, `empty-selection-allowed` (default
/// `true`), `empty-selection-caption` (default empty), `text-input-allowed`
/// (default `true`), `page-length` (default 10), plus `option` children.
pub struct ComboBox<T: Item> {
    common: CommonState,
    selection: SingleSelection<T>,
    placeholder: Option<String>,
    empty_selection_allowed: bool,
    empty_selection_caption: String,
    text_input_allowed: bool,
    page_length: u32,
}

impl<T: Item> ComboBox<T> {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            selection: SingleSelection::new(),
            placeholder: None,
            empty_selection_allowed: true,
            empty_selection_caption: String::new(),
            text_input_allowed: true,
            page_length: DEFAULT_PAGE_LENGTH,
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut combo_box = Self::new();
        combo_box.common.caption = Some(caption.into());
        combo_box
    }

    pub fn selection(&self) -> &SingleSelection<T> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SingleSelection<T> {
        &mut self.selection
    }

    pub fn selected_item(&self) -> Option<T> {
        self.selection.selected_item()
    }

    pub fn set_selected_item(&mut self, item: Option<T>) {
        self.selection.set_selected_item(item);
    }

    pub fn add_selection_listener(
        &mut self,
        listener: impl FnMut(&SingleSelectionEvent<T>) + 'static,
    ) -> Registration {
        self.selection.add_selection_listener(listener)
    }

    pub fn set_item_caption_generator(&mut self, generator: impl Fn(&T) -> String + 'static) {
        self.selection
            .listing_mut()
            .set_item_caption_generator(generator);
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub fn is_empty_selection_allowed(&self) -> bool {
        self.empty_selection_allowed
    }

    pub fn set_empty_selection_allowed(&mut self, allowed: bool) {
        self.empty_selection_allowed = allowed;
    }

    pub fn empty_selection_caption(&self) -> &str {
        &self.empty_selection_caption
    }

    pub fn set_empty_selection_caption(&mut self, caption: impl Into<String>) {
        self.empty_selection_caption = caption.into();
    }

    pub fn is_text_input_allowed(&self) -> bool {
        self.text_input_allowed
    }

    pub fn set_text_input_allowed(&mut self, allowed: bool) {
        self.text_input_allowed = allowed;
    }

    pub fn page_length(&self) -> u32 {
        self.page_length
    }

    /// Items per popup page; `0` shows every item.
    pub fn set_page_length(&mut self, page_length: u32) {
        self.page_length = page_length;
    }
}

impl<T: Item> Default for ComboBox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> HasItems<T> for ComboBox<T> {
    fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.selection.set_data_provider(provider);
    }

    fn data_provider(&self) -> &dyn DataProvider<T> {
        self.selection.listing().data_provider()
    }
}

impl<T: Item> HasSelection<T> for ComboBox<T> {
    fn selected_items(&self) -> Vec<T> {
        self.selection.selected_item().into_iter().collect()
    }

    fn is_selected(&self, item: &T) -> bool {
        self.selection.is_selected(item)
    }

    fn select(&mut self, item: T) {
        self.selection.set_selected_item(Some(item));
    }

    fn deselect(&mut self, item: &T) {
        self.selection.deselect(item);
    }

    fn deselect_all(&mut self) {
        self.selection.set_selected_item(None);
    }
}

impl<T: Item> HasValue for ComboBox<T> {
    type Value = Option<T>;

    fn value(&self) -> Option<T> {
        self.selection.selected_item()
    }

    fn set_value(&mut self, value: Option<T>) {
        self.selection.set_selected_item(value);
    }

    fn empty_value(&self) -> Option<T> {
        None
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<Option<T>>) + 'static,
    ) -> Registration {
        self.selection.add_value_change_listener(listener)
    }

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool {
        self.selection.remove_selection_listener(registration)
    }
}

impl<T: Item> Component for ComboBox<T> {
    fn tag_name(&self) -> &'static str {
        "combo-box"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("selectedItemKey".into(), json!(self.selection.selected_key()));
        state.insert("placeholder".into(), json!(self.placeholder));
        state.insert("emptySelectionAllowed".into(), json!(self.empty_selection_allowed));
        state.insert("emptySelectionCaption".into(), json!(self.empty_selection_caption));
        state.insert("textInputAllowed".into(), json!(self.text_input_allowed));
        state.insert("pageLength".into(), json!(self.page_length));
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        if self.common.read_only {
            tracing::debug!(method = call.method(), "selection on read-only combo box dropped");
            return Ok(());
        }
        if matches!(call, RpcCall::Deselect { .. }) && !self.empty_selection_allowed {
            tracing::debug!("empty selection not allowed");
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
            if let Some(placeholder) = &self.placeholder {
                data.set_attr("placeholder", placeholder.as_str());
            }
            write_attribute(data, "empty-selection-allowed", &self.empty_selection_allowed, &true, ctx);
            write_attribute(
                data,
                "empty-selection-caption",
                &self.empty_selection_caption,
                &String::new(),
                ctx,
            );
            write_attribute(data, "text-input-allowed", &self.text_input_allowed, &true, ctx);
            write_attribute(data, "page-length", &self.page_length, &DEFAULT_PAGE_LENGTH, ctx);
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
            if let Some(placeholder) = read_attribute::<String>(data, "placeholder")? {
                self.placeholder = Some(placeholder);
            }
            read_into(data, "empty-selection-allowed", &mut self.empty_selection_allowed)?;
            read_into(data, "empty-selection-caption", &mut self.empty_selection_caption)?;
            read_into(data, "text-input-allowed", &mut self.text_input_allowed)?;
            read_into(data, "page-length", &mut self.page_length)?;
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
