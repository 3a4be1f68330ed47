//! RadioButtonGroup: a single-select shown as a group of radio buttons.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{
    unsupported, CommonState, Component, HasItems, HasSelection, HasValue, SingleSelection,
};
use crate::data::{DataChange, DataProvider, Item};
use crate::design::attribute::{read_into, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{Registration, RpcCall, SingleSelectionEvent, ValueChangeEvent};

/// Radio buttons, one per item. Design attribute `html-content-allowed`
/// (default `false`), plus `option` children.
pub struct RadioButtonGroup<T: Item> {
    common: CommonState,
    selection: SingleSelection<T>,
    html_content_allowed: bool,
}

impl<T: Item> RadioButtonGroup<T> {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            selection: SingleSelection::new(),
            html_content_allowed: false,
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut group = Self::new();
        group.common.caption = Some(caption.into());
        group
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

    pub fn set_item_enabled_provider(&mut self, predicate: impl Fn(&T) -> bool + 'static) {
        self.selection
            .listing_mut()
            .set_item_enabled_provider(predicate);
    }

    pub fn is_html_content_allowed(&self) -> bool {
        self.html_content_allowed
    }

    /// Let item captions contain markup.
    pub fn set_html_content_allowed(&mut self, allowed: bool) {
        self.html_content_allowed = allowed;
    }
}

impl<T: Item> Default for RadioButtonGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> HasItems<T> for RadioButtonGroup<T> {
    fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.selection.set_data_provider(provider);
    }

    fn data_provider(&self) -> &dyn DataProvider<T> {
        self.selection.listing().data_provider()
    }
}

impl<T: Item> HasSelection<T> for RadioButtonGroup<T> {
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

impl<T: Item> HasValue for RadioButtonGroup<T> {
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

impl<T: Item> Component for RadioButtonGroup<T> {
    fn tag_name(&self) -> &'static str {
        "radio-button-group"
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
        state.insert("htmlContentAllowed".into(), json!(self.html_content_allowed));
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        if self.common.read_only {
            tracing::debug!(method = call.method(), "selection on read-only group dropped");
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
            write_attribute(data, "html-content-allowed", &self.html_content_allowed, &false, ctx);
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
            read_into(data, "html-content-allowed", &mut self.html_content_allowed)?;
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::design::html::to_html;

    fn answers() -> RadioButtonGroup<String> {
        let mut group = RadioButtonGroup::with_caption("Answer");
        group.set_items(["yes", "no", "maybe"].map(String::from));
        group
    }

    #[test]
    fn single_select_rpc_ignores_enabled_state() {
        let mut group = answers();
        group.set_item_enabled_provider(|answer| answer != "maybe");
        group.flush_data();
        group
            .handle_rpc(RpcCall::Select { key: "3".into() })
            .unwrap();
        assert_eq!(group.selected_item(), Some("maybe".to_owned()));
    }

    #[test]
    fn rows_carry_disabled_and_selected_flags() {
        let mut group = answers();
        group.set_item_enabled_provider(|answer| answer != "maybe");
        group.select("no".to_owned());
        let change = group.flush_data().unwrap();
        let rows: Vec<_> = change
            .rows()
            .iter()
            .map(|row| serde_json::to_value(row).unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                json!({ "k": "1", "v": "yes" }),
                json!({ "k": "2", "v": "no", "s": true }),
                json!({ "k": "3", "v": "maybe", "d": true }),
            ]
        );
    }

    #[test]
    fn design_markup() {
        let mut group = answers();
        group.set_html_content_allowed(true);
        group.select("yes".to_owned());
        let design = DesignContext::new().write_component(&group).unwrap();
        insta::assert_snapshot!(to_html(&design, design.root().unwrap()), @r#"
        <vaadin-radio-button-group caption="Answer" html-content-allowed>
          <option item="yes" selected>yes</option>
          <option item="no">no</option>
          <option item="maybe">maybe</option>
        </vaadin-radio-button-group>
        "#);
    }

    #[test]
    fn design_round_trip() {
        let mut group = answers();
        group.set_html_content_allowed(true);
        group.select("maybe".to_owned());
        let mut ctx = DesignContext::new();
        let design = ctx.write_component(&group).unwrap();
        let mut read = RadioButtonGroup::<String>::new();
        read.read_design(&design, design.root().unwrap(), &mut ctx)
            .unwrap();
        assert!(read.is_html_content_allowed());
        assert_eq!(read.value(), Some("maybe".to_owned()));
        assert_eq!(read.common().caption.as_deref(), Some("Answer"));
    }
}
