//! TextField: a single-line text field.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{unsupported, CommonState, Component, HasValue, ValueField};
use crate::design::attribute::{read_attribute, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{ComponentError, DesignError, RpcError};
use crate::event::{Registration, RpcCall, ValueChangeEvent};

/// Maximum length meaning "no limit".
pub const UNLIMITED: i32 = -1;

/// A single-line text input.
///
/// Design attributes: `value` (default empty), `placeholder` (default none)
/// and `max-length` (default `-1`).
pub struct TextField {
    common: CommonState,
    value: ValueField<String>,
    placeholder: Option<String>,
    max_length: i32,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            value: ValueField::new(String::new()),
            placeholder: None,
            max_length: UNLIMITED,
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut field = Self::new();
        field.common.caption = Some(caption.into());
        field
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub fn max_length(&self) -> i32 {
        self.max_length
    }

    /// Limit input to `max_length` characters; `-1` removes the limit.
    pub fn set_max_length(&mut self, max_length: i32) -> Result<(), ComponentError> {
        if max_length < UNLIMITED {
            return Err(ComponentError::illegal(
                "maxLength",
                format!("{max_length} is below -1"),
            ));
        }
        self.max_length = max_length;
        Ok(())
    }

    /// Characters of `text` that fit the current limit.
    fn truncated(&self, text: String) -> String {
        match usize::try_from(self.max_length) {
            Ok(limit) if text.chars().count() > limit => text.chars().take(limit).collect(),
            _ => text,
        }
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl HasValue for TextField {
    type Value = String;

    fn value(&self) -> String {
        self.value.get().clone()
    }

    fn set_value(&mut self, value: String) {
        self.value.set(value, false);
    }

    fn empty_value(&self) -> String {
        String::new()
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<String>) + 'static,
    ) -> Registration {
        self.value.add_listener(listener)
    }

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool {
        self.value.remove_listener(registration)
    }
}

impl Component for TextField {
    fn tag_name(&self) -> &'static str {
        "text-field"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("text".into(), json!(self.value.get()));
        state.insert("placeholder".into(), json!(self.placeholder));
        state.insert("maxLength".into(), json!(self.max_length));
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        match call {
            RpcCall::SetText { text } => {
                if !self.common.accepts_input() || self.common.read_only {
                    tracing::debug!("set_text on inactive text field dropped");
                    return Ok(());
                }
                let text = self.truncated(text);
                self.value.set(text, true);
                Ok(())
            }
            other => Err(unsupported(self.tag_name(), &other)),
        }
    }

    fn write_design(
        &self,
        design: &mut Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        if let Some(data) = design.get_mut(element) {
            self.common.write_design(data, ctx);
            write_attribute(data, "value", self.value.get(), &String::new(), ctx);
            if let Some(placeholder) = &self.placeholder {
                data.set_attr("placeholder", placeholder.as_str());
            }
            write_attribute(data, "max-length", &self.max_length, &UNLIMITED, ctx);
        }
        Ok(())
    }

    fn read_design(
        &mut self,
        design: &Design,
        element: ElementId,
        _ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        let Some(data) = design.get(element) else {
            return Ok(());
        };
        self.common.read_design(data)?;
        if let Some(max_length) = read_attribute::<i32>(data, "max-length")? {
            self.set_max_length(max_length)?;
        }
        if let Some(placeholder) = read_attribute::<String>(data, "placeholder")? {
            self.placeholder = Some(placeholder);
        }
        if let Some(value) = read_attribute::<String>(data, "value")? {
            self.value.set(value, false);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
