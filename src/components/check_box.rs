//! CheckBox: a boolean field.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{unsupported, CommonState, Component, HasValue, ValueField};
use crate::design::attribute::{read_attribute, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{Registration, RpcCall, ValueChangeEvent};

/// A two-state check box. Design attribute `checked`, default `false`.
pub struct CheckBox {
    common: CommonState,
    value: ValueField<bool>,
}

impl CheckBox {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            value: ValueField::new(false),
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut check_box = Self::new();
        check_box.common.caption = Some(caption.into());
        check_box
    }
}

impl Default for CheckBox {
    fn default() -> Self {
        Self::new()
    }
}

impl HasValue for CheckBox {
    type Value = bool;

    fn value(&self) -> bool {
        *self.value.get()
    }

    fn set_value(&mut self, value: bool) {
        self.value.set(value, false);
    }

    fn empty_value(&self) -> bool {
        false
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<bool>) + 'static,
    ) -> Registration {
        self.value.add_listener(listener)
    }

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool {
        self.value.remove_listener(registration)
    }
}

impl Component for CheckBox {
    fn tag_name(&self) -> &'static str {
        "check-box"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("checked".into(), json!(self.value()));
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        match call {
            RpcCall::SetChecked { checked } => {
                if !self.common.accepts_input() || self.common.read_only {
                    tracing::debug!(checked, "set_checked on inactive check box dropped");
                    return Ok(());
                }
                self.value.set(checked, true);
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
            write_attribute(data, "checked", &self.value(), &false, ctx);
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
        if let Some(checked) = read_attribute::<bool>(data, "checked")? {
            self.value.set(checked, false);
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
