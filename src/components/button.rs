//! Button: a clickable component with a caption and optional icon.
//!
//! The caption is written as the element's text rather than an attribute.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{unsupported, CommonState, Component};
use crate::design::attribute::{read_attribute, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{DesignError, RpcError};
use crate::event::{ClickEvent, ListenerRegistry, Registration, RpcCall, Shortcut};
use crate::value::Resource;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A push button.
///
/// # Examples
///
/// ```
/// use trellis::components::Button;
///
/// let mut button = Button::with_caption("Save").disable_on_click(true);
/// button.click();
/// assert!(!button.is_enabled());
/// ```
pub struct Button {
    common: CommonState,
    disable_on_click: bool,
    click_shortcut: Option<Shortcut>,
    listeners: ListenerRegistry<ClickEvent>,
}

impl Button {
    pub fn new() -> Self {
        Self {
            common: CommonState::new(),
            disable_on_click: false,
            click_shortcut: None,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn with_caption(caption: impl Into<String>) -> Self {
        let mut button = Self::new();
        button.common.caption = Some(caption.into());
        button
    }

    /// Disable the button after each click (builder).
    pub fn disable_on_click(mut self, disable: bool) -> Self {
        self.disable_on_click = disable;
        self
    }

    /// Set the icon (builder).
    pub fn with_icon(mut self, icon: Resource) -> Self {
        self.common.icon = Some(icon);
        self
    }

    pub fn caption(&self) -> Option<&str> {
        self.common.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.common.caption = Some(caption.into());
    }

    pub fn is_enabled(&self) -> bool {
        self.common.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.common.enabled = enabled;
    }

    pub fn is_disable_on_click(&self) -> bool {
        self.disable_on_click
    }

    pub fn set_disable_on_click(&mut self, disable: bool) {
        self.disable_on_click = disable;
    }

    pub fn click_shortcut(&self) -> Option<Shortcut> {
        self.click_shortcut
    }

    pub fn set_click_shortcut(&mut self, shortcut: Option<Shortcut>) {
        self.click_shortcut = shortcut;
    }

    pub fn add_click_listener(&mut self, listener: impl FnMut(&ClickEvent) + 'static) -> Registration {
        self.listeners.add(listener)
    }

    pub fn remove_click_listener(&mut self, registration: Registration) -> bool {
        self.listeners.remove(registration)
    }

    /// Click from server code, as if the user had clicked.
    pub fn click(&mut self) -> bool {
        self.fire_click(false)
    }

    fn fire_click(&mut self, user_originated: bool) -> bool {
        if !self.common.accepts_input() {
            tracing::debug!(user_originated, "click on inactive button dropped");
            return false;
        }
        self.listeners.fire(&ClickEvent { user_originated });
        if self.disable_on_click {
            self.common.enabled = false;
        }
        true
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Button {
    fn tag_name(&self) -> &'static str {
        "button"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("disableOnClick".into(), json!(self.disable_on_click));
        state.insert(
            "clickShortcut".into(),
            json!(self.click_shortcut.map(|s| s.to_string())),
        );
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        match call {
            RpcCall::Click => {
                self.fire_click(true);
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
        let Some(data) = design.get_mut(element) else {
            return Ok(());
        };
        self.common.write_design(data, ctx);
        data.remove_attr("caption");
        if let Some(caption) = &self.common.caption {
            data.set_text(caption.as_str());
        }
        write_attribute(data, "disable-on-click", &self.disable_on_click, &false, ctx);
        if let Some(shortcut) = &self.click_shortcut {
            data.set_attr("click-shortcut", shortcut.to_string());
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
        if let Some(text) = &data.text {
            self.common.caption = Some(text.clone());
        }
        if let Some(disable) = read_attribute::<bool>(data, "disable-on-click")? {
            self.disable_on_click = disable;
        }
        self.click_shortcut = read_attribute::<Shortcut>(data, "click-shortcut")?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
