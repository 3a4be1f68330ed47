//! ColorPicker: a color field with a popup of selection tabs.
//!
//! The popup has three tabs (RGB, HSV, swatches), a history strip and a text
//! field. At least one tab must stay visible: any change that would hide all
//! three fails and leaves the picker untouched.

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{unsupported, CommonState, Component, HasValue, ValueField};
use crate::design::attribute::{read_attribute, write_attribute};
use crate::design::{Design, DesignContext, DesignValue, ElementId};
use crate::error::{ComponentError, DesignError, RpcError};
use crate::event::{Registration, RpcCall, ValueChangeEvent};
use crate::value::{parse_color, Color};

// ---------------------------------------------------------------------------
// PopupStyle
// ---------------------------------------------------------------------------

/// Layout of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupStyle {
    /// Every tab, the history and the text field.
    #[default]
    Normal,
    /// Swatches only.
    Simple,
}

impl DesignValue for PopupStyle {
    fn to_design(&self) -> String {
        match self {
            PopupStyle::Normal => "normal",
            PopupStyle::Simple => "simple",
        }
        .to_owned()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        match text {
            "normal" => Ok(PopupStyle::Normal),
            "simple" => Ok(PopupStyle::Simple),
            other => Err(format!("unknown popup style '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Which parts of the popup are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupVisibility {
    pub rgb: bool,
    pub hsv: bool,
    pub swatches: bool,
    pub history: bool,
    pub textfield: bool,
}

impl PopupVisibility {
    pub const ALL: PopupVisibility = PopupVisibility {
        rgb: true,
        hsv: true,
        swatches: true,
        history: true,
        textfield: true,
    };

    pub const SIMPLE: PopupVisibility = PopupVisibility {
        rgb: false,
        hsv: false,
        swatches: true,
        history: false,
        textfield: false,
    };

    fn has_visible_tab(&self) -> bool {
        self.rgb || self.hsv || self.swatches
    }
}

impl Default for PopupVisibility {
    fn default() -> Self {
        Self::ALL
    }
}

// ---------------------------------------------------------------------------
// ColorPicker
// ---------------------------------------------------------------------------

/// A button that opens a color selection popup.
pub struct ColorPicker {
    common: CommonState,
    color: ValueField<Color>,
    popup_style: PopupStyle,
    visibility: PopupVisibility,
    popup_visible: bool,
}

impl ColorPicker {
    pub const DEFAULT_COLOR: Color = Color::WHITE;

    pub fn new() -> Self {
        Self::with_color(Self::DEFAULT_COLOR)
    }

    pub fn with_color(color: Color) -> Self {
        Self {
            common: CommonState::new(),
            color: ValueField::new(color),
            popup_style: PopupStyle::Normal,
            visibility: PopupVisibility::ALL,
            popup_visible: false,
        }
    }

    pub fn popup_style(&self) -> PopupStyle {
        self.popup_style
    }

    /// Switch the popup layout. Resets every visibility flag to the style's
    /// defaults.
    pub fn set_popup_style(&mut self, style: PopupStyle) {
        self.popup_style = style;
        self.visibility = match style {
            PopupStyle::Normal => PopupVisibility::ALL,
            PopupStyle::Simple => PopupVisibility::SIMPLE,
        };
    }

    pub fn visibility(&self) -> PopupVisibility {
        self.visibility
    }

    /// Apply `visibility` as a whole. Fails if no tab would remain visible.
    pub fn set_visibility(&mut self, visibility: PopupVisibility) -> Result<(), ComponentError> {
        if !visibility.has_visible_tab() {
            return Err(ComponentError::illegal(
                "tabVisibility",
                "cannot hide all tabs",
            ));
        }
        self.visibility = visibility;
        Ok(())
    }

    pub fn set_rgb_visibility(&mut self, visible: bool) -> Result<(), ComponentError> {
        self.set_visibility(PopupVisibility {
            rgb: visible,
            ..self.visibility
        })
    }

    pub fn set_hsv_visibility(&mut self, visible: bool) -> Result<(), ComponentError> {
        self.set_visibility(PopupVisibility {
            hsv: visible,
            ..self.visibility
        })
    }

    pub fn set_swatches_visibility(&mut self, visible: bool) -> Result<(), ComponentError> {
        self.set_visibility(PopupVisibility {
            swatches: visible,
            ..self.visibility
        })
    }

    pub fn set_history_visibility(&mut self, visible: bool) {
        self.visibility.history = visible;
    }

    pub fn set_textfield_visibility(&mut self, visible: bool) {
        self.visibility.textfield = visible;
    }

    pub fn is_popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn set_popup_visible(&mut self, visible: bool) {
        self.popup_visible = visible;
    }

    fn accepts_client_changes(&self) -> bool {
        self.common.accepts_input() && !self.common.read_only
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl HasValue for ColorPicker {
    type Value = Color;

    fn value(&self) -> Color {
        *self.color.get()
    }

    fn set_value(&mut self, value: Color) {
        self.color.set(value, false);
    }

    fn empty_value(&self) -> Color {
        Self::DEFAULT_COLOR
    }

    fn add_value_change_listener(
        &mut self,
        listener: impl FnMut(&ValueChangeEvent<Color>) + 'static,
    ) -> Registration {
        self.color.add_listener(listener)
    }

    fn remove_value_change_listener(&mut self, registration: Registration) -> bool {
        self.color.remove_listener(registration)
    }
}

impl Component for ColorPicker {
    fn tag_name(&self) -> &'static str {
        "color-picker"
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("color".into(), json!(self.color.get().to_css()));
        state.insert("popupStyle".into(), json!(self.popup_style.to_design()));
        state.insert("popupVisible".into(), json!(self.popup_visible));
        state.insert(
            "visibility".into(),
            json!({
                "rgb": self.visibility.rgb,
                "hsv": self.visibility.hsv,
                "swatches": self.visibility.swatches,
                "history": self.visibility.history,
                "textfield": self.visibility.textfield,
            }),
        );
        Value::Object(state)
    }

    fn handle_rpc(&mut self, call: RpcCall) -> Result<(), RpcError> {
        match call {
            RpcCall::ChangeColor { color } => {
                if !self.accepts_client_changes() {
                    tracing::debug!(color = %color, "change_color on inactive picker dropped");
                    return Ok(());
                }
                match parse_color(&color) {
                    Ok(parsed) => {
                        self.color.set(parsed, true);
                    }
                    Err(err) => tracing::debug!(color = %color, %err, "invalid color dropped"),
                }
                Ok(())
            }
            RpcCall::SetPopupVisible { visible } => {
                if visible && !self.accepts_client_changes() {
                    tracing::debug!("popup open on inactive picker dropped");
                    return Ok(());
                }
                self.popup_visible = visible;
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
        write_attribute(data, "color", self.color.get(), &Self::DEFAULT_COLOR, ctx);
        write_attribute(data, "popup-style", &self.popup_style, &PopupStyle::Normal, ctx);
        let defaults = match self.popup_style {
            PopupStyle::Normal => PopupVisibility::ALL,
            PopupStyle::Simple => PopupVisibility::SIMPLE,
        };
        let visible = self.visibility;
        write_attribute(data, "rgb-visibility", &visible.rgb, &defaults.rgb, ctx);
        write_attribute(data, "hsv-visibility", &visible.hsv, &defaults.hsv, ctx);
        write_attribute(data, "swatches-visibility", &visible.swatches, &defaults.swatches, ctx);
        write_attribute(data, "history-visibility", &visible.history, &defaults.history, ctx);
        write_attribute(data, "textfield-visibility", &visible.textfield, &defaults.textfield, ctx);
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
        if let Some(color) = read_attribute::<Color>(data, "color")? {
            self.color.set(color, false);
        }
        if let Some(style) = read_attribute::<PopupStyle>(data, "popup-style")? {
            self.set_popup_style(style);
        }
        let mut visibility = self.visibility;
        for (name, flag) in [
            ("rgb-visibility", &mut visibility.rgb),
            ("hsv-visibility", &mut visibility.hsv),
            ("swatches-visibility", &mut visibility.swatches),
            ("history-visibility", &mut visibility.history),
            ("textfield-visibility", &mut visibility.textfield),
        ] {
            if let Some(value) = read_attribute::<bool>(data, name)? {
                *flag = value;
            }
        }
        self.set_visibility(visibility)?;
        Ok(())
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

    use super::*;
    use crate::design::html::to_html;

    #[test]
    fn cannot_hide_all_tabs() {
        let mut picker = ColorPicker::new();
        picker.set_rgb_visibility(false).unwrap();
        picker.set_hsv_visibility(false).unwrap();
        let before = picker.visibility();
        let err = picker.set_swatches_visibility(false).unwrap_err();
        assert_eq!(err.to_string(), "illegal value for tabVisibility: cannot hide all tabs");
        assert_eq!(picker.visibility(), before);
        assert!(picker.visibility().swatches);
    }

    #[test]
    fn history_and_textfield_do_not_count_as_tabs() {
        let mut picker = ColorPicker::new();
        picker.set_popup_style(PopupStyle::Simple);
        picker.set_history_visibility(false);
        picker.set_textfield_visibility(false);
        assert!(picker.set_swatches_visibility(false).is_err());
        assert!(picker.set_rgb_visibility(true).is_ok());
        assert!(picker.set_swatches_visibility(false).is_ok());
    }

    #[test]
    fn simple_style_shows_swatches_only() {
        let mut picker = ColorPicker::new();
        picker.set_popup_style(PopupStyle::Simple);
        assert_eq!(picker.visibility(), PopupVisibility::SIMPLE);
        picker.set_popup_style(PopupStyle::Normal);
        assert_eq!(picker.visibility(), PopupVisibility::ALL);
    }

    #[test]
    fn rpc_change_color() {
        let mut picker = ColorPicker::new();
        picker
            .handle_rpc(RpcCall::ChangeColor {
                color: "#ff0000".into(),
            })
            .unwrap();
        assert_eq!(picker.value(), Color::RED);
        picker
            .handle_rpc(RpcCall::ChangeColor {
                color: "not a color".into(),
            })
            .unwrap();
        assert_eq!(picker.value(), Color::RED);
    }

    #[test]
    fn rpc_popup_visibility() {
        let mut picker = ColorPicker::new();
        picker
            .handle_rpc(RpcCall::SetPopupVisible { visible: true })
            .unwrap();
        assert!(picker.is_popup_visible());
        picker.common_mut().read_only = true;
        picker
            .handle_rpc(RpcCall::SetPopupVisible { visible: false })
            .unwrap();
        assert!(!picker.is_popup_visible());
        picker
            .handle_rpc(RpcCall::SetPopupVisible { visible: true })
            .unwrap();
        assert!(!picker.is_popup_visible());
    }

    #[test]
    fn design_markup() {
        let mut picker = ColorPicker::with_color(Color::rgb(0x12, 0x34, 0x56));
        picker.set_popup_style(PopupStyle::Simple);
        picker.set_history_visibility(true);
        let design = DesignContext::new().write_component(&picker).unwrap();
        insta::assert_snapshot!(to_html(&design, design.root().unwrap()), @r##"<vaadin-color-picker color="#123456" popup-style="simple" history-visibility></vaadin-color-picker>"##);
    }

    #[test]
    fn design_round_trip() {
        let mut picker = ColorPicker::with_color(Color::BLUE);
        picker.set_rgb_visibility(false).unwrap();
        picker.set_textfield_visibility(false);
        let mut ctx = DesignContext::new();
        let design = ctx.write_component(&picker).unwrap();
        let mut read = ColorPicker::new();
        read.read_design(&design, design.root().unwrap(), &mut ctx)
            .unwrap();
        assert_eq!(read.value(), Color::BLUE);
        assert_eq!(read.visibility(), picker.visibility());
    }

    #[test]
    fn design_hiding_all_tabs_fails() {
        let mut design = Design::new();
        let root = design.insert(
            crate::design::ElementData::new("vaadin-color-picker")
                .with_attr("popup-style", "simple")
                .with_attr("swatches-visibility", "false"),
        );
        let err = ColorPicker::new()
            .read_design(&design, root, &mut DesignContext::new())
            .unwrap_err();
        assert!(matches!(err, DesignError::Component(_)));
    }
}
