//! State shared by every component and its declarative attributes.

use serde_json::{json, Map, Value};

use crate::design::attribute::{read_attribute, read_into, write_attribute};
use crate::design::{DesignContext, ElementData};
use crate::error::DesignError;
use crate::value::{Resource, Size, Sizing};

/// Properties every component has.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonState {
    pub id: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub icon: Option<Resource>,
    pub style_names: Vec<String>,
    pub enabled: bool,
    pub visible: bool,
    pub read_only: bool,
    pub sizing: Sizing,
    default_sizing: Sizing,
}

impl CommonState {
    /// Defaults for a component that sizes to its content.
    pub fn new() -> Self {
        Self::with_default_sizing(Sizing::undefined())
    }

    /// Defaults for a component whose initial size is `sizing`.
    pub fn with_default_sizing(sizing: Sizing) -> Self {
        Self {
            id: None,
            caption: None,
            description: None,
            icon: None,
            style_names: Vec::new(),
            enabled: true,
            visible: true,
            read_only: false,
            sizing,
            default_sizing: sizing,
        }
    }

    /// Whether the client may interact with the component at all.
    pub fn accepts_input(&self) -> bool {
        self.enabled && self.visible
    }

    pub fn add_style_name(&mut self, style: &str) {
        for name in style.split_whitespace() {
            if !self.style_names.iter().any(|s| s == name) {
                self.style_names.push(name.to_owned());
            }
        }
    }

    pub fn remove_style_name(&mut self, style: &str) {
        for name in style.split_whitespace() {
            self.style_names.retain(|s| s != name);
        }
    }

    pub fn set_width(&mut self, width: Size) {
        self.sizing.width = width;
    }

    pub fn set_height(&mut self, height: Size) {
        self.sizing.height = height;
    }

    pub fn set_size_full(&mut self) {
        self.sizing = Sizing::full();
    }

    pub fn set_size_undefined(&mut self) {
        self.sizing = Sizing::undefined();
    }

    // ----- State -----

    /// State fields common to all components, in a stable order.
    pub fn to_state(&self) -> Map<String, Value> {
        let mut state = Map::new();
        state.insert("id".into(), json!(self.id));
        state.insert("caption".into(), json!(self.caption));
        state.insert("description".into(), json!(self.description));
        state.insert(
            "icon".into(),
            json!(self.icon.as_ref().map(ToString::to_string)),
        );
        state.insert("styles".into(), json!(self.style_names));
        state.insert("enabled".into(), json!(self.enabled));
        state.insert("visible".into(), json!(self.visible));
        state.insert("readOnly".into(), json!(self.read_only));
        state.insert("width".into(), json!(self.sizing.width.to_string()));
        state.insert("height".into(), json!(self.sizing.height.to_string()));
        state
    }

    // ----- Design -----

    /// Write the common attributes that differ from their defaults.
    pub fn write_design(&self, element: &mut ElementData, ctx: &DesignContext) {
        let defaults = Self::with_default_sizing(self.default_sizing);
        write_optional(element, "id", &self.id, ctx);
        write_optional(element, "caption", &self.caption, ctx);
        write_optional(element, "description", &self.description, ctx);
        if let Some(icon) = &self.icon {
            element.set_attr("icon", icon.to_string());
        }
        write_attribute(
            element,
            "style-name",
            &self.style_names.join(" "),
            &String::new(),
            ctx,
        );
        write_attribute(element, "enabled", &self.enabled, &defaults.enabled, ctx);
        write_attribute(element, "visible", &self.visible, &defaults.visible, ctx);
        write_attribute(element, "read-only", &self.read_only, &defaults.read_only, ctx);
        self.write_size(element, ctx);
    }

    /// Read the common attributes present on `element`.
    pub fn read_design(&mut self, element: &ElementData) -> Result<(), DesignError> {
        if let Some(id) = read_attribute::<String>(element, "id")? {
            self.id = Some(id);
        }
        if let Some(caption) = read_attribute::<String>(element, "caption")? {
            self.caption = Some(caption);
        }
        if let Some(description) = read_attribute::<String>(element, "description")? {
            self.description = Some(description);
        }
        if let Some(icon) = read_attribute::<Resource>(element, "icon")? {
            self.icon = Some(icon);
        }
        if let Some(styles) = read_attribute::<String>(element, "style-name")? {
            self.style_names.clear();
            self.add_style_name(&styles);
        }
        read_into(element, "enabled", &mut self.enabled)?;
        read_into(element, "visible", &mut self.visible)?;
        read_into(element, "read-only", &mut self.read_only)?;
        self.read_size(element)
    }

    fn write_size(&self, element: &mut ElementData, ctx: &DesignContext) {
        if self.sizing == self.default_sizing && !ctx.write_default_values {
            return;
        }
        let Sizing { width, height } = self.sizing;
        if width.is_full() && height.is_full() {
            element.set_attr("size-full", "");
        } else if width.is_undefined() && height.is_undefined() {
            element.set_attr("size-auto", "");
        } else {
            if width != self.default_sizing.width || ctx.write_default_values {
                write_dimension(element, "width", width);
            }
            if height != self.default_sizing.height || ctx.write_default_values {
                write_dimension(element, "height", height);
            }
        }
    }

    fn read_size(&mut self, element: &ElementData) -> Result<(), DesignError> {
        if element.has_attr("width-auto") || element.has_attr("size-auto") {
            self.sizing.width = Size::UNDEFINED;
        } else if element.has_attr("width-full") || element.has_attr("size-full") {
            self.sizing.width = Size::FULL;
        } else if let Some(width) = read_attribute::<Size>(element, "width")? {
            self.sizing.width = width;
        }

        if element.has_attr("height-auto") || element.has_attr("size-auto") {
            self.sizing.height = Size::UNDEFINED;
        } else if element.has_attr("height-full") || element.has_attr("size-full") {
            self.sizing.height = Size::FULL;
        } else if let Some(height) = read_attribute::<Size>(element, "height")? {
            self.sizing.height = height;
        }
        Ok(())
    }
}

impl Default for CommonState {
    fn default() -> Self {
        Self::new()
    }
}

fn write_optional(
    element: &mut ElementData,
    name: &str,
    value: &Option<String>,
    ctx: &DesignContext,
) {
    match value {
        Some(value) => element.set_attr(name, value.as_str()),
        None if ctx.write_default_values => element.set_attr(name, ""),
        None => {
            element.remove_attr(name);
        }
    }
}

fn write_dimension(element: &mut ElementData, name: &str, size: Size) {
    if size.is_full() {
        element.set_attr(format!("{name}-full"), "");
    } else if size.is_undefined() {
        element.set_attr(format!("{name}-auto"), "");
    } else {
        element.set_attr(name, size.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Unit;

    fn written(state: &CommonState) -> ElementData {
        let mut element = ElementData::new("vaadin-button");
        state.write_design(&mut element, &DesignContext::new());
        element
    }

    #[test]
    fn defaults_write_nothing() {
        assert!(written(&CommonState::new()).attributes.is_empty());
        let layout = CommonState::with_default_sizing(Sizing::full_width());
        assert!(written(&layout).attributes.is_empty());
    }

    #[test]
    fn non_defaults_are_written() {
        let mut state = CommonState::new();
        state.caption = Some("Save".into());
        state.enabled = false;
        state.add_style_name("primary  small");
        let element = written(&state);
        assert_eq!(element.attr("caption"), Some("Save"));
        assert_eq!(element.attr("enabled"), Some("false"));
        assert_eq!(element.attr("style-name"), Some("primary small"));
        assert!(!element.has_attr("visible"));
    }

    #[test]
    fn size_shorthands() {
        let mut state = CommonState::new();
        state.set_size_full();
        assert!(written(&state).has_attr("size-full"));

        let mut layout = CommonState::with_default_sizing(Sizing::full_width());
        layout.set_size_undefined();
        assert!(written(&layout).has_attr("size-auto"));

        let mut state = CommonState::new();
        state.set_width(Size::FULL);
        state.set_height(Size::pixels(200.0));
        let element = written(&state);
        assert!(element.has_attr("width-full"));
        assert_eq!(element.attr("height"), Some("200px"));
    }

    #[test]
    fn only_changed_dimension_is_written() {
        let mut layout = CommonState::with_default_sizing(Sizing::full_width());
        layout.set_height(Size::new(10.0, Unit::Em));
        let element = written(&layout);
        assert_eq!(element.attr("height"), Some("10em"));
        assert!(!element.has_attr("width-full"));
    }

    #[test]
    fn read_size_precedence() {
        let element = ElementData::new("x")
            .with_attr("size-full", "")
            .with_attr("height", "20px");
        let mut state = CommonState::new();
        state.read_design(&element).unwrap();
        assert!(state.sizing.is_full());

        let element = ElementData::new("x").with_attr("width", "12.5em");
        let mut state = CommonState::new();
        state.read_design(&element).unwrap();
        assert_eq!(state.sizing.width, Size::new(12.5, Unit::Em));
        assert!(state.sizing.height.is_undefined());
    }

    #[test]
    fn round_trip() {
        let mut state = CommonState::new();
        state.id = Some("main".into());
        state.description = Some("Tooltip".into());
        state.icon = Some(Resource::theme("img/a.png"));
        state.visible = false;
        state.read_only = true;
        state.set_width(Size::percent(50.0));
        let element = written(&state);
        let mut read = CommonState::new();
        read.read_design(&element).unwrap();
        assert_eq!(read, state);
    }

    #[test]
    fn state_snapshot() {
        let mut state = CommonState::new();
        state.caption = Some("Name".into());
        let snapshot = Value::Object(state.to_state());
        assert_eq!(snapshot["caption"], "Name");
        assert_eq!(snapshot["enabled"], true);
        assert_eq!(snapshot["width"], "");
    }

    #[test]
    fn accepts_input() {
        let mut state = CommonState::new();
        assert!(state.accepts_input());
        state.visible = false;
        assert!(!state.accepts_input());
    }
}
