//! Design context: per-pass settings, id bookkeeping and the component factory.

use std::collections::HashMap;

use super::attribute::class_to_tag_name;
use super::node::{ElementData, ElementId};
use super::tree::Design;
use crate::component::Component;
use crate::components::{
    Button, CheckBox, CheckBoxGroup, ColorPicker, ComboBox, ListSelect, NativeSelect,
    OrderedLayout, RadioButtonGroup, TextField,
};
use crate::error::DesignError;
use crate::session::SessionConfig;

/// Attribute holding a design-local id. Never forwarded to the component.
pub const LOCAL_ID_ATTRIBUTE: &str = "_id";

/// Builds a fresh, default component.
pub type ComponentConstructor = fn() -> Box<dyn Component>;

// ----- ComponentFactory -----

/// Maps unprefixed tag names (`check-box-group`) to component constructors.
pub struct ComponentFactory {
    constructors: HashMap<String, ComponentConstructor>,
}

impl ComponentFactory {
    /// An empty factory.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory that knows every built-in component. Listing components are
    /// registered with `String` items.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register("Button", || Box::new(Button::new()));
        factory.register("CheckBox", || Box::new(CheckBox::new()));
        factory.register("TextField", || Box::new(TextField::new()));
        factory.register("ColorPicker", || Box::new(ColorPicker::new()));
        factory.register("ComboBox", || Box::new(ComboBox::<String>::new()));
        factory.register("NativeSelect", || Box::new(NativeSelect::<String>::new()));
        factory.register("RadioButtonGroup", || {
            Box::new(RadioButtonGroup::<String>::new())
        });
        factory.register("CheckBoxGroup", || Box::new(CheckBoxGroup::<String>::new()));
        factory.register("ListSelect", || Box::new(ListSelect::<String>::new()));
        factory.register("VerticalLayout", || Box::new(OrderedLayout::vertical()));
        factory.register("HorizontalLayout", || Box::new(OrderedLayout::horizontal()));
        factory
    }

    /// Register a constructor under the tag derived from `type_name`.
    pub fn register(&mut self, type_name: &str, constructor: ComponentConstructor) {
        self.constructors
            .insert(class_to_tag_name(type_name), constructor);
    }

    /// Build the component registered for an unprefixed tag.
    pub fn create(&self, tag: &str) -> Option<Box<dyn Component>> {
        self.constructors.get(tag).map(|constructor| constructor())
    }

    /// Whether a constructor is registered for an unprefixed tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ----- DesignContext -----

/// State for one design read or write pass.
pub struct DesignContext {
    /// Write attributes even when they equal the default.
    pub write_default_values: bool,
    /// Let listing components write their items.
    pub write_data: bool,
    prefix: String,
    factory: ComponentFactory,
    ids: HashMap<String, ElementId>,
    local_ids: HashMap<String, ElementId>,
    captions: HashMap<String, ElementId>,
}

impl DesignContext {
    /// A context with default settings and the built-in components.
    pub fn new() -> Self {
        Self::from_config(&SessionConfig::default())
    }

    /// A context following the session's design settings.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            write_default_values: config.write_default_values,
            write_data: config.write_data,
            prefix: config.tag_prefix.clone(),
            factory: ComponentFactory::with_defaults(),
            ids: HashMap::new(),
            local_ids: HashMap::new(),
            captions: HashMap::new(),
        }
    }

    /// Replace the component factory (builder).
    pub fn with_factory(mut self, factory: ComponentFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn factory_mut(&mut self) -> &mut ComponentFactory {
        &mut self.factory
    }

    /// Full tag for a component, e.g. `vaadin-check-box`.
    pub fn tag_for(&self, component: &dyn Component) -> String {
        format!("{}-{}", self.prefix, component.tag_name())
    }

    /// Element that carried the global `id`, if read in this pass.
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.ids.get(id).copied()
    }

    /// Element that carried the local `_id`, if read in this pass.
    pub fn element_by_local_id(&self, local_id: &str) -> Option<ElementId> {
        self.local_ids.get(local_id).copied()
    }

    /// First element read with this caption.
    pub fn element_by_caption(&self, caption: &str) -> Option<ElementId> {
        self.captions.get(caption).copied()
    }

    // ----- Reading -----

    /// Instantiate and read the component described by `element`.
    pub fn read_component(
        &mut self,
        design: &Design,
        element: ElementId,
    ) -> Result<Box<dyn Component>, DesignError> {
        let data = design
            .get(element)
            .ok_or_else(|| DesignError::UnknownTag(format!("{element:?}")))?;
        let mut component = self.create(&data.tag)?;
        self.register_ids(data, element)?;
        component.read_design(design, element, self)?;
        tracing::trace!(tag = %data.tag, "read component from design");
        Ok(component)
    }

    /// Read the root element of `design`.
    pub fn read_root(&mut self, design: &Design) -> Result<Box<dyn Component>, DesignError> {
        let root = design
            .root()
            .ok_or_else(|| DesignError::UnknownTag(String::new()))?;
        self.read_component(design, root)
    }

    fn create(&self, tag: &str) -> Result<Box<dyn Component>, DesignError> {
        let unprefixed = tag
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| DesignError::MissingPrefix(tag.to_owned()))?;
        self.factory
            .create(unprefixed)
            .ok_or_else(|| DesignError::UnknownTag(tag.to_owned()))
    }

    fn register_ids(&mut self, data: &ElementData, element: ElementId) -> Result<(), DesignError> {
        if let Some(id) = data.attr("id") {
            if self.ids.insert(id.to_owned(), element).is_some() {
                return Err(DesignError::DuplicateId(id.to_owned()));
            }
        }
        if let Some(local_id) = data.attr(LOCAL_ID_ATTRIBUTE) {
            if self.local_ids.insert(local_id.to_owned(), element).is_some() {
                return Err(DesignError::DuplicateLocalId(local_id.to_owned()));
            }
        }
        if let Some(caption) = data.attr("caption") {
            self.captions.entry(caption.to_owned()).or_insert(element);
        }
        Ok(())
    }

    // ----- Writing -----

    /// Write `component` into a new design rooted at its element.
    pub fn write_component(&mut self, component: &dyn Component) -> Result<Design, DesignError> {
        let mut design = Design::new();
        let root = design.insert(ElementData::new(self.tag_for(component)));
        component.write_design(&mut design, root, self)?;
        Ok(design)
    }

    /// Append `component` as a child element of `parent`.
    pub fn write_child(
        &mut self,
        design: &mut Design,
        parent: ElementId,
        component: &dyn Component,
    ) -> Result<ElementId, DesignError> {
        let element = design.insert_child(parent, ElementData::new(self.tag_for(component)));
        component.write_design(design, element, self)?;
        Ok(element)
    }
}

impl Default for DesignContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Button, CheckBox};
    use crate::component::HasValue;

    #[test]
    fn factory_uses_kebab_tags() {
        let factory = ComponentFactory::with_defaults();
        assert!(factory.contains("check-box-group"));
        assert!(factory.contains("vertical-layout"));
        assert!(!factory.contains("CheckBoxGroup"));
        let button = factory.create("button").unwrap();
        assert_eq!(button.tag_name(), "button");
    }

    #[test]
    fn missing_prefix() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("check-box"));
        let err = DesignContext::new().read_component(&design, root).err().unwrap();
        assert_eq!(err, DesignError::MissingPrefix("check-box".into()));
    }

    #[test]
    fn unknown_tag() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-rich-text-area"));
        let err = DesignContext::new().read_component(&design, root).err().unwrap();
        assert_eq!(err, DesignError::UnknownTag("vaadin-rich-text-area".into()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-vertical-layout"));
        design.insert_child(root, ElementData::new("vaadin-button").with_attr("id", "ok"));
        design.insert_child(root, ElementData::new("vaadin-button").with_attr("id", "ok"));
        let err = DesignContext::new().read_component(&design, root).err().unwrap();
        assert_eq!(err, DesignError::DuplicateId("ok".into()));
    }

    #[test]
    fn duplicate_local_ids_are_rejected() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-horizontal-layout"));
        design.insert_child(root, ElementData::new("vaadin-button").with_attr("_id", "save"));
        design.insert_child(root, ElementData::new("vaadin-check-box").with_attr("_id", "save"));
        let err = DesignContext::new().read_component(&design, root).err().unwrap();
        assert_eq!(err, DesignError::DuplicateLocalId("save".into()));
    }

    #[test]
    fn ids_and_captions_are_indexed() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-vertical-layout"));
        let save = design.insert_child(
            root,
            ElementData::new("vaadin-button")
                .with_attr("_id", "save")
                .with_attr("caption", "Save"),
        );
        let mut ctx = DesignContext::new();
        ctx.read_component(&design, root).unwrap();
        assert_eq!(ctx.element_by_local_id("save"), Some(save));
        assert_eq!(ctx.element_by_caption("Save"), Some(save));
        assert_eq!(ctx.element_by_id("save"), None);
    }

    #[test]
    fn custom_prefix() {
        let config = SessionConfig::new().with_tag_prefix("acme");
        let mut ctx = DesignContext::from_config(&config);
        let design = ctx.write_component(&Button::with_caption("Go")).unwrap();
        let root = design.root().unwrap();
        assert_eq!(design.get(root).unwrap().tag, "acme-button");
        assert!(ctx.read_component(&design, root).is_ok());
    }

    #[test]
    fn write_then_read_check_box() {
        let mut check_box = CheckBox::new();
        check_box.set_value(true);
        let mut ctx = DesignContext::new();
        let design = ctx.write_component(&check_box).unwrap();
        let read = DesignContext::new().read_root(&design).unwrap();
        let read = read.as_any().downcast_ref::<CheckBox>().unwrap();
        assert!(read.value());
    }
}
