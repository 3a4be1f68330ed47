//! Listing core shared by every component that shows items.
//!
//! A [`Listing`] owns the [`DataCommunicator`], the item presentation and the
//! hooks that turn items into markup and back. Selection cores embed one.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::presentation::{ItemCaption, ItemEnabled, ItemIcon, Presentation, PresentationGenerator};
use crate::data::{
    display_identity, DataChange, DataCommunicator, DataGenerator, DataProvider, GeneratorId,
    Item, ItemId, ListDataProvider,
};
use crate::design::attribute::read_attribute;
use crate::design::{Design, DesignContext, ElementData, ElementId};
use crate::error::DesignError;
use crate::value::Resource;

/// Tag of item child elements.
pub const ITEM_TAG: &str = "option";

/// Turns an item into its `item` attribute.
pub type ItemToDesign<T> = Rc<dyn Fn(&T) -> String>;

/// Parses an `item` attribute back into an item.
pub type ItemFromDesign<T> = Rc<dyn Fn(&str) -> Result<T, DesignError>>;

/// A selected item together with its identity at selection time.
#[derive(Debug, Clone)]
pub(crate) struct Selected<T> {
    pub(crate) id: ItemId,
    pub(crate) item: T,
}

/// Data, presentation and design hooks of one listing component.
pub struct Listing<T: Item> {
    communicator: DataCommunicator<T>,
    presentation: Rc<RefCell<Presentation<T>>>,
    item_to_design: ItemToDesign<T>,
    item_from_design: ItemFromDesign<T>,
}

impl<T: Item> Listing<T> {
    /// A listing with no items.
    pub fn new() -> Self {
        Self::with_provider(ListDataProvider::with_identity(
            Vec::new(),
            display_identity::<T>(),
        ))
    }

    pub fn with_provider(provider: impl DataProvider<T> + 'static) -> Self {
        let presentation = Rc::new(RefCell::new(Presentation::new()));
        let mut communicator = DataCommunicator::new(provider);
        communicator.add_generator(Rc::new(PresentationGenerator(Rc::clone(&presentation))));
        Self {
            communicator,
            presentation,
            item_to_design: Rc::new(|item: &T| item.to_string()),
            item_from_design: Rc::new(string_from_design::<T>),
        }
    }

    // ----- Data -----

    pub fn communicator(&self) -> &DataCommunicator<T> {
        &self.communicator
    }

    pub fn communicator_mut(&mut self) -> &mut DataCommunicator<T> {
        &mut self.communicator
    }

    pub fn data_provider(&self) -> &dyn DataProvider<T> {
        self.communicator.data_provider()
    }

    pub fn set_data_provider(&mut self, provider: impl DataProvider<T> + 'static) {
        self.communicator.set_data_provider(provider);
    }

    /// Identity of `item` under the current provider.
    pub fn id(&self, item: &T) -> ItemId {
        self.communicator.id(item)
    }

    /// Resolve a client key to the item it was issued for.
    pub fn item_for_key(&self, key: &str) -> Option<T> {
        self.communicator.key_mapper().get(key).cloned()
    }

    pub fn add_data_generator(&mut self, generator: Rc<dyn DataGenerator<T>>) -> GeneratorId {
        self.communicator.add_generator(generator)
    }

    pub fn remove_data_generator(&mut self, id: GeneratorId) -> bool {
        self.communicator.remove_generator(id)
    }

    pub fn flush(&mut self) -> Option<DataChange> {
        self.communicator.flush()
    }

    // ----- Presentation -----

    pub fn set_item_caption_generator(&mut self, generator: impl Fn(&T) -> String + 'static) {
        self.set_item_caption(ItemCaption::Generator(Rc::new(generator)));
    }

    pub fn set_item_icon_generator(
        &mut self,
        generator: impl Fn(&T) -> Option<Resource> + 'static,
    ) {
        self.set_item_icon(ItemIcon::Generator(Rc::new(generator)));
    }

    pub fn set_item_enabled_provider(&mut self, predicate: impl Fn(&T) -> bool + 'static) {
        self.set_item_enabled(ItemEnabled::Predicate(Rc::new(predicate)));
    }

    /// Replace the caption source. Every pending row is invalidated.
    pub fn set_item_caption(&mut self, caption: ItemCaption<T>) {
        self.presentation.borrow_mut().caption = caption;
        self.communicator.reset();
    }

    /// Replace the icon source. Every pending row is invalidated.
    pub fn set_item_icon(&mut self, icon: ItemIcon<T>) {
        self.presentation.borrow_mut().icon = icon;
        self.communicator.reset();
    }

    /// Replace the enabled predicate. Every pending row is invalidated.
    pub fn set_item_enabled(&mut self, enabled: ItemEnabled<T>) {
        self.presentation.borrow_mut().enabled = enabled;
        self.communicator.reset();
    }

    pub fn item_caption(&self, item: &T) -> String {
        self.presentation.borrow().caption(item, &self.id(item))
    }

    pub fn item_icon(&self, item: &T) -> Option<Resource> {
        self.presentation.borrow().icon(item, &self.id(item))
    }

    pub fn is_item_enabled(&self, item: &T) -> bool {
        self.presentation.borrow().is_enabled(item)
    }

    // ----- Design hooks -----

    /// Replace how items are written to and read from the `item` attribute.
    pub fn set_item_design_hooks(
        &mut self,
        to_design: impl Fn(&T) -> String + 'static,
        from_design: impl Fn(&str) -> Result<T, DesignError> + 'static,
    ) {
        self.item_to_design = Rc::new(to_design);
        self.item_from_design = Rc::new(from_design);
    }

    /// Append one `option` child per item to `element`.
    ///
    /// Does nothing when the context says not to write data.
    pub fn write_items(
        &self,
        design: &mut Design,
        element: ElementId,
        ctx: &DesignContext,
        is_selected: impl Fn(&T) -> bool,
    ) {
        if !ctx.write_data {
            return;
        }
        for item in self.data_provider().fetch() {
            let mut child = ElementData::new(ITEM_TAG)
                .with_attr("item", (self.item_to_design)(&item))
                .with_text(self.item_caption(&item));
            if let Some(icon) = self.item_icon(&item) {
                child.set_attr("icon", icon.to_string());
            }
            if is_selected(&item) {
                child.set_attr("selected", "");
            }
            design.insert_child(element, child);
        }
    }

    /// Read `option` children of `element` into a new item list.
    ///
    /// Captions and icons found in markup replace the presentation with
    /// declarative sources. Returns the items marked `selected`, in document
    /// order, for the caller to apply. Without option children nothing changes.
    pub fn read_items(
        &mut self,
        design: &Design,
        element: ElementId,
    ) -> Result<Vec<T>, DesignError> {
        {
            let presentation = self.presentation.borrow();
            if matches!(presentation.caption, ItemCaption::Generator(_)) {
                return Err(DesignError::UnsupportedPresentation(
                    "a custom item caption generator".into(),
                ));
            }
            if matches!(presentation.icon, ItemIcon::Generator(_)) {
                return Err(DesignError::UnsupportedPresentation(
                    "a custom item icon generator".into(),
                ));
            }
        }

        let identity = self.data_provider().identity();
        let mut items = Vec::new();
        let mut captions = HashMap::new();
        let mut icons = HashMap::new();
        let mut selected = Vec::new();

        for &child in design.children(element) {
            let Some(data) = design.get(child) else {
                continue;
            };
            if data.tag != ITEM_TAG {
                return Err(DesignError::UnexpectedChildTag {
                    expected: ITEM_TAG.to_owned(),
                    found: data.tag.clone(),
                });
            }
            let caption = data.text();
            let serialized = data.attr("item").unwrap_or(caption);
            let item = (self.item_from_design)(serialized)?;
            let id = identity(&item);
            captions.insert(id.clone(), caption.to_owned());
            if let Some(icon) = read_attribute::<Resource>(data, "icon")? {
                icons.insert(id, icon);
            }
            if read_attribute::<bool>(data, "selected")?.unwrap_or(false) {
                selected.push(item.clone());
            }
            items.push(item);
        }

        if items.is_empty() {
            return Ok(selected);
        }
        tracing::trace!(items = items.len(), "read items from design");
        {
            let mut presentation = self.presentation.borrow_mut();
            presentation.caption = ItemCaption::Declarative(captions);
            if !icons.is_empty() {
                presentation.icon = ItemIcon::Declarative(icons);
            }
        }
        self.set_data_provider(ListDataProvider::with_identity(items, identity));
        Ok(selected)
    }
}

impl<T: Item> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Default `item` parser: succeeds only when `T` is `String`.
fn string_from_design<T: Item>(text: &str) -> Result<T, DesignError> {
    let boxed: Box<dyn Any> = Box::new(text.to_owned());
    boxed
        .downcast::<T>()
        .map(|item| *item)
        .map_err(|_| DesignError::UnsupportedItemType {
            type_name: std::any::type_name::<T>().to_owned(),
            value: text.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::design::html::to_html;

    fn countries() -> Listing<String> {
        Listing::with_provider(ListDataProvider::new(
            ["fi", "se", "no"].map(String::from),
        ))
    }

    fn written(listing: &Listing<String>, selected: &str) -> Design {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-native-select"));
        listing.write_items(&mut design, root, &DesignContext::new(), |item| item == selected);
        design
    }

    #[test]
    fn write_items_markup() {
        let mut listing = countries();
        listing.set_item_caption_generator(|code| code.to_uppercase());
        listing.set_item_icon_generator(|code| {
            (code == "fi").then(|| Resource::theme("flags/fi.png"))
        });
        let design = written(&listing, "se");
        insta::assert_snapshot!(to_html(&design, design.root().unwrap()), @r#"
        <vaadin-native-select>
          <option item="fi" icon="theme://flags/fi.png">FI</option>
          <option item="se" selected>SE</option>
          <option item="no">NO</option>
        </vaadin-native-select>
        "#);
    }

    #[test]
    fn write_data_switch() {
        let listing = countries();
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-native-select"));
        let mut ctx = DesignContext::new();
        ctx.write_data = false;
        listing.write_items(&mut design, root, &ctx, |_| false);
        assert!(design.children(root).is_empty());
    }

    #[test]
    fn read_items_installs_declarative_captions() {
        let mut source = countries();
        source.set_item_caption(ItemCaption::Declarative(HashMap::from([(
            ItemId::from("fi"),
            "Finland".to_owned(),
        )])));
        let design = written(&source, "no");

        let mut listing = Listing::<String>::new();
        let root = design.root().unwrap();
        let selected = listing.read_items(&design, root).unwrap();
        assert_eq!(selected, vec!["no".to_owned()]);
        assert_eq!(listing.data_provider().fetch(), vec!["fi", "se", "no"]);
        assert_eq!(listing.item_caption(&"fi".to_owned()), "Finland");
        assert_eq!(listing.item_caption(&"se".to_owned()), "se");
    }

    #[test]
    fn read_items_without_item_attribute_uses_text() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-combo-box"));
        design.insert_child(root, ElementData::new("option").with_text("Plain"));
        let mut listing = Listing::<String>::new();
        listing.read_items(&design, root).unwrap();
        assert_eq!(listing.data_provider().fetch(), vec!["Plain".to_owned()]);
    }

    #[test]
    fn read_items_rejects_other_tags() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-list-select"));
        design.insert_child(root, ElementData::new("item").with_text("x"));
        let err = Listing::<String>::new().read_items(&design, root).unwrap_err();
        assert_eq!(
            err,
            DesignError::UnexpectedChildTag {
                expected: "option".into(),
                found: "item".into()
            }
        );
    }

    #[test]
    fn read_items_rejects_custom_caption_generator() {
        let design = written(&countries(), "");
        let mut listing = Listing::<String>::new();
        listing.set_item_caption_generator(|s| s.clone());
        let err = listing.read_items(&design, design.root().unwrap()).unwrap_err();
        assert!(matches!(err, DesignError::UnsupportedPresentation(_)));
    }

    #[test]
    fn non_string_items_need_a_parser() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-list-select"));
        design.insert_child(root, ElementData::new("option").with_attr("item", "3"));

        let mut listing = Listing::<i32>::new();
        let err = listing.read_items(&design, root).unwrap_err();
        assert!(matches!(err, DesignError::UnsupportedItemType { ref value, .. } if value == "3"));

        listing.set_item_design_hooks(
            |n| n.to_string(),
            |text| {
                text.parse().map_err(|_| DesignError::InvalidAttribute {
                    attribute: "item".into(),
                    value: text.into(),
                    message: "not a number".into(),
                })
            },
        );
        listing.read_items(&design, root).unwrap();
        assert_eq!(listing.data_provider().fetch(), vec![3]);
    }

    #[test]
    fn presentation_change_resets_payload() {
        let mut listing = countries();
        listing.flush();
        assert!(!listing.communicator().has_pending_changes());
        listing.set_item_enabled_provider(|code| code != "no");
        assert!(listing.communicator().is_reset_pending());
        let change = listing.flush().unwrap();
        let rows = change.rows();
        assert_eq!(rows[2].get("d"), Some(&serde_json::json!(true)));
        assert_eq!(rows[0].get("v"), Some(&serde_json::json!("fi")));
    }

    #[test]
    fn item_for_key() {
        let mut listing = countries();
        listing.flush();
        assert_eq!(listing.item_for_key("2"), Some("se".to_owned()));
        assert_eq!(listing.item_for_key("7"), None);
    }
}
