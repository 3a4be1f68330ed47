//! How listing items are presented: caption, icon and enabled state.
//!
//! Each source is a sum type. `Declarative` variants hold values captured
//! from markup, keyed by item identity, and are the only ones design reading
//! may overwrite.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::data::{DataGenerator, ItemId, RowData};
use crate::value::Resource;

/// Row key of the item caption.
pub const CAPTION: &str = "v";
/// Row key of the item icon.
pub const ICON: &str = "i";
/// Row key set to `true` for disabled items.
pub const DISABLED: &str = "d";
/// Row key set to `true` for selected items.
pub const SELECTED: &str = "s";

/// Where item captions come from.
pub enum ItemCaption<T> {
    /// The item's `Display` form.
    Display,
    /// A caption function.
    Generator(Rc<dyn Fn(&T) -> String>),
    /// Captions read from markup; other items fall back to `Display`.
    Declarative(HashMap<ItemId, String>),
}

/// Where item icons come from.
pub enum ItemIcon<T> {
    None,
    Generator(Rc<dyn Fn(&T) -> Option<Resource>>),
    Declarative(HashMap<ItemId, Resource>),
}

/// Which items the user may select.
pub enum ItemEnabled<T> {
    All,
    Predicate(Rc<dyn Fn(&T) -> bool>),
}

impl<T> fmt::Debug for ItemCaption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCaption::Display => f.write_str("Display"),
            ItemCaption::Generator(_) => f.write_str("Generator(..)"),
            ItemCaption::Declarative(map) => f.debug_tuple("Declarative").field(map).finish(),
        }
    }
}

impl<T> fmt::Debug for ItemIcon<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemIcon::None => f.write_str("None"),
            ItemIcon::Generator(_) => f.write_str("Generator(..)"),
            ItemIcon::Declarative(map) => f.debug_tuple("Declarative").field(map).finish(),
        }
    }
}

/// The presentation sources of one listing.
pub struct Presentation<T> {
    pub caption: ItemCaption<T>,
    pub icon: ItemIcon<T>,
    pub enabled: ItemEnabled<T>,
}

impl<T: fmt::Display> Presentation<T> {
    pub fn new() -> Self {
        Self {
            caption: ItemCaption::Display,
            icon: ItemIcon::None,
            enabled: ItemEnabled::All,
        }
    }

    pub fn caption(&self, item: &T, id: &ItemId) -> String {
        match &self.caption {
            ItemCaption::Display => item.to_string(),
            ItemCaption::Generator(generate) => generate(item),
            ItemCaption::Declarative(captions) => captions
                .get(id)
                .cloned()
                .unwrap_or_else(|| item.to_string()),
        }
    }

    pub fn icon(&self, item: &T, id: &ItemId) -> Option<Resource> {
        match &self.icon {
            ItemIcon::None => None,
            ItemIcon::Generator(generate) => generate(item),
            ItemIcon::Declarative(icons) => icons.get(id).cloned(),
        }
    }

    pub fn is_enabled(&self, item: &T) -> bool {
        match &self.enabled {
            ItemEnabled::All => true,
            ItemEnabled::Predicate(predicate) => predicate(item),
        }
    }
}

impl<T: fmt::Display> Default for Presentation<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes caption, icon and disabled flag into every row.
pub(crate) struct PresentationGenerator<T>(pub(crate) Rc<std::cell::RefCell<Presentation<T>>>);

impl<T: fmt::Display> DataGenerator<T> for PresentationGenerator<T> {
    fn generate_data(&self, item: &T, row: &mut RowData) {
        let presentation = self.0.borrow();
        let id = row.item_id().clone();
        row.insert(CAPTION, presentation.caption(item, &id));
        if let Some(icon) = presentation.icon(item, &id) {
            row.insert(ICON, icon.to_string());
        }
        if !presentation.is_enabled(item) {
            row.insert(DISABLED, true);
        }
    }
}
