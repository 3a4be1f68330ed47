//! Items and item identity.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Any value a listing can show.
///
/// Listings hold clones of items, compare them structurally first and by
/// [`ItemId`] second, and fall back to `Display` for captions.
pub trait Item: Clone + PartialEq + fmt::Debug + fmt::Display + 'static {}

impl<T> Item for T where T: Clone + PartialEq + fmt::Debug + fmt::Display + 'static {}

/// Stable identity of an item. Two items with equal ids are the same
/// selection member even when they are distinct instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(value) => write!(f, "{value}"),
            ItemId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId::Int(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Text(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::Text(value)
    }
}

/// Maps an item to its identity.
pub type IdentityFn<T> = Rc<dyn Fn(&T) -> ItemId>;

/// Items that carry their own natural identity.
pub trait Identifiable {
    fn item_id(&self) -> ItemId;
}

impl Identifiable for String {
    fn item_id(&self) -> ItemId {
        ItemId::Text(self.clone())
    }
}

impl Identifiable for &'static str {
    fn item_id(&self) -> ItemId {
        ItemId::Text((*self).to_owned())
    }
}

macro_rules! int_identifiable {
    ($($ty:ty),*) => {
        $(
            impl Identifiable for $ty {
                fn item_id(&self) -> ItemId {
                    ItemId::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_identifiable!(i8, i16, i32, i64, u8, u16, u32);

/// Identity function using [`Identifiable`].
pub fn natural_identity<T: Identifiable + 'static>() -> IdentityFn<T> {
    Rc::new(|item: &T| item.item_id())
}

/// Identity function using the item's `Display` form. Used when an item type
/// offers nothing better.
pub fn display_identity<T: fmt::Display + 'static>() -> IdentityFn<T> {
    Rc::new(|item: &T| ItemId::Text(item.to_string()))
}
