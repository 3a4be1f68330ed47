//! Attribute conversion: typed values to and from declarative attribute strings.
//!
//! Writing compares against a default and only emits attributes that carry
//! information. Reading only reports attributes that are present, so callers
//! leave their programmatic default untouched when an attribute is absent.

use super::context::DesignContext;
use super::node::ElementData;
use crate::error::{DesignError, ValueParseError};
use crate::value::{parse_color, parse_size, Color, Resource, Size};

/// A value that can be stored in a design attribute.
pub trait DesignValue: Sized + PartialEq {
    /// Attribute text for this value.
    fn to_design(&self) -> String;

    /// Parse attribute text. The error is a human-readable reason.
    fn from_design(text: &str) -> Result<Self, String>;
}

// ----- Primitive impls -----

impl DesignValue for bool {
    /// `true` is written as a bare attribute.
    fn to_design(&self) -> String {
        if *self {
            String::new()
        } else {
            "false".to_owned()
        }
    }

    /// Present means true unless the value is literally `false`.
    fn from_design(text: &str) -> Result<Self, String> {
        Ok(!text.eq_ignore_ascii_case("false"))
    }
}

macro_rules! numeric_design_value {
    ($($ty:ty),*) => {
        $(
            impl DesignValue for $ty {
                fn to_design(&self) -> String {
                    self.to_string()
                }

                fn from_design(text: &str) -> Result<Self, String> {
                    text.trim().parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

numeric_design_value!(i32, i64, u16, u32, usize, f32);

impl DesignValue for String {
    fn to_design(&self) -> String {
        self.clone()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }
}

// ----- Value type impls -----

impl DesignValue for Size {
    fn to_design(&self) -> String {
        self.to_string()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        parse_size(text).map_err(|e| e.to_string())
    }
}

impl DesignValue for Color {
    fn to_design(&self) -> String {
        self.to_css()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        parse_color(text).map_err(|e| e.to_string())
    }
}

impl DesignValue for Resource {
    fn to_design(&self) -> String {
        self.to_string()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        Resource::parse(text).map_err(|e: ValueParseError| e.to_string())
    }
}

// ----- Read / write -----

/// Write `value` under `name` unless it equals `default`.
///
/// With [`DesignContext::write_default_values`] set, defaults are written too.
/// Any stale attribute of the same name is removed when nothing is written.
pub fn write_attribute<T: DesignValue>(
    element: &mut ElementData,
    name: &str,
    value: &T,
    default: &T,
    ctx: &DesignContext,
) {
    if value != default || ctx.write_default_values {
        element.set_attr(name, value.to_design());
    } else {
        element.remove_attr(name);
    }
}

/// Read an optional typed attribute. `Ok(None)` when the attribute is absent.
pub fn read_attribute<T: DesignValue>(
    element: &ElementData,
    name: &str,
) -> Result<Option<T>, DesignError> {
    let Some(text) = element.attr(name) else {
        return Ok(None);
    };
    T::from_design(text)
        .map(Some)
        .map_err(|message| DesignError::InvalidAttribute {
            attribute: name.to_owned(),
            value: text.to_owned(),
            message,
        })
}

/// Read `name` into `target` if present.
pub fn read_into<T: DesignValue>(
    element: &ElementData,
    name: &str,
    target: &mut T,
) -> Result<(), DesignError> {
    if let Some(value) = read_attribute(element, name)? {
        *target = value;
    }
    Ok(())
}

// ----- Naming -----

/// Convert a camel-case property name to its attribute name.
///
/// Runs of capitals are treated as one word, so `showISOWeekNumbers` becomes
/// `show-iso-week-numbers` and `htmlContentAllowed` becomes
/// `html-content-allowed`.
pub fn to_attribute_name(property: &str) -> String {
    let chars: Vec<char> = property.chars().collect();
    let mut out = String::with_capacity(property.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let starts_word = !prev.is_ascii_uppercase() || next_is_lower;
            if starts_word && prev != '-' {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Convert a component type name to its unprefixed tag name.
pub fn class_to_tag_name(type_name: &str) -> String {
    to_attribute_name(type_name)
}
