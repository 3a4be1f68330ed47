//! Element types: ElementId, ElementData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a markup element. Copy, lightweight (u64).
    pub struct ElementId;
}

/// Data associated with a single markup element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    /// Tag name (e.g. "vaadin-check-box", "option").
    pub tag: String,
    /// Attributes in insertion order. Names are unique.
    pub attributes: Vec<(String, String)>,
    /// Decoded text content, if any.
    pub text: Option<String>,
}

impl ElementData {
    /// Create a new element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present (with any value, including empty).
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|slot| slot.0 == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute. Returns its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Replace the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text content, or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
