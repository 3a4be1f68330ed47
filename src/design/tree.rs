//! The element tree a design is read from and written to.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId};

/// A declarative design document.
///
/// Elements live in a slotmap arena; child lists are kept beside it in
/// document order. A design is built top-down and never edited in place, so
/// elements are only ever appended.
pub struct Design {
    elements: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    root: Option<ElementId>,
}

impl Design {
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            children: SecondaryMap::new(),
            root: None,
        }
    }

    /// Add a parentless element. The first one becomes the root.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.elements.insert(data);
        self.root.get_or_insert(id);
        id
    }

    /// Append `data` as the last child of `parent`.
    ///
    /// A `parent` that is not in this design leaves the new element detached.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        let id = self.elements.insert(data);
        match self.children.get_mut(parent) {
            Some(siblings) => siblings.push(id),
            None if self.elements.contains_key(parent) => {
                self.children.insert(parent, vec![id]);
            }
            None => tracing::debug!(?parent, "child inserted under unknown element"),
        }
        id
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.elements.get_mut(id)
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Design {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => f.write_str(&super::html::to_html(self, root)),
            None => f.write_str("Design(empty)"),
        }
    }
}
