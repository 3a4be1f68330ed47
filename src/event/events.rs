//! Events fired by components to their listeners.

/// A button was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// `false` when the click was triggered from server code.
    pub user_originated: bool,
}

/// The value of a field changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChangeEvent<V> {
    pub old_value: V,
    pub value: V,
    pub user_originated: bool,
}

/// The selected item of a single-select listing changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleSelectionEvent<T> {
    pub old_value: Option<T>,
    pub value: Option<T>,
    pub user_originated: bool,
}

impl<T> SingleSelectionEvent<T> {
    pub fn selected_item(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

/// The selection of a multi-select listing changed.
///
/// `old_selection` and `value` are full snapshots in selection order;
/// `added` and `removed` are the effective differences.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectionEvent<T> {
    pub old_selection: Vec<T>,
    pub value: Vec<T>,
    pub added: Vec<T>,
    pub removed: Vec<T>,
    pub user_originated: bool,
}

impl<T> MultiSelectionEvent<T> {
    pub fn added_selection(&self) -> &[T] {
        &self.added
    }

    pub fn removed_selection(&self) -> &[T] {
        &self.removed
    }
}
