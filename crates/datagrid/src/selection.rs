//! Selected row identifiers.
//!
//! Identifiers are stored as normalized strings and may refer to records that
//! are currently filtered out. The set is owned by the table; handlers reach
//! it through `&mut DataTable`.

use std::collections::BTreeSet;

/// Set of selected identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id`. Returns true if it was not selected before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Removes `id`. Returns true if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flips membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Removes every identifier.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of selected identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Returns the identifiers as an owned, sorted vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl Extend<String> for Selection {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}
