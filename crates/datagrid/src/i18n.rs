//! Localized UI strings.
//!
//! Every piece of fixed text the table renders has a namespaced [`Key`]. An
//! optional lookup hook is consulted first; when it returns `None` the
//! built-in English text is used.
//!
//! ```rust
//! use datagrid::i18n::{Key, Strings};
//!
//! let strings = Strings::with_lookup(|key| (key == "datatable.prev").then(|| "Zurück".to_string()));
//! assert_eq!(strings.get(Key::Prev), "Zurück");
//! assert_eq!(strings.get(Key::Next), "Next");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Signature of an external translation hook.
pub type LookupFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Identifier of a localizable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Search box placeholder.
    SearchPlaceholder,
    /// Label in front of the page-size selector.
    PerPage,
    /// Word before the record count.
    Total,
    /// Word after the record count.
    Records,
    /// "All" entry of a filter dropdown.
    All,
    /// Previous-page button.
    Prev,
    /// Next-page button.
    Next,
    /// Word before the selection count.
    Selected,
    /// Word after the selection count.
    Items,
    /// Clear-selection button.
    ClearSelection,
    /// "All fields" entry of the search scope selector.
    SearchAllFields,
    /// Empty-state row.
    Empty,
    /// Loading placeholder.
    Loading,
}

impl Key {
    /// Every key, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::SearchPlaceholder,
        Self::PerPage,
        Self::Total,
        Self::Records,
        Self::All,
        Self::Prev,
        Self::Next,
        Self::Selected,
        Self::Items,
        Self::ClearSelection,
        Self::SearchAllFields,
        Self::Empty,
        Self::Loading,
    ];

    /// Namespaced lookup key passed to the hook.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchPlaceholder => "datatable.search_placeholder",
            Self::PerPage => "datatable.per_page",
            Self::Total => "datatable.total",
            Self::Records => "datatable.records",
            Self::All => "datatable.all",
            Self::Prev => "datatable.prev",
            Self::Next => "datatable.next",
            Self::Selected => "datatable.selected",
            Self::Items => "datatable.items",
            Self::ClearSelection => "datatable.clear_selection",
            Self::SearchAllFields => "datatable.search_all_fields",
            Self::Empty => "datatable.empty",
            Self::Loading => "datatable.loading",
        }
    }

    /// Built-in text.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::SearchPlaceholder => "Search...",
            Self::PerPage => "Per page:",
            Self::Total => "Total",
            Self::Records => "records",
            Self::All => "All",
            Self::Prev => "Previous",
            Self::Next => "Next",
            Self::Selected => "Selected",
            Self::Items => "items",
            Self::ClearSelection => "Clear selection",
            Self::SearchAllFields => "All fields",
            Self::Empty => "No data",
            Self::Loading => "Loading...",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String table with an optional external hook.
#[derive(Clone, Default)]
pub struct Strings {
    lookup: Option<LookupFn>,
}

impl fmt::Debug for Strings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strings")
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl Strings {
    /// Built-in strings only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strings resolved through `lookup` first.
    #[must_use]
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Some(Arc::new(lookup)),
        }
    }

    /// Returns the text for `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Cow<'static, str> {
        self.lookup
            .as_ref()
            .and_then(|lookup| lookup(key.as_str()))
            .map_or(Cow::Borrowed(key.default_text()), Cow::Owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Strings::new();
        assert_eq!(s.get(Key::SearchPlaceholder), "Search...");
        assert_eq!(s.get(Key::ClearSelection), "Clear selection");
    }

    #[test]
    fn test_keys_are_namespaced_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for key in Key::ALL {
            assert!(key.as_str().starts_with("datatable."));
            assert!(seen.insert(key.as_str()));
            assert!(!key.default_text().is_empty());
        }
    }

    #[test]
    fn test_lookup_falls_back() {
        let s = Strings::with_lookup(|k| match k {
            "datatable.total" => Some("共".to_string()),
            _ => None,
        });
        assert_eq!(s.get(Key::Total), "共");
        assert_eq!(s.get(Key::Records), "records");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Loading.to_string(), "datatable.loading");
    }
}
