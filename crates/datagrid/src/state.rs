//! View state: every parameter the user can change.
//!
//! The transitions here are pure bookkeeping (including the page-reset
//! rules). Re-derivation and rendering are driven by
//! [`DataTable`](crate::table::DataTable).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// Filter value meaning "match anything". Never stored as an active filter.
pub const ALL_FILTER: &str = "__all__";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header indicator.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Field to sort by.
    pub key: String,
    /// Direction.
    pub direction: SortDirection,
}

/// User-adjustable view parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Raw search text as typed.
    pub search_keyword: String,
    /// Restricts search to one field; `None` searches every searchable column.
    pub search_field: Option<String>,
    /// Field key to required value. Only present entries are active.
    pub filters: BTreeMap<String, String>,
    /// Active sort, if any.
    pub sort: Option<Sort>,
    /// Rows per page, at least 1.
    pub page_size: usize,
    /// 1-based page number.
    pub current_page: usize,
    /// Selected identifiers.
    pub selection: Selection,
}

impl ViewState {
    /// Creates the initial state for a page size.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            search_keyword: String::new(),
            search_field: None,
            filters: BTreeMap::new(),
            sort: None,
            page_size: page_size.max(1),
            current_page: 1,
            selection: Selection::new(),
        }
    }

    /// Sets the search keyword and resets to the first page.
    pub fn set_search(&mut self, keyword: impl Into<String>) {
        self.search_keyword = keyword.into();
        self.current_page = 1;
    }

    /// Sets the search scope and resets to the first page.
    pub fn set_search_field(&mut self, field: Option<String>) {
        self.search_field = field.filter(|f| !f.is_empty());
        self.current_page = 1;
    }

    /// Sets or clears a filter and resets to the first page.
    ///
    /// An empty value or [`ALL_FILTER`] removes the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() || value == ALL_FILTER {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self.current_page = 1;
    }

    /// Removes every filter and resets to the first page.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.current_page = 1;
    }

    /// Sorts by `key`: toggles direction when `key` is already active,
    /// otherwise starts ascending. Resets to the first page.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = Some(match self.sort.take() {
            Some(sort) if sort.key == key => Sort {
                key: sort.key,
                direction: sort.direction.toggled(),
            },
            _ => Sort {
                key: key.to_string(),
                direction: SortDirection::Asc,
            },
        });
        self.current_page = 1;
    }

    /// Sets rows per page (0 is treated as 1) and resets to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    /// Sets the page, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.current_page = page.clamp(1, total_pages.max(1));
    }

    /// Returns the active filter value for `key`.
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Returns the sort direction if `key` is the active sort key.
    #[must_use]
    pub fn sort_direction_for(&self, key: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let s = ViewState::new(0);
        assert_eq!(s.page_size, 1);
        assert_eq!(s.current_page, 1);
        assert!(s.filters.is_empty());
        assert!(s.sort.is_none());
    }

    #[test]
    fn test_sort_toggle_and_reset() {
        let mut s = ViewState::new(20);
        s.toggle_sort("name");
        assert_eq!(s.sort_direction_for("name"), Some(SortDirection::Asc));
        s.toggle_sort("name");
        assert_eq!(s.sort_direction_for("name"), Some(SortDirection::Desc));
        s.toggle_sort("name");
        assert_eq!(s.sort_direction_for("name"), Some(SortDirection::Asc));
        s.toggle_sort("name");
        s.toggle_sort("age");
        assert_eq!(s.sort_direction_for("age"), Some(SortDirection::Asc));
        assert_eq!(s.sort_direction_for("name"), None);
    }

    #[test]
    fn test_filter_sentinel_not_stored() {
        let mut s = ViewState::new(20);
        s.set_filter("status", "Active");
        assert_eq!(s.filter("status"), Some("Active"));
        s.set_filter("status", ALL_FILTER);
        assert_eq!(s.filter("status"), None);
        s.set_filter("status", "");
        assert!(s.filters.is_empty());
    }

    #[test]
    fn test_page_resets() {
        let mut s = ViewState::new(10);
        s.current_page = 3;
        s.set_search("x");
        assert_eq!(s.current_page, 1);

        s.current_page = 3;
        s.set_filter("a", "b");
        assert_eq!(s.current_page, 1);

        s.current_page = 3;
        s.toggle_sort("a");
        assert_eq!(s.current_page, 1);

        s.current_page = 3;
        s.set_search_field(Some("a".into()));
        assert_eq!(s.current_page, 1);

        s.current_page = 3;
        s.set_page_size(50);
        assert_eq!(s.current_page, 1);
        assert_eq!(s.search_keyword, "x");
        assert_eq!(s.filter("a"), Some("b"));
    }

    #[test]
    fn test_set_page_clamps() {
        let mut s = ViewState::new(10);
        s.set_page(5, 2);
        assert_eq!(s.current_page, 2);
        s.set_page(0, 2);
        assert_eq!(s.current_page, 1);
        s.set_page(3, 0);
        assert_eq!(s.current_page, 1);
    }

    #[test]
    fn test_empty_search_field_means_all() {
        let mut s = ViewState::new(10);
        s.set_search_field(Some(String::new()));
        assert_eq!(s.search_field, None);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(SortDirection::Asc.to_string(), "asc");
        assert_eq!(SortDirection::Desc.indicator(), "▼");
    }
}
