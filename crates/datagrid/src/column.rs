//! Column schema.
//!
//! A [`Column`] describes one displayed field: its header label, which
//! capabilities it has (sorting, searching, filtering) and, optionally, a
//! [`CellRenderer`] that turns a whole record into cell markup.
//!
//! # Example
//!
//! ```rust
//! use datagrid::column::Column;
//! use datagrid::record::Record;
//!
//! let columns = vec![
//!     Column::new("id", "ID").sortable(),
//!     Column::new("name", "Name").sortable().searchable(),
//!     Column::new("status", "Status").filter_options(["Active", "Inactive"]),
//!     Column::new("actions", "Actions")
//!         .renderer(|r: &Record| format!("<button data-id=\"{}\">Edit</button>", r.id("id").unwrap_or_default())),
//! ];
//! assert!(columns[2].filterable);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Strategy for rendering a cell from a record.
///
/// The returned string is inserted as markup without escaping. Renderers are
/// trusted; escaping user data inside them is their responsibility.
pub trait CellRenderer: Send + Sync {
    /// Renders the cell content for `record`.
    fn render(&self, record: &Record) -> String;
}

impl<F> CellRenderer for F
where
    F: Fn(&Record) -> String + Send + Sync,
{
    fn render(&self, record: &Record) -> String {
        self(record)
    }
}

/// One entry of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterOptionRepr")]
pub struct FilterOption {
    /// Value compared against the field's string form.
    pub value: String,
    /// Text shown in the dropdown.
    pub label: String,
}

impl FilterOption {
    /// Creates an option with distinct value and label.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&str> for FilterOption {
    fn from(s: &str) -> Self {
        Self::new(s, s)
    }
}

impl From<String> for FilterOption {
    fn from(s: String) -> Self {
        Self::new(s.clone(), s)
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for FilterOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// Config files may list options either as bare strings or as
/// `{ "value": ..., "label": ... }` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilterOptionRepr {
    Plain(String),
    Labeled { value: String, label: Option<String> },
}

impl From<FilterOptionRepr> for FilterOption {
    fn from(repr: FilterOptionRepr) -> Self {
        match repr {
            FilterOptionRepr::Plain(s) => Self::from(s),
            FilterOptionRepr::Labeled { value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                Self { value, label }
            }
        }
    }
}

/// A single column definition.
#[derive(Clone, Serialize, Deserialize)]
pub struct Column {
    /// Field name in each record.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Whether clicking the header sorts by this field.
    #[serde(default)]
    pub sortable: bool,
    /// Whether the search box looks at this field.
    #[serde(default)]
    pub searchable: bool,
    /// Whether a filter dropdown is offered.
    #[serde(default)]
    pub filterable: bool,
    /// Options for the filter dropdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_options: Option<Vec<FilterOption>>,
    /// Overrides the dropdown's leading "all" label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_label: Option<String>,
    /// Custom cell renderer. Not configurable from files.
    #[serde(skip)]
    pub renderer: Option<Arc<dyn CellRenderer>>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .field("filterable", &self.filterable)
            .field("filter_options", &self.filter_options)
            .field("filter_label", &self.filter_label)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl Column {
    /// Creates a plain column with the given field key and header label.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            searchable: false,
            filterable: false,
            filter_options: None,
            filter_label: None,
            renderer: None,
        }
    }

    /// Marks the column sortable (builder pattern).
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Marks the column searchable (builder pattern).
    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Makes the column filterable with the given options (builder pattern).
    #[must_use]
    pub fn filter_options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<FilterOption>,
    {
        self.filterable = true;
        self.filter_options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the dropdown's leading label (builder pattern).
    #[must_use]
    pub fn filter_label(mut self, label: impl Into<String>) -> Self {
        self.filter_label = Some(label.into());
        self
    }

    /// Sets a custom cell renderer (builder pattern).
    #[must_use]
    pub fn renderer(mut self, renderer: impl CellRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Returns true when a filter dropdown should be shown.
    #[must_use]
    pub fn has_filter(&self) -> bool {
        self.filterable && self.filter_options.is_some()
    }
}
