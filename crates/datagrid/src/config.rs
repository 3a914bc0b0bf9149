//! Table configuration.
//!
//! [`TableConfig`] is the single source of truth for the serializable
//! construction options. Callbacks (row click, batch actions, localization)
//! live on [`TableOptions`](crate::table::TableOptions), which wraps it.
//!
//! # Examples
//!
//! ```rust
//! use datagrid::column::Column;
//! use datagrid::config::TableConfig;
//!
//! let config = TableConfig {
//!     selectable: true,
//!     ..TableConfig::new("users", vec![Column::new("id", "ID")])
//! };
//! assert_eq!(config.default_page_size, 20);
//! assert!(config.validate().is_ok());
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{DatagridError, Result};

/// Default candidate page sizes.
pub const DEFAULT_PAGE_SIZES: [usize; 3] = [20, 50, 100];

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default quiet period before a search keystroke is applied.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Where filter dropdowns are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLayout {
    /// Inside the toolbar, next to the search box.
    #[default]
    Inline,
    /// In a separate row under the toolbar.
    Stacked,
}

/// Serializable construction options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Id of the host element the table renders into.
    pub container_id: String,

    /// Column schema.
    pub columns: Vec<Column>,

    /// Choices offered by the page-size selector.
    pub page_sizes: Vec<usize>,

    /// Initial page size.
    pub default_page_size: usize,

    /// Text of the empty-state row. Falls back to the localized default.
    pub empty_message: Option<String>,

    /// Text shown by `show_loading`. Falls back to the localized default.
    pub loading_message: Option<String>,

    /// Enables row checkboxes and the batch-action bar.
    pub selectable: bool,

    /// Record field holding the row identifier.
    pub id_field: String,

    /// Shows a selector restricting search to one column.
    pub search_scope_selector: bool,

    /// Placement of filter dropdowns.
    pub filter_layout: FilterLayout,

    /// Prefix put in front of the column label in each filter's "all" entry.
    pub filter_label_prefix: String,

    /// Quiet period for search input, in milliseconds.
    pub search_debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            container_id: String::new(),
            columns: Vec::new(),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            empty_message: None,
            loading_message: None,
            selectable: false,
            id_field: "id".to_string(),
            search_scope_selector: false,
            filter_layout: FilterLayout::Inline,
            filter_label_prefix: String::new(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl TableConfig {
    /// Creates a config for the given mount target and columns with defaults
    /// for everything else.
    #[must_use]
    pub fn new(container_id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            container_id: container_id.into(),
            columns,
            ..Self::default()
        }
    }

    /// Parses a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidJson`] if the text does not describe a
    /// config.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::Io`] if the file cannot be read and
    /// [`DatagridError::InvalidJson`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks the config for inconsistencies.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(DatagridError::invalid_config("no columns defined"));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.key.as_str()) {
                return Err(DatagridError::invalid_config(format!(
                    "duplicate column key: {}",
                    column.key
                )));
            }
        }

        if self.page_sizes.is_empty() {
            return Err(DatagridError::invalid_config("page_sizes is empty"));
        }
        if self.page_sizes.contains(&0) || self.default_page_size == 0 {
            return Err(DatagridError::invalid_config("page sizes must be positive"));
        }
        if self.id_field.is_empty() {
            return Err(DatagridError::invalid_config("id_field is empty"));
        }
        Ok(())
    }

    /// Returns the search debounce as a [`Duration`].
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Returns the column with the given key.
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Iterates over searchable columns.
    pub fn searchable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.searchable)
    }
}
