#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Datagrid
//!
//! A paginated, sortable, searchable, filterable data table that renders
//! itself to HTML.
//!
//! The heart of the crate is a pure pipeline: source records plus a
//! [`ViewState`] go through [`derive`](derive::derive) (search, filter, sort,
//! paginate) and the resulting [`DerivedView`] is projected to markup by
//! [`render`]. [`DataTable`] ties the two together behind named mutators and
//! writes the result into a [`Host`].
//!
//! Modules, leaves first:
//! - **record** - Records and scalar values, JSON ingestion
//! - **column** - Column schema and cell renderers
//! - **config** - Serializable table configuration
//! - **state** - View state and its transitions
//! - **selection** - Selected identifiers
//! - **paginator** - Page arithmetic and the page-button window
//! - **derive** - The derivation pipeline
//! - **render** - HTML projection
//! - **i18n** - Localized strings
//! - **debounce** - Tagged debounce for search input
//! - **table** - The controller
//! - **router** - Interaction events
//! - **toast** - Transient notifications
//! - **host** - Render targets
//!
//! ## Example
//!
//! ```rust
//! use datagrid::prelude::*;
//!
//! let config = TableConfig::new(
//!     "orders",
//!     vec![
//!         Column::new("id", "ID").sortable(),
//!         Column::new("status", "Status").filter_options(["open", "closed"]),
//!     ],
//! );
//! let mut table = DataTable::new(TableOptions::new(config), MemoryHost::with_element("orders"));
//! table.set_data_json(r#"[{"id": 1, "status": "open"}, {"id": 2, "status": "closed"}]"#).unwrap();
//!
//! table.handle(Event::FilterChanged { key: "status".into(), value: "open".into() });
//! assert_eq!(table.total_records(), 1);
//! ```

pub mod column;
pub mod config;
pub mod debounce;
pub mod derive;
pub mod error;
pub mod host;
pub mod i18n;
pub mod paginator;
pub mod record;
pub mod render;
pub mod router;
pub mod selection;
pub mod state;
pub mod table;
pub mod toast;

pub use derive::DerivedView;
pub use error::{DatagridError, Result};
pub use host::Host;
pub use state::ViewState;
pub use table::DataTable;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::column::{CellRenderer, Column, FilterOption};
    pub use crate::config::{FilterLayout, TableConfig};
    pub use crate::derive::{DerivedView, derive};
    pub use crate::error::{DatagridError, Result};
    pub use crate::host::{Host, MemoryHost};
    pub use crate::i18n::{Key, Strings};
    pub use crate::record::{Record, Value};
    pub use crate::router::{Cmd, Event, PageTarget};
    pub use crate::state::{SortDirection, ViewState};
    pub use crate::table::{BatchAction, DataTable, TableOptions};
    pub use crate::toast::{Toast, ToastLevel, ToastStack};
}
