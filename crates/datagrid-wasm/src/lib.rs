//! # datagrid-wasm
//!
//! The datagrid table widget, compiled to WebAssembly.
//!
//! The table renders into the element named by `container_id`. The page
//! forwards user interactions as JSON events to `dispatch`; the only command
//! that comes back is a debounce request for search input, which the page
//! answers by dispatching the follow-up event after `delayMs`.
//!
//! ## Quick Start (JavaScript)
//!
//! ```javascript
//! import init, { JsDataTable, showToast } from 'datagrid-wasm';
//!
//! await init();
//!
//! const table = new JsDataTable(JSON.stringify({
//!     container_id: 'users',
//!     columns: [
//!         { key: 'id', label: 'ID', sortable: true },
//!         { key: 'name', label: 'Name', sortable: true, searchable: true },
//!     ],
//!     selectable: true,
//! }));
//! table.setData(JSON.stringify(rows));
//! table.addBatchAction('Delete', 'btn-danger', (selected, t) => {
//!     const gone = new Set(selected.map((r) => r.id));
//!     t.setData(JSON.stringify(rows.filter((r) => !gone.has(r.id))));
//! });
//!
//! const send = (event) => {
//!     const cmd = JSON.parse(table.dispatch(JSON.stringify(event)));
//!     if (cmd && cmd.type === 'debounce') {
//!         setTimeout(() => send({ type: 'searchDebounceElapsed', tag: cmd.tag }), cmd.delayMs);
//!     }
//! };
//! container.addEventListener('input', (e) => {
//!     if (e.target.matches('.data-table-search')) send({ type: 'searchInput', value: e.target.value });
//! });
//!
//! showToast('Loaded', 'success', 3000);
//! ```

#![forbid(unsafe_code)]

mod dom;

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use datagrid::config::TableConfig;
use datagrid::i18n::Strings;
use datagrid::record::Record;
use datagrid::router::{Cmd, Event};
use datagrid::table::{BatchAction, DataTable, TableOptions};
use datagrid::toast::{TOAST_CONTAINER_ID, Toast, ToastLevel, ToastStack};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub use dom::DomHost;

/// Initialize the module.
///
/// Sets up the panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Module version information.
#[must_use]
#[wasm_bindgen(js_name = "version")]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn record_to_js(record: &Record) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(record).map_err(to_js)?;
    js_sys::JSON::parse(&json)
}

fn records_to_js(records: &[Record]) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(records).map_err(to_js)?;
    js_sys::JSON::parse(&json)
}

/// JSON form of a router command: `null` or the tagged command object.
#[must_use]
pub fn command_json(cmd: Option<&Cmd>) -> String {
    serde_json::to_string(&cmd).unwrap_or_else(|_| "null".to_string())
}

/// Builds a string table from a flat JSON object of `datatable.*` keys.
fn strings_from_json(json: &str) -> Result<Strings, serde_json::Error> {
    let table: HashMap<String, String> = serde_json::from_str(json)?;
    Ok(Strings::with_lookup(move |key| table.get(key).cloned()))
}

/// Converts a page number coming from JavaScript. Anything below 1 (and
/// NaN) becomes page 1; the table clamps the upper end.
fn page_from_js(page: f64) -> usize {
    if page.is_nan() || page < 1.0 {
        return 1;
    }
    // Saturating float-to-int conversion.
    page as usize
}

struct Inner {
    table: DataTable,
    row_click: Option<js_sys::Function>,
    batch_handlers: Vec<js_sys::Function>,
}

/// JavaScript handle to a table.
///
/// Handles are cheap clones sharing one table, so callbacks can be given the
/// table and call back into it. No borrow of the table is held while a
/// callback runs.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsDataTable {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl JsDataTable {
    /// Create a table from a JSON config, with optional JSON translations.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, strings_json: Option<String>) -> Result<JsDataTable, JsValue> {
        let config = TableConfig::from_json(config_json).map_err(to_js)?;
        let host = DomHost::from_window().ok_or_else(|| JsValue::from_str("no document"))?;

        let mut options = TableOptions::new(config);
        if let Some(json) = strings_json {
            options.strings = strings_from_json(&json).map_err(to_js)?;
        }

        let table = DataTable::new(options, host);
        if !table.is_mounted() {
            web_sys::console::error_1(
                &format!(
                    "DataTable: container #{} not found",
                    table.config().container_id
                )
                .into(),
            );
        }

        Ok(JsDataTable {
            inner: Rc::new(RefCell::new(Inner {
                table,
                row_click: None,
                batch_handlers: Vec::new(),
            })),
        })
    }

    /// Set the row-click callback. It receives the clicked record and the
    /// table.
    #[wasm_bindgen(js_name = "onRowClick")]
    pub fn on_row_click(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().row_click = Some(callback);
    }

    /// Register a batch action. The callback receives the selected records
    /// and the table.
    #[wasm_bindgen(js_name = "addBatchAction")]
    pub fn add_batch_action(&self, label: &str, style_class: &str, callback: js_sys::Function) {
        let mut inner = self.inner.borrow_mut();
        inner.batch_handlers.push(callback);
        inner
            .table
            .add_batch_action(BatchAction::new(label, |_, _| {}).style_class(style_class));
    }

    /// Replace the data with a JSON array of records.
    #[wasm_bindgen(js_name = "setData")]
    pub fn set_data(&self, json: &str) -> Result<(), JsValue> {
        self.table_mut().set_data_json(json).map_err(to_js)
    }

    /// Append a JSON array of records.
    #[wasm_bindgen(js_name = "appendData")]
    pub fn append_data(&self, json: &str) -> Result<(), JsValue> {
        self.table_mut().append_data_json(json).map_err(to_js)
    }

    /// Remove all data.
    #[wasm_bindgen(js_name = "clearData")]
    pub fn clear_data(&self) {
        self.table_mut().clear_data();
    }

    /// Set the search keyword immediately.
    #[wasm_bindgen]
    pub fn search(&self, keyword: &str) {
        self.table_mut().search(keyword);
    }

    /// Restrict search to one column; `null` or `""` for all.
    #[wasm_bindgen(js_name = "setSearchField")]
    pub fn set_search_field(&self, field: Option<String>) {
        self.table_mut().set_search_field(field.as_deref());
    }

    /// Set or clear (`"__all__"`) a filter.
    #[wasm_bindgen(js_name = "setFilter")]
    pub fn set_filter(&self, key: &str, value: &str) {
        self.table_mut().set_filter(key, value);
    }

    /// Remove every filter.
    #[wasm_bindgen(js_name = "clearFilters")]
    pub fn clear_filters(&self) {
        self.table_mut().clear_filters();
    }

    /// Sort by a column, toggling direction on repeat.
    #[wasm_bindgen(js_name = "setSort")]
    pub fn set_sort(&self, key: &str) {
        self.table_mut().set_sort(key);
    }

    /// Set rows per page.
    #[wasm_bindgen(js_name = "setPageSize")]
    pub fn set_page_size(&self, size: usize) {
        self.table_mut().set_page_size(size);
    }

    /// Jump to a page, clamped into the valid range.
    #[wasm_bindgen(js_name = "goToPage")]
    pub fn go_to_page(&self, page: f64) {
        self.table_mut().go_to_page(page_from_js(page));
    }

    #[wasm_bindgen(js_name = "selectAllOnPage")]
    pub fn select_all_on_page(&self) {
        self.table_mut().select_all_on_page();
    }

    #[wasm_bindgen(js_name = "deselectAllOnPage")]
    pub fn deselect_all_on_page(&self) {
        self.table_mut().deselect_all_on_page();
    }

    #[wasm_bindgen(js_name = "selectAll")]
    pub fn select_all(&self) {
        self.table_mut().select_all();
    }

    #[wasm_bindgen(js_name = "toggleRowSelection")]
    pub fn toggle_row_selection(&self, id: &str) {
        self.table_mut().toggle_row_selection(id);
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&self) {
        self.table_mut().clear_selection();
    }

    /// Selected identifiers as a JSON array.
    #[wasm_bindgen(js_name = "selectedIdsJson")]
    pub fn selected_ids_json(&self) -> String {
        serde_json::to_string(&self.table().get_selected_ids()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Selected records as a JSON array.
    #[wasm_bindgen(js_name = "selectedRowsJson")]
    pub fn selected_rows_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.table().get_selected_rows()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = "currentPage")]
    pub fn current_page(&self) -> usize {
        self.table().current_page()
    }

    #[wasm_bindgen(js_name = "totalPages")]
    pub fn total_pages(&self) -> usize {
        self.table().total_pages()
    }

    #[wasm_bindgen(js_name = "totalRecords")]
    pub fn total_records(&self) -> usize {
        self.table().total_records()
    }

    #[wasm_bindgen(js_name = "isMounted")]
    pub fn is_mounted(&self) -> bool {
        self.table().is_mounted()
    }

    /// Re-render into the container.
    #[wasm_bindgen]
    pub fn render(&self) {
        self.table_mut().render();
    }

    /// Show the loading placeholder.
    #[wasm_bindgen(js_name = "showLoading")]
    pub fn show_loading(&self) {
        self.table_mut().show_loading();
    }

    /// Apply a JSON-encoded interaction event. Returns the resulting command
    /// as JSON (`null` when there is nothing to schedule).
    #[wasm_bindgen]
    pub fn dispatch(&self, event_json: &str) -> Result<String, JsValue> {
        let event = Event::from_json(event_json).map_err(to_js)?;
        let cmd = match event {
            Event::RowClicked {
                row_id,
                from_checkbox: false,
            } if self.inner.borrow().row_click.is_some() => {
                self.call_row_click(&row_id)?;
                None
            }
            Event::BatchActionClicked { index } if index < self.inner.borrow().batch_handlers.len() => {
                self.call_batch_action(index)?;
                None
            }
            other => self.table_mut().handle(other),
        };
        Ok(command_json(cmd.as_ref()))
    }
}

impl JsDataTable {
    fn table(&self) -> Ref<'_, DataTable> {
        Ref::map(self.inner.borrow(), |inner| &inner.table)
    }

    fn table_mut(&self) -> RefMut<'_, DataTable> {
        RefMut::map(self.inner.borrow_mut(), |inner| &mut inner.table)
    }

    fn call_row_click(&self, row_id: &str) -> Result<(), JsValue> {
        let (callback, record) = {
            let inner = self.inner.borrow();
            let Some(callback) = inner.row_click.clone() else {
                return Ok(());
            };
            let Some(record) = inner.table.filtered_record(row_id) else {
                return Ok(());
            };
            (callback, record_to_js(record)?)
        };
        callback.call2(&JsValue::NULL, &record, &JsValue::from(self.clone()))?;
        Ok(())
    }

    fn call_batch_action(&self, index: usize) -> Result<(), JsValue> {
        let (callback, rows) = {
            let inner = self.inner.borrow();
            let Some(callback) = inner.batch_handlers.get(index).cloned() else {
                return Ok(());
            };
            (callback, records_to_js(&inner.table.get_selected_rows())?)
        };
        callback.call2(&JsValue::NULL, &rows, &JsValue::from(self.clone()))?;
        Ok(())
    }
}

thread_local! {
    static TOASTS: RefCell<ToastStack> = RefCell::new(ToastStack::new());
}

fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
}

/// Show a transient notification in the `datagrid-toasts` container,
/// creating the container if needed.
///
/// `level` is one of success, error, warning, info (unknown levels fall
/// back to info). `duration_ms` of 0 uses the default of 3 seconds.
#[wasm_bindgen(js_name = "showToast")]
pub fn show_toast(message: &str, level: &str, duration_ms: u32) {
    let Some(mut host) = DomHost::from_window() else {
        return;
    };
    host.ensure_element(TOAST_CONTAINER_ID);

    let level: ToastLevel = level.parse().unwrap_or_default();
    let mut toast = Toast::new(message, level);
    if duration_ms > 0 {
        toast = toast.duration(Duration::from_millis(u64::from(duration_ms)));
    }
    let delay = toast.duration;
    debug!("Toast ({}) for {:?}: {}", toast.level, delay, toast.message);

    TOASTS.with(|stack| {
        stack.borrow_mut().notify(&mut host, toast, now());
    });
    schedule_expiry(delay);
}

fn schedule_expiry(delay: Duration) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || {
        if let Some(mut host) = DomHost::from_window() {
            TOASTS.with(|stack| stack.borrow_mut().notify_expired(&mut host, now()));
        }
    });
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    {
        web_sys::console::error_1(&err);
    }
}
