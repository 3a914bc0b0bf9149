//! The table controller.
//!
//! [`DataTable`] owns the source data, the [`ViewState`], the last
//! [`DerivedView`] and the host it renders into. Every mutator updates the
//! state, re-derives and re-renders before returning.
//!
//! # Example
//!
//! ```rust
//! use datagrid::prelude::*;
//!
//! let config = TableConfig::new(
//!     "users",
//!     vec![
//!         Column::new("id", "ID").sortable(),
//!         Column::new("name", "Name").sortable().searchable(),
//!     ],
//! );
//! let mut table = DataTable::new(TableOptions::new(config), MemoryHost::with_element("users"));
//!
//! table.set_data(vec![
//!     Record::new().with("id", 1).with("name", "Bob"),
//!     Record::new().with("id", 2).with("name", "Alice"),
//! ]);
//! table.set_sort("name");
//!
//! let names: Vec<_> = table.page_records().iter().map(|r| r.text("name").unwrap().into_owned()).collect();
//! assert_eq!(names, ["Alice", "Bob"]);
//! assert!(table.host().inner_html("users").unwrap().contains("Name ▲"));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::config::TableConfig;
use crate::debounce::Debouncer;
use crate::derive::{DerivedView, derive};
use crate::error::DatagridError;
use crate::host::Host;
use crate::i18n::Strings;
use crate::paginator::Paginator;
use crate::record::{Record, records_from_json};
use crate::render::{self, Projection};
use crate::state::ViewState;

/// Handler of a batch action: receives the selected records and the table.
pub type BatchHandler = Arc<dyn Fn(&[Record], &mut DataTable) + Send + Sync>;

/// Row-click callback.
pub type RowClickHandler = Arc<dyn Fn(&Record) + Send + Sync>;

/// A button in the batch-action bar.
#[derive(Clone)]
pub struct BatchAction {
    /// Button text.
    pub label: String,
    /// Extra class on the button.
    pub style_class: String,
    /// Called with the selected records.
    pub handler: BatchHandler,
}

impl fmt::Debug for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchAction")
            .field("label", &self.label)
            .field("style_class", &self.style_class)
            .finish_non_exhaustive()
    }
}

impl BatchAction {
    /// Creates an action with the default style.
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Record], &mut DataTable) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            style_class: "btn-default".to_string(),
            handler: Arc::new(handler),
        }
    }

    /// Sets the button class (builder pattern).
    #[must_use]
    pub fn style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = class.into();
        self
    }
}

/// Construction options: the serializable config plus callbacks.
#[derive(Clone, Default)]
pub struct TableOptions {
    /// Serializable configuration.
    pub config: TableConfig,
    /// Called when a row (not its checkbox) is clicked.
    pub row_click: Option<RowClickHandler>,
    /// Buttons shown while rows are selected.
    pub batch_actions: Vec<BatchAction>,
    /// Localized strings.
    pub strings: Strings,
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("config", &self.config)
            .field("row_click", &self.row_click.is_some())
            .field("batch_actions", &self.batch_actions)
            .field("strings", &self.strings)
            .finish()
    }
}

impl TableOptions {
    /// Options with no callbacks and built-in strings.
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the row-click callback (builder pattern).
    #[must_use]
    pub fn on_row_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.row_click = Some(Arc::new(f));
        self
    }

    /// Adds a batch action (builder pattern).
    #[must_use]
    pub fn batch_action(mut self, action: BatchAction) -> Self {
        self.batch_actions.push(action);
        self
    }

    /// Sets the localization hook (builder pattern).
    #[must_use]
    pub fn lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.strings = Strings::with_lookup(lookup);
        self
    }
}

/// Interactive data table.
pub struct DataTable {
    config: TableConfig,
    strings: Strings,
    row_click: Option<RowClickHandler>,
    batch_actions: Vec<BatchAction>,
    host: Box<dyn Host>,
    mounted: bool,
    data: Vec<Record>,
    state: ViewState,
    view: DerivedView,
    debouncer: Debouncer,
    last_render: Option<String>,
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("container_id", &self.config.container_id)
            .field("mounted", &self.mounted)
            .field("records", &self.data.len())
            .field("state", &self.state)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl DataTable {
    /// Creates a table rendering into `host`.
    ///
    /// Never fails. Config problems are logged; a missing mount target is
    /// logged at `error` and leaves the table inert (state still works,
    /// rendering does nothing).
    pub fn new(options: TableOptions, host: impl Host + 'static) -> Self {
        let TableOptions {
            config,
            row_click,
            batch_actions,
            strings,
        } = options;

        if let Err(err) = config.validate() {
            warn!("{err}");
        }

        let mounted = host.has_element(&config.container_id);
        if !mounted {
            error!("{}", DatagridError::MountNotFound(config.container_id.clone()));
        }

        let state = ViewState::new(config.default_page_size);
        let debouncer = Debouncer::new(config.search_debounce());
        debug!(
            "DataTable created on #{} with {} columns",
            config.container_id,
            config.columns.len()
        );

        Self {
            config,
            strings,
            row_click,
            batch_actions,
            host: Box::new(host),
            mounted,
            data: Vec::new(),
            state,
            view: DerivedView::empty(),
            debouncer,
            last_render: None,
        }
    }

    // Accessors

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the current view state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the last derived view.
    #[must_use]
    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Returns the source data.
    #[must_use]
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Returns the records on the current page.
    #[must_use]
    pub fn page_records(&self) -> Vec<&Record> {
        self.view.page_records(&self.data).collect()
    }

    /// Returns every record that passed search and filter, in display order.
    #[must_use]
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.view.filtered_records(&self.data).collect()
    }

    /// Returns the current (clamped) page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Returns the number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.view.total_pages
    }

    /// Returns the number of records after search and filter.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.view.total_records
    }

    /// Returns true if the mount target was found at construction.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns the markup written by the last render, if any.
    #[must_use]
    pub fn last_render(&self) -> Option<&str> {
        self.last_render.as_deref()
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Returns the localized strings.
    #[must_use]
    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    /// Returns the registered batch actions.
    #[must_use]
    pub fn batch_actions(&self) -> &[BatchAction] {
        &self.batch_actions
    }

    pub(crate) fn debouncer_mut(&mut self) -> &mut Debouncer {
        &mut self.debouncer
    }

    /// Paginator positioned on the current page of the last derivation.
    pub(crate) fn paginator(&self) -> Paginator {
        let mut paginator = Paginator::new()
            .per_page(self.state.page_size)
            .total_pages_of(self.view.total_pages);
        paginator.set_page(self.state.current_page);
        paginator
    }

    // Data

    /// Replaces the source data. Clears the selection and returns to page 1.
    pub fn set_data(&mut self, records: Vec<Record>) {
        self.data = records;
        self.state.selection.clear();
        self.state.current_page = 1;
        self.refresh();
    }

    /// Replaces the source data from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidJson`] when `json` does not parse;
    /// the table is left unchanged.
    pub fn set_data_json(&mut self, json: &str) -> crate::Result<()> {
        let records = records_from_json(json)?;
        self.set_data(records);
        Ok(())
    }

    /// Appends records. Page, selection and view parameters are kept.
    pub fn append_data(&mut self, records: Vec<Record>) {
        self.data.extend(records);
        self.refresh();
    }

    /// Appends records from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidJson`] when `json` does not parse.
    pub fn append_data_json(&mut self, json: &str) -> crate::Result<()> {
        let records = records_from_json(json)?;
        self.append_data(records);
        Ok(())
    }

    /// Removes all data, clears the selection and returns to page 1.
    pub fn clear_data(&mut self) {
        self.data.clear();
        self.state.selection.clear();
        self.state.current_page = 1;
        self.refresh();
    }

    // View parameters

    /// Sets the search keyword.
    ///
    /// Typed input still waiting for its debounce tick is dropped.
    pub fn search(&mut self, keyword: impl Into<String>) {
        if self.debouncer.is_pending() {
            trace!("Search replaces pending debounced input");
            self.debouncer.cancel();
        }
        self.state.set_search(keyword);
        self.refresh();
    }

    /// Restricts search to one field. `None` or `""` searches every
    /// searchable column.
    pub fn set_search_field(&mut self, field: Option<&str>) {
        self.state.set_search_field(field.map(str::to_string));
        self.refresh();
    }

    /// Sets a filter. An empty value or `"__all__"` clears it.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.state.set_filter(key, value);
        self.refresh();
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.refresh();
    }

    /// Sorts by `key`, toggling direction when it is already the sort key.
    pub fn set_sort(&mut self, key: &str) {
        self.state.toggle_sort(key);
        self.refresh();
    }

    /// Sets rows per page (0 is treated as 1) and returns to page 1.
    pub fn set_page_size(&mut self, size: usize) {
        self.state.set_page_size(size);
        self.refresh();
    }

    /// Jumps to `page`, clamped into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) {
        self.state.set_page(page, self.view.total_pages);
        self.refresh();
    }

    // Selection

    fn selection_enabled(&self, operation: &str) -> bool {
        if !self.config.selectable {
            debug!("{operation} ignored: selection is disabled");
        }
        self.config.selectable
    }

    fn ids_of<'a>(&self, records: impl Iterator<Item = &'a Record>) -> Vec<String> {
        records
            .filter_map(|r| r.id(&self.config.id_field))
            .collect()
    }

    /// Selects every row on the current page.
    pub fn select_all_on_page(&mut self) {
        if !self.selection_enabled("select_all_on_page") {
            return;
        }
        let ids = self.ids_of(self.view.page_records(&self.data));
        self.state.selection.extend(ids);
        self.render();
    }

    /// Deselects every row on the current page.
    pub fn deselect_all_on_page(&mut self) {
        if !self.selection_enabled("deselect_all_on_page") {
            return;
        }
        let ids = self.ids_of(self.view.page_records(&self.data));
        for id in &ids {
            self.state.selection.remove(id);
        }
        self.render();
    }

    /// Selects every row that passes search and filter, on any page.
    pub fn select_all(&mut self) {
        if !self.selection_enabled("select_all") {
            return;
        }
        let ids = self.ids_of(self.view.filtered_records(&self.data));
        self.state.selection.extend(ids);
        self.render();
    }

    /// Flips the selection of one identifier.
    pub fn toggle_row_selection(&mut self, id: &str) {
        if !self.selection_enabled("toggle_row_selection") {
            return;
        }
        self.state.selection.toggle(id);
        self.render();
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection_enabled("clear_selection") {
            return;
        }
        self.state.selection.clear();
        self.render();
    }

    /// Returns the selected records in source order.
    #[must_use]
    pub fn get_selected_rows(&self) -> Vec<Record> {
        if self.state.selection.is_empty() {
            return Vec::new();
        }
        self.data
            .iter()
            .filter(|r| {
                r.id(&self.config.id_field)
                    .is_some_and(|id| self.state.selection.contains(&id))
            })
            .cloned()
            .collect()
    }

    /// Returns the selected identifiers, sorted.
    #[must_use]
    pub fn get_selected_ids(&self) -> Vec<String> {
        self.state.selection.to_vec()
    }

    // Callbacks

    /// Registers another batch action after construction.
    pub fn add_batch_action(&mut self, action: BatchAction) {
        self.batch_actions.push(action);
        self.render();
    }

    /// Looks up a record with identifier `id` among the filtered records.
    #[must_use]
    pub fn filtered_record(&self, id: &str) -> Option<&Record> {
        self.view
            .filtered_records(&self.data)
            .find(|r| r.id(&self.config.id_field).as_deref() == Some(id))
    }

    /// Invokes the row-click callback for the filtered record with `id`.
    /// Returns true if the callback ran.
    pub fn click_row(&self, id: &str) -> bool {
        let Some(callback) = &self.row_click else {
            return false;
        };
        match self.filtered_record(id) {
            Some(record) => {
                callback(record);
                true
            }
            None => {
                debug!("Row click on unknown id {id:?}");
                false
            }
        }
    }

    /// Runs batch action `index` on the selected records. Returns false when
    /// no such action exists.
    pub fn run_batch_action(&mut self, index: usize) -> bool {
        let Some(action) = self.batch_actions.get(index) else {
            warn!("No batch action at index {index}");
            return false;
        };
        let handler = Arc::clone(&action.handler);
        let rows = self.get_selected_rows();
        debug!("Running batch action {:?} on {} rows", action.label, rows.len());
        handler(&rows, self);
        true
    }

    // Output

    fn refresh(&mut self) {
        self.view = derive(&self.data, &self.config.columns, &self.state);
        self.state.current_page = self.view.current_page;
        self.render();
    }

    /// Renders the table into the host. No-op when not mounted.
    pub fn render(&mut self) {
        if !self.mounted {
            return;
        }
        let html = Projection {
            config: &self.config,
            strings: &self.strings,
            state: &self.state,
            view: &self.view,
            data: &self.data,
            batch_actions: &self.batch_actions,
        }
        .render();
        self.host.set_inner_html(&self.config.container_id, &html);
        self.last_render = Some(html);
    }

    /// Replaces the table with the loading placeholder. No-op when not
    /// mounted.
    pub fn show_loading(&mut self) {
        if !self.mounted {
            return;
        }
        let html = render::loading(&self.config, &self.strings);
        self.host.set_inner_html(&self.config.container_id, &html);
        self.last_render = Some(html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::host::MemoryHost;
    use std::sync::Mutex;

    fn statuses() -> Vec<Record> {
        (1..=25)
            .map(|i| {
                Record::new()
                    .with("id", i)
                    .with("name", format!("user{i:02}"))
                    .with("status", if i <= 15 { "Active" } else { "Inactive" })
            })
            .collect()
    }

    fn table(selectable: bool) -> DataTable {
        let mut config = TableConfig::new(
            "t",
            vec![
                Column::new("id", "ID").sortable(),
                Column::new("name", "Name").sortable().searchable(),
                Column::new("status", "Status").filter_options(["Active", "Inactive"]),
            ],
        );
        config.selectable = selectable;
        DataTable::new(TableOptions::new(config), MemoryHost::with_element("t"))
    }

    #[test]
    fn test_filter_scenario() {
        let mut t = table(false);
        t.set_data(statuses());
        t.set_filter("status", "Active");
        assert_eq!(t.total_records(), 15);
        assert_eq!(t.total_pages(), 1);
        assert_eq!(t.page_records().len(), 15);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut t = table(false);
        t.set_data(statuses());
        t.go_to_page(5);
        assert_eq!(t.current_page(), 2);
        assert_eq!(t.page_records().len(), 5);
        t.go_to_page(0);
        assert_eq!(t.current_page(), 1);
    }

    #[test]
    fn test_set_data_resets_page_and_selection() {
        let mut t = table(true);
        t.set_data(statuses());
        t.go_to_page(2);
        t.toggle_row_selection("3");
        t.set_data(statuses());
        assert_eq!(t.current_page(), 1);
        assert!(t.get_selected_ids().is_empty());
    }

    #[test]
    fn test_append_keeps_page_and_selection() {
        let mut t = table(true);
        t.set_data(statuses());
        t.go_to_page(2);
        t.toggle_row_selection("1");
        t.append_data(vec![Record::new().with("id", 26)]);
        assert_eq!(t.current_page(), 2);
        assert_eq!(t.total_records(), 26);
        assert_eq!(t.get_selected_ids(), vec!["1"]);
    }

    #[test]
    fn test_clear_data() {
        let mut t = table(true);
        t.set_data(statuses());
        t.select_all();
        t.clear_data();
        assert_eq!(t.total_records(), 0);
        assert_eq!(t.total_pages(), 1);
        assert!(t.get_selected_ids().is_empty());
        assert!(t.last_render().unwrap().contains("data-table-empty"));
    }

    #[test]
    fn test_selection_disabled_is_noop() {
        let mut t = table(false);
        t.set_data(statuses());
        t.select_all();
        t.toggle_row_selection("1");
        assert!(t.get_selected_ids().is_empty());
    }

    #[test]
    fn test_selected_rows_in_source_order() {
        let mut t = table(true);
        t.set_data(statuses());
        t.toggle_row_selection("20");
        t.toggle_row_selection("2");
        t.toggle_row_selection("999");
        let ids: Vec<String> = t
            .get_selected_rows()
            .iter()
            .filter_map(|r| r.id("id"))
            .collect();
        assert_eq!(ids, vec!["2", "20"]);
        assert_eq!(t.get_selected_ids(), vec!["2", "20", "999"]);
    }

    #[test]
    fn test_deselect_all_on_page_keeps_other_pages() {
        let mut t = table(true);
        t.set_data(statuses());
        t.select_all();
        t.go_to_page(2);
        t.deselect_all_on_page();
        assert_eq!(t.get_selected_ids().len(), 20);
    }

    #[test]
    fn test_unmounted_table_still_tracks_state() {
        let config = TableConfig::new("missing", vec![Column::new("id", "ID")]);
        let mut t = DataTable::new(TableOptions::new(config), MemoryHost::new());
        assert!(!t.is_mounted());
        t.set_data(statuses());
        t.show_loading();
        assert_eq!(t.total_records(), 25);
        assert_eq!(t.last_render(), None);
    }

    #[test]
    fn test_show_loading() {
        let mut t = table(false);
        t.show_loading();
        assert_eq!(
            t.host().inner_html("t").as_deref(),
            Some(r#"<div class="data-table-loading">Loading...</div>"#)
        );
    }

    #[test]
    fn test_row_click_uses_filtered_rows() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicked);
        let config = TableConfig::new("t", vec![Column::new("status", "Status")]);
        let options = TableOptions::new(config).on_row_click(move |r| {
            sink.lock().unwrap().push(r.id("id").unwrap());
        });
        let mut t = DataTable::new(options, MemoryHost::with_element("t"));
        t.set_data(statuses());
        t.set_filter("status", "Inactive");

        assert!(t.click_row("16"));
        assert!(!t.click_row("1"));
        assert_eq!(*clicked.lock().unwrap(), vec!["16"]);
    }

    #[test]
    fn test_batch_action_gets_selection_and_table() {
        let mut config = TableConfig::new("t", vec![Column::new("id", "ID")]);
        config.selectable = true;
        let options = TableOptions::new(config).batch_action(
            BatchAction::new("Delete", |rows, table| {
                let keep: Vec<Record> = table
                    .data()
                    .iter()
                    .filter(|r| !rows.contains(r))
                    .cloned()
                    .collect();
                table.set_data(keep);
            })
            .style_class("btn-danger"),
        );
        let mut t = DataTable::new(options, MemoryHost::with_element("t"));
        t.set_data(statuses());
        t.toggle_row_selection("1");
        assert!(t.last_render().unwrap().contains(r#"class="batch-btn btn-danger""#));

        assert!(t.run_batch_action(0));
        assert_eq!(t.total_records(), 24);
        assert!(t.get_selected_ids().is_empty());
        assert!(!t.run_batch_action(3));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut t = table(true);
        t.set_data(statuses());
        let first = t.last_render().unwrap().to_string();
        t.render();
        assert_eq!(t.last_render().unwrap(), first);
    }

    #[test]
    fn test_invalid_json_leaves_table_unchanged() {
        let mut t = table(false);
        t.set_data(statuses());
        assert!(t.set_data_json("[{").is_err());
        assert_eq!(t.total_records(), 25);
        t.set_data_json(r#"[{"id": 1}]"#).unwrap();
        assert_eq!(t.total_records(), 1);
    }
}
