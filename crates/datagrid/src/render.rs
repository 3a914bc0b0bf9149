//! HTML projection.
//!
//! Everything here is a pure function from already-derived state to markup.
//! Field values and configured text are escaped; output of a custom
//! [`CellRenderer`](crate::column::CellRenderer) is inserted as-is.

use std::borrow::Cow;

use crate::column::Column;
use crate::config::{FilterLayout, TableConfig};
use crate::derive::DerivedView;
use crate::i18n::{Key, Strings};
use crate::paginator::{DEFAULT_WINDOW, PageItem, Paginator};
use crate::record::Record;
use crate::state::{ALL_FILTER, ViewState};
use crate::table::BatchAction;

/// Inputs of one projection.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    /// Table configuration.
    pub config: &'a TableConfig,
    /// Localized strings.
    pub strings: &'a Strings,
    /// Current view state.
    pub state: &'a ViewState,
    /// Result of the last derivation.
    pub view: &'a DerivedView,
    /// Source data the view indexes into.
    pub data: &'a [Record],
    /// Registered batch actions.
    pub batch_actions: &'a [BatchAction],
}

impl Projection<'_> {
    /// Renders the complete table.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = vec![
            r#"<div class="data-table-wrapper">"#.to_string(),
            self.toolbar(),
        ];
        if self.config.filter_layout == FilterLayout::Stacked {
            let filters = self.filters();
            if !filters.is_empty() {
                parts.push(format!(r#"<div class="data-table-filters">{filters}</div>"#));
            }
        }
        if let Some(bar) = self.batch_bar() {
            parts.push(bar);
        }
        parts.push(self.table());
        if let Some(pagination) = self.pagination() {
            parts.push(pagination);
        }
        parts.push("</div>".to_string());
        parts.join("\n")
    }

    fn text(&self, key: Key) -> String {
        escape_html(&self.strings.get(key))
    }

    fn toolbar(&self) -> String {
        let search = format!(
            r#"<input type="text" class="data-table-search" placeholder="{}" value="{}">"#,
            self.text(Key::SearchPlaceholder),
            escape_html(&self.state.search_keyword),
        );
        let scope = if self.config.search_scope_selector {
            self.search_scope()
        } else {
            String::new()
        };
        let filters = match self.config.filter_layout {
            FilterLayout::Inline => self.filters(),
            FilterLayout::Stacked => String::new(),
        };

        format!(
            concat!(
                r#"<div class="data-table-toolbar">"#,
                r#"<div class="toolbar-left">{}{}{}</div>"#,
                r#"<div class="toolbar-right">{}{}</div>"#,
                "</div>"
            ),
            search,
            scope,
            filters,
            self.page_size_selector(),
            self.record_count(),
        )
    }

    fn search_scope(&self) -> String {
        let current = self.state.search_field.as_deref().unwrap_or("");
        let mut options = vec![format!(
            r#"<option value=""{}>{}</option>"#,
            selected_attr(current.is_empty()),
            self.text(Key::SearchAllFields)
        )];
        options.extend(self.config.searchable_columns().map(|col| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(&col.key),
                selected_attr(col.key == current),
                escape_html(&col.label)
            )
        }));
        format!(
            r#"<select class="data-table-search-field">{}</select>"#,
            options.concat()
        )
    }

    fn filters(&self) -> String {
        self.config
            .columns
            .iter()
            .filter(|col| col.has_filter())
            .map(|col| self.filter_select(col))
            .collect()
    }

    fn filter_select(&self, col: &Column) -> String {
        let current = self.state.filter(&col.key).unwrap_or(ALL_FILTER);
        let label: Cow<'_, str> = match &col.filter_label {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(format!("{}{}", self.config.filter_label_prefix, col.label)),
        };

        let mut options = vec![format!(
            r#"<option value="{ALL_FILTER}">{} ({})</option>"#,
            escape_html(&label),
            self.text(Key::All)
        )];
        options.extend(col.filter_options.iter().flatten().map(|opt| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(&opt.value),
                selected_attr(opt.value == current),
                escape_html(&opt.label)
            )
        }));

        format!(
            r#"<select class="data-table-filter" data-filter-key="{}">{}</select>"#,
            escape_html(&col.key),
            options.concat()
        )
    }

    fn page_size_selector(&self) -> String {
        let options: String = self
            .config
            .page_sizes
            .iter()
            .map(|size| {
                format!(
                    r#"<option value="{size}"{}>{size}</option>"#,
                    selected_attr(*size == self.state.page_size)
                )
            })
            .collect();
        format!(
            r#"<label>{} <select class="data-table-pagesize">{options}</select></label>"#,
            self.text(Key::PerPage)
        )
    }

    fn record_count(&self) -> String {
        format!(
            r#"<span class="data-table-info">{} {} {}</span>"#,
            self.text(Key::Total),
            self.view.total_records,
            self.text(Key::Records)
        )
    }

    fn batch_bar(&self) -> Option<String> {
        let selected = self.state.selection.len();
        if !self.config.selectable || selected == 0 {
            return None;
        }
        let actions: String = self
            .batch_actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                format!(
                    r#"<button class="batch-btn {}" data-batch-index="{index}">{}</button>"#,
                    escape_html(&action.style_class),
                    escape_html(&action.label)
                )
            })
            .collect();
        Some(format!(
            concat!(
                r#"<div class="data-table-batch-bar">"#,
                r#"<span class="batch-info">{} {} {}</span>"#,
                r#"<button class="batch-btn batch-clear" data-action="clear-selection">{}</button>"#,
                "{}",
                "</div>"
            ),
            self.text(Key::Selected),
            selected,
            self.text(Key::Items),
            self.text(Key::ClearSelection),
            actions
        ))
    }

    fn table(&self) -> String {
        format!(
            concat!(
                r#"<table class="data-table">"#,
                "<thead><tr>{}</tr></thead>",
                "<tbody>{}</tbody>",
                "</table>"
            ),
            self.header_row(),
            self.body()
        )
    }

    fn header_row(&self) -> String {
        let mut cells = Vec::with_capacity(self.config.columns.len() + 1);
        if self.config.selectable {
            cells.push(format!(
                r#"<th class="data-table-th data-table-select"><input type="checkbox" class="data-table-select-all"{}></th>"#,
                checked_attr(self.page_fully_selected())
            ));
        }
        cells.extend(self.config.columns.iter().map(|col| self.header_cell(col)));
        cells.concat()
    }

    fn header_cell(&self, col: &Column) -> String {
        let mut class = String::from("data-table-th");
        let mut indicator = String::new();
        if col.sortable {
            class.push_str(" sortable");
            if let Some(direction) = self.state.sort_direction_for(&col.key) {
                indicator = format!(" {}", direction.indicator());
            }
        }
        format!(
            r#"<th class="{class}" data-column="{}" data-sortable="{}">{}{indicator}</th>"#,
            escape_html(&col.key),
            col.sortable,
            escape_html(&col.label)
        )
    }

    /// True when the page has rows and every one of them is selected.
    fn page_fully_selected(&self) -> bool {
        let mut rows = self.view.page_records(self.data).peekable();
        rows.peek().is_some()
            && rows.all(|record| {
                record
                    .id(&self.config.id_field)
                    .is_some_and(|id| self.state.selection.contains(&id))
            })
    }

    fn body(&self) -> String {
        if self.view.is_page_empty() {
            let span = self.config.columns.len() + usize::from(self.config.selectable);
            let message = match &self.config.empty_message {
                Some(message) => escape_html(message),
                None => self.text(Key::Empty),
            };
            return format!(r#"<tr><td colspan="{span}" class="data-table-empty">{message}</td></tr>"#);
        }
        self.view
            .page_records(self.data)
            .map(|record| self.row(record))
            .collect()
    }

    fn row(&self, record: &Record) -> String {
        let id = record.id(&self.config.id_field);
        let id_attr = escape_html(id.as_deref().unwrap_or(""));
        let selected = id
            .as_deref()
            .is_some_and(|id| self.state.selection.contains(id));

        let mut cells = Vec::with_capacity(self.config.columns.len() + 1);
        if self.config.selectable {
            let disabled = if id.is_none() { " disabled" } else { "" };
            cells.push(format!(
                r#"<td class="data-table-select"><input type="checkbox" class="data-table-row-select" data-row-id="{id_attr}"{}{disabled}></td>"#,
                checked_attr(selected)
            ));
        }
        cells.extend(
            self.config
                .columns
                .iter()
                .map(|col| format!("<td>{}</td>", cell_content(col, record))),
        );

        let class = if selected {
            "data-table-row selected"
        } else {
            "data-table-row"
        };
        format!(
            r#"<tr class="{class}" data-row-id="{id_attr}">{}</tr>"#,
            cells.concat()
        )
    }

    fn pagination(&self) -> Option<String> {
        let total = self.view.total_pages;
        if total <= 1 {
            return None;
        }
        let current = self.view.current_page;
        let mut paginator = Paginator::new().total_pages_of(total);
        paginator.set_page(current);

        let pages: String = paginator
            .window(DEFAULT_WINDOW)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(n) => {
                    let class = if n == current { "page-btn active" } else { "page-btn" };
                    format!(r#"<button class="{class}" data-page="{n}">{n}</button>"#)
                }
                PageItem::Ellipsis => r#"<span class="page-ellipsis">...</span>"#.to_string(),
            })
            .collect();

        Some(format!(
            concat!(
                r#"<div class="data-table-pagination">"#,
                r#"<button class="page-btn" data-page="prev"{}>{}</button>"#,
                "{}",
                r#"<button class="page-btn" data-page="next"{}>{}</button>"#,
                "</div>"
            ),
            disabled_attr(paginator.on_first_page()),
            self.text(Key::Prev),
            pages,
            disabled_attr(paginator.on_last_page()),
            self.text(Key::Next),
        ))
    }
}

/// Markup shown while data is loading.
#[must_use]
pub fn loading(config: &TableConfig, strings: &Strings) -> String {
    let message = match &config.loading_message {
        Some(message) => escape_html(message),
        None => escape_html(&strings.get(Key::Loading)),
    };
    format!(r#"<div class="data-table-loading">{message}</div>"#)
}

/// Content of one body cell.
#[must_use]
pub fn cell_content(col: &Column, record: &Record) -> String {
    match &col.renderer {
        Some(renderer) => renderer.render(record),
        None => record
            .text(&col.key)
            .map(|text| escape_html(&text))
            .unwrap_or_default(),
    }
}

/// Escapes `& < > " '` for use in element content and attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn selected_attr(on: bool) -> &'static str {
    if on { " selected" } else { "" }
}

fn checked_attr(on: bool) -> &'static str {
    if on { " checked" } else { "" }
}

fn disabled_attr(on: bool) -> &'static str {
    if on { " disabled" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;

    fn config() -> TableConfig {
        TableConfig::new(
            "t",
            vec![
                Column::new("id", "ID").sortable(),
                Column::new("name", "Name").searchable(),
                Column::new("status", "Status").filter_options(["Active", "Inactive"]),
            ],
        )
    }

    fn data(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new()
                    .with("id", i)
                    .with("name", format!("user{i}"))
                    .with("status", "Active")
            })
            .collect()
    }

    fn project(config: &TableConfig, state: &ViewState, data: &[Record]) -> String {
        let strings = Strings::new();
        let view = derive(data, &config.columns, state);
        Projection {
            config,
            strings: &strings,
            state,
            view: &view,
            data,
            batch_actions: &[],
        }
        .render()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_toolbar_and_count() {
        let cfg = config();
        let html = project(&cfg, &ViewState::new(20), &data(3));
        assert!(html.starts_with(r#"<div class="data-table-wrapper">"#));
        assert!(html.contains(r#"placeholder="Search...""#));
        assert!(html.contains(r#"<option value="20" selected>20</option>"#));
        assert!(html.contains(r#"<span class="data-table-info">Total 3 records</span>"#));
        assert!(html.contains(r#"<option value="__all__">Status (All)</option>"#));
        assert!(!html.contains("data-table-pagination"));
        assert!(!html.contains("data-table-search-field"));
    }

    #[test]
    fn test_search_value_is_escaped() {
        let cfg = config();
        let mut state = ViewState::new(20);
        state.set_search(r#""><script>"#);
        let html = project(&cfg, &state, &data(3));
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
    }

    #[test]
    fn test_header_sort_indicator() {
        let cfg = config();
        let mut state = ViewState::new(20);
        state.toggle_sort("id");
        let html = project(&cfg, &state, &data(2));
        assert!(html.contains(
            r#"<th class="data-table-th sortable" data-column="id" data-sortable="true">ID ▲</th>"#
        ));
        assert!(html.contains(
            r#"<th class="data-table-th" data-column="name" data-sortable="false">Name</th>"#
        ));
    }

    #[test]
    fn test_empty_row_spans_columns() {
        let mut cfg = config();
        cfg.selectable = true;
        let html = project(&cfg, &ViewState::new(20), &[]);
        assert!(html.contains(r#"<td colspan="4" class="data-table-empty">No data</td>"#));
        assert!(!html.contains("data-table-select-all\" checked"));
    }

    #[test]
    fn test_pagination_markup() {
        let cfg = config();
        let mut state = ViewState::new(1);
        state.current_page = 1;
        let html = project(&cfg, &state, &data(10));
        assert!(html.contains(r#"<button class="page-btn" data-page="prev" disabled>Previous</button>"#));
        assert!(html.contains(r#"<button class="page-btn active" data-page="1">1</button>"#));
        assert!(html.contains(r#"<span class="page-ellipsis">...</span><button class="page-btn" data-page="10">10</button>"#));
        assert!(html.contains(r#"<button class="page-btn" data-page="next">Next</button>"#));
    }

    #[test]
    fn test_stacked_filters_get_their_own_row() {
        let mut cfg = config();
        cfg.filter_layout = FilterLayout::Stacked;
        let html = project(&cfg, &ViewState::new(20), &data(1));
        assert!(html.contains(r#"<div class="data-table-filters"><select class="data-table-filter""#));
        assert!(html.contains(r#"<div class="toolbar-left"><input"#));
        assert!(html.contains(r#"value=""></div>"#));
    }

    #[test]
    fn test_custom_renderer_is_not_escaped() {
        let col = Column::new("name", "Name").renderer(|r: &Record| {
            format!("<b>{}</b>", r.text("name").unwrap_or_default())
        });
        let record = Record::new().with("name", "x");
        assert_eq!(cell_content(&col, &record), "<b>x</b>");
        let plain = Column::new("name", "Name");
        let record = Record::new().with("name", "<i>");
        assert_eq!(cell_content(&plain, &record), "&lt;i&gt;");
        assert_eq!(cell_content(&plain, &Record::new()), "");
    }

    #[test]
    fn test_loading_markup() {
        let mut cfg = config();
        assert_eq!(
            loading(&cfg, &Strings::new()),
            r#"<div class="data-table-loading">Loading...</div>"#
        );
        cfg.loading_message = Some("Fetching <rows>".into());
        assert_eq!(
            loading(&cfg, &Strings::new()),
            r#"<div class="data-table-loading">Fetching &lt;rows&gt;</div>"#
        );
    }

    #[test]
    fn test_render_snapshot() {
        let mut cfg = config();
        cfg.selectable = true;
        cfg.search_scope_selector = true;
        let mut state = ViewState::new(20);
        state.selection.insert("2");
        let html = project(&cfg, &state, &data(2));
        insta::assert_snapshot!(html, @r#"
        <div class="data-table-wrapper">
        <div class="data-table-toolbar"><div class="toolbar-left"><input type="text" class="data-table-search" placeholder="Search..." value=""><select class="data-table-search-field"><option value="" selected>All fields</option><option value="name">Name</option></select><select class="data-table-filter" data-filter-key="status"><option value="__all__">Status (All)</option><option value="Active">Active</option><option value="Inactive">Inactive</option></select></div><div class="toolbar-right"><label>Per page: <select class="data-table-pagesize"><option value="20" selected>20</option><option value="50">50</option><option value="100">100</option></select></label><span class="data-table-info">Total 2 records</span></div></div>
        <div class="data-table-batch-bar"><span class="batch-info">Selected 1 items</span><button class="batch-btn batch-clear" data-action="clear-selection">Clear selection</button></div>
        <table class="data-table"><thead><tr><th class="data-table-th data-table-select"><input type="checkbox" class="data-table-select-all"></th><th class="data-table-th sortable" data-column="id" data-sortable="true">ID</th><th class="data-table-th" data-column="name" data-sortable="false">Name</th><th class="data-table-th" data-column="status" data-sortable="false">Status</th></tr></thead><tbody><tr class="data-table-row" data-row-id="1"><td class="data-table-select"><input type="checkbox" class="data-table-row-select" data-row-id="1"></td><td>1</td><td>user1</td><td>Active</td></tr><tr class="data-table-row selected" data-row-id="2"><td class="data-table-select"><input type="checkbox" class="data-table-row-select" data-row-id="2" checked></td><td>2</td><td>user2</td><td>Active</td></tr></tbody></table>
        </div>
        "#);
    }
}
