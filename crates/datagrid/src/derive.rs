//! The derivation pipeline: search, filter, sort, paginate.
//!
//! [`derive`] is a pure function of the source data, the column schema and
//! the view state. Its output refers to records by their index in the source
//! slice, so nothing is copied and nothing is mutated.
//!
//! # Example
//!
//! ```rust
//! use datagrid::column::Column;
//! use datagrid::derive::derive;
//! use datagrid::record::Record;
//! use datagrid::state::ViewState;
//!
//! let data: Vec<Record> = (1..=25)
//!     .map(|i| Record::new().with("id", i).with("status", if i <= 15 { "Active" } else { "Inactive" }))
//!     .collect();
//! let columns = vec![Column::new("status", "Status").filter_options(["Active", "Inactive"])];
//!
//! let mut state = ViewState::new(20);
//! state.set_filter("status", "Active");
//!
//! let view = derive(&data, &columns, &state);
//! assert_eq!(view.total_records, 15);
//! assert_eq!(view.total_pages, 1);
//! assert_eq!(view.page_indices().len(), 15);
//! ```

use std::cmp::Ordering;

use tracing::debug;

use crate::column::Column;
use crate::paginator::Paginator;
use crate::record::{Record, Value};
use crate::state::{SortDirection, ViewState};

/// Result of one derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    /// Indices into the source data, after search, filter and sort.
    pub filtered: Vec<usize>,
    /// Start of the current page within `filtered`.
    pub page_start: usize,
    /// End (exclusive) of the current page within `filtered`.
    pub page_end: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Number of records that passed search and filter.
    pub total_records: usize,
    /// The page that was sliced, clamped into `[1, total_pages]`.
    pub current_page: usize,
}

impl Default for DerivedView {
    fn default() -> Self {
        Self::empty()
    }
}

impl DerivedView {
    /// The view of an empty dataset.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            filtered: Vec::new(),
            page_start: 0,
            page_end: 0,
            total_pages: 1,
            total_records: 0,
            current_page: 1,
        }
    }

    /// Source indices of the rows on the current page.
    #[must_use]
    pub fn page_indices(&self) -> &[usize] {
        &self.filtered[self.page_start..self.page_end]
    }

    /// Records on the current page, in display order.
    pub fn page_records<'a>(&'a self, data: &'a [Record]) -> impl Iterator<Item = &'a Record> {
        self.page_indices().iter().filter_map(move |&i| data.get(i))
    }

    /// Every record that passed search and filter, in display order.
    pub fn filtered_records<'a>(
        &'a self,
        data: &'a [Record],
    ) -> impl Iterator<Item = &'a Record> {
        self.filtered.iter().filter_map(move |&i| data.get(i))
    }

    /// Returns true when the current page has no rows.
    #[must_use]
    pub fn is_page_empty(&self) -> bool {
        self.page_start == self.page_end
    }
}

/// Runs the full pipeline.
#[must_use]
pub fn derive(data: &[Record], columns: &[Column], state: &ViewState) -> DerivedView {
    let mut filtered: Vec<usize> = (0..data.len()).collect();

    // Search
    let needle = state.search_keyword.to_lowercase();
    if !needle.is_empty() {
        let fields: Vec<&str> = match &state.search_field {
            Some(field) => vec![field.as_str()],
            None => columns
                .iter()
                .filter(|c| c.searchable)
                .map(|c| c.key.as_str())
                .collect(),
        };
        filtered.retain(|&i| matches_search(&data[i], &fields, &needle));
    }

    // Filter
    if !state.filters.is_empty() {
        filtered.retain(|&i| {
            state
                .filters
                .iter()
                .all(|(key, value)| matches_filter(&data[i], key, value))
        });
    }

    // Sort
    if let Some(sort) = &state.sort {
        sort_indices(data, &mut filtered, &sort.key, sort.direction);
    }

    // Paginate
    let mut paginator = Paginator::new().per_page(state.page_size);
    let total_records = filtered.len();
    let total_pages = paginator.set_total_pages_from_items(total_records);
    paginator.set_page(state.current_page);
    let (page_start, page_end) = paginator.get_slice_bounds(total_records);

    debug!(
        "Derived view: {} of {} records, {} on page {}/{}",
        total_records,
        data.len(),
        paginator.items_on_page(total_records),
        paginator.page(),
        total_pages
    );

    DerivedView {
        filtered,
        page_start,
        page_end,
        total_pages,
        total_records,
        current_page: paginator.page(),
    }
}

/// True if any candidate field contains `needle` (already lowercased).
fn matches_search(record: &Record, fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|field| {
        record
            .text(field)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

/// True if the field's string form equals `value` exactly.
fn matches_filter(record: &Record, key: &str, value: &str) -> bool {
    record.text(key).is_some_and(|text| text == value)
}

/// Precomputed comparison key for one record.
struct SortKey {
    number: Option<f64>,
    /// Lowercased string form; `None` for absent/null.
    text: Option<String>,
}

impl SortKey {
    fn of(value: Option<&Value>) -> Self {
        let value = value.filter(|v| !v.is_null());
        Self {
            number: value.and_then(Value::as_number),
            text: value.and_then(Value::to_text).map(|t| t.to_lowercase()),
        }
    }
}

/// Stable sort of `indices` by the field `key`.
///
/// Numbers compare numerically only when every non-null key in the run is a
/// number. A column that mixes numbers and text compares everything by its
/// lowercased string form, which keeps the order total.
fn sort_indices(data: &[Record], indices: &mut Vec<usize>, key: &str, direction: SortDirection) {
    let mut keyed: Vec<(usize, SortKey)> = indices
        .iter()
        .map(|&i| (i, SortKey::of(data[i].get(key))))
        .collect();
    let mode = CompareMode::for_keys(keyed.iter().map(|(_, k)| k));

    // `sort_by` is stable: equal keys keep their input order.
    keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b, mode, direction));

    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}

/// How non-null keys of one sort run are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareMode {
    Numeric,
    Text,
}

impl CompareMode {
    fn for_keys<'a>(mut keys: impl Iterator<Item = &'a SortKey>) -> Self {
        if keys.all(|k| k.text.is_none() || k.number.is_some()) {
            Self::Numeric
        } else {
            Self::Text
        }
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, mode: CompareMode, direction: SortDirection) -> Ordering {
    let (a_text, b_text) = match (&a.text, &b.text) {
        (None, None) => return Ordering::Equal,
        // Nulls last, regardless of direction.
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a_text), Some(b_text)) => (a_text, b_text),
    };

    let ordering = match (mode, a.number, b.number) {
        (CompareMode::Numeric, Some(x), Some(y)) => x.total_cmp(&y),
        _ => a_text.cmp(b_text),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Compares two field values the way the sort stage does for a run made of
/// just these two values.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let (a, b) = (SortKey::of(a), SortKey::of(b));
    let mode = CompareMode::for_keys([&a, &b].into_iter());
    compare_keys(&a, &b, mode, direction)
}
