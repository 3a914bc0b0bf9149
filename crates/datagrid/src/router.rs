//! Interaction routing.
//!
//! Rendered controls report user actions as [`Event`]s. [`DataTable::handle`]
//! maps each one onto the matching mutator. The only event that needs the
//! host's help is search input, which returns a [`Cmd`] asking for a delayed
//! tick.
//!
//! Events are JSON-friendly so a browser shim can forward them verbatim:
//!
//! ```rust
//! use datagrid::router::{Event, PageTarget};
//!
//! let event: Event = serde_json::from_str(r#"{"type":"pageClicked","target":"next"}"#).unwrap();
//! assert_eq!(event, Event::PageClicked { target: PageTarget::Next });
//!
//! let event: Event = serde_json::from_str(r#"{"type":"rowClicked","rowId":"7"}"#).unwrap();
//! assert_eq!(event, Event::RowClicked { row_id: "7".into(), from_checkbox: false });
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::Result;
use crate::table::DataTable;

/// Target of a pagination button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageTargetRepr", into = "PageTargetRepr")]
pub enum PageTarget {
    /// One page back.
    Prev,
    /// One page forward.
    Next,
    /// A specific page.
    Page(usize),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PageTargetRepr {
    Number(usize),
    Text(String),
}

impl From<PageTarget> for PageTargetRepr {
    fn from(target: PageTarget) -> Self {
        match target {
            PageTarget::Page(n) => Self::Number(n),
            other => Self::Text(other.to_string()),
        }
    }
}

impl TryFrom<PageTargetRepr> for PageTarget {
    type Error = String;

    fn try_from(repr: PageTargetRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PageTargetRepr::Number(n) => Ok(Self::Page(n)),
            PageTargetRepr::Text(text) => text.parse(),
        }
    }
}

impl FromStr for PageTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "prev" => Ok(Self::Prev),
            "next" => Ok(Self::Next),
            other => other
                .parse()
                .map(Self::Page)
                .map_err(|_| format!("invalid page target: {other:?}")),
        }
    }
}

impl fmt::Display for PageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prev => write!(f, "prev"),
            Self::Next => write!(f, "next"),
            Self::Page(n) => write!(f, "{n}"),
        }
    }
}

/// A user interaction with the rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// A keystroke in the search box.
    SearchInput {
        /// Current text of the box.
        value: String,
    },
    /// The debounce tick scheduled by [`Cmd::Debounce`] fired.
    SearchDebounceElapsed {
        /// Tag carried by the command.
        tag: u64,
    },
    /// The search scope selector changed; `""` means all fields.
    SearchScopeChanged {
        /// Selected column key.
        value: String,
    },
    /// A filter dropdown changed.
    FilterChanged {
        /// Column key.
        key: String,
        /// Selected option value.
        value: String,
    },
    /// The page-size selector changed.
    PageSizeChanged {
        /// Selected option, as text.
        value: String,
    },
    /// A header cell was clicked.
    HeaderClicked {
        /// Column key.
        column: String,
    },
    /// A pagination button was clicked.
    PageClicked {
        /// Which button.
        target: PageTarget,
    },
    /// A body row was clicked.
    RowClicked {
        /// `data-row-id` of the row.
        #[serde(rename = "rowId")]
        row_id: String,
        /// True when the click landed on the row's checkbox.
        #[serde(default, rename = "fromCheckbox")]
        from_checkbox: bool,
    },
    /// The header checkbox was toggled.
    SelectAllToggled {
        /// New checkbox state.
        checked: bool,
    },
    /// A row checkbox was toggled.
    RowCheckboxToggled {
        /// `data-row-id` of the row.
        #[serde(rename = "rowId")]
        row_id: String,
    },
    /// A batch-action button was clicked.
    BatchActionClicked {
        /// Position of the action in registration order.
        index: usize,
    },
    /// The clear-selection button was clicked.
    ClearSelectionClicked,
}

impl Event {
    /// Parses an event from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidJson`](crate::DatagridError::InvalidJson)
    /// for malformed or unknown events.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Work the host must perform on the table's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Cmd {
    /// Deliver `Event::SearchDebounceElapsed { tag }` after the delay.
    Debounce {
        /// Tag to send back.
        tag: u64,
        /// Delay in milliseconds.
        #[serde(rename = "delayMs")]
        delay_ms: u64,
    },
}

impl Cmd {
    /// Returns the delay before the host should respond.
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self {
            Self::Debounce { delay_ms, .. } => Duration::from_millis(*delay_ms),
        }
    }

    /// Returns the event the host should deliver once the delay has passed.
    #[must_use]
    pub fn follow_up(&self) -> Event {
        match self {
            Self::Debounce { tag, .. } => Event::SearchDebounceElapsed { tag: *tag },
        }
    }
}

impl DataTable {
    /// Applies one interaction. Returns a command when the host has to
    /// schedule follow-up work.
    pub fn handle(&mut self, event: Event) -> Option<Cmd> {
        trace!("Handling {event:?}");
        match event {
            Event::SearchInput { value } => {
                let tick = self.debouncer_mut().input(value);
                let delay_ms = u64::try_from(tick.delay.as_millis()).unwrap_or(u64::MAX);
                return Some(Cmd::Debounce {
                    tag: tick.tag,
                    delay_ms,
                });
            }
            Event::SearchDebounceElapsed { tag } => match self.debouncer_mut().elapsed(tag) {
                Some(keyword) => self.search(keyword),
                None => trace!("Ignoring stale debounce tick {tag}"),
            },
            Event::SearchScopeChanged { value } => self.set_search_field(Some(&value)),
            Event::FilterChanged { key, value } => self.set_filter(key, value),
            Event::PageSizeChanged { value } => match value.trim().parse::<usize>() {
                Ok(size) => self.set_page_size(size),
                Err(err) => warn!("Ignoring page size {value:?}: {err}"),
            },
            Event::HeaderClicked { column } => {
                let sortable = self.config().column(&column).is_some_and(|c| c.sortable);
                if sortable {
                    self.set_sort(&column);
                } else {
                    trace!("Header {column:?} is not sortable");
                }
            }
            Event::PageClicked { target } => {
                let page = match target {
                    PageTarget::Prev => {
                        let mut paginator = self.paginator();
                        paginator.prev_page();
                        paginator.page()
                    }
                    PageTarget::Next => {
                        let mut paginator = self.paginator();
                        paginator.next_page();
                        paginator.page()
                    }
                    PageTarget::Page(n) => n,
                };
                self.go_to_page(page);
            }
            Event::RowClicked {
                row_id,
                from_checkbox,
            } => {
                if !from_checkbox {
                    self.click_row(&row_id);
                }
            }
            Event::SelectAllToggled { checked } => {
                if checked {
                    self.select_all_on_page();
                } else {
                    self.deselect_all_on_page();
                }
            }
            Event::RowCheckboxToggled { row_id } => self.toggle_row_selection(&row_id),
            Event::BatchActionClicked { index } => {
                self.run_batch_action(index);
            }
            Event::ClearSelectionClicked => self.clear_selection(),
        }
        None
    }

    /// Parses and applies a JSON-encoded event.
    ///
    /// # Errors
    ///
    /// Returns [`DatagridError::InvalidJson`](crate::DatagridError::InvalidJson)
    /// when the event does not parse; the table is left unchanged.
    pub fn handle_json(&mut self, json: &str) -> Result<Option<Cmd>> {
        let event = Event::from_json(json)?;
        Ok(self.handle(event))
    }
}
