//! Transient notifications.
//!
//! Independent of any table. A [`ToastStack`] keeps the visible toasts,
//! expires them against a caller-supplied clock and renders them into the
//! [`TOAST_CONTAINER_ID`] element of a [`Host`].
//!
//! Time is passed in as a [`Duration`] since an arbitrary origin (for example
//! `performance.now()` in a browser), so the stack never reads a clock
//! itself.
//!
//! ```rust
//! use datagrid::host::{Host, MemoryHost};
//! use datagrid::toast::{Toast, ToastLevel, ToastStack, TOAST_CONTAINER_ID};
//! use std::time::Duration;
//!
//! let mut host = MemoryHost::with_element(TOAST_CONTAINER_ID);
//! let mut stack = ToastStack::new();
//! stack.notify(&mut host, Toast::new("Saved", ToastLevel::Success), Duration::ZERO);
//! assert!(host.inner_html(TOAST_CONTAINER_ID).unwrap().contains("toast-success"));
//!
//! stack.notify_expired(&mut host, Duration::from_secs(5));
//! assert_eq!(host.inner_html(TOAST_CONTAINER_ID).unwrap(), "");
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::host::Host;
use crate::render::escape_html;

/// Element id toasts render into.
pub const TOAST_CONTAINER_ID: &str = "datagrid-toasts";

/// How long a toast stays up unless told otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Maximum number of toasts shown at once.
pub const MAX_TOASTS: usize = 5;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Something needs attention.
    Warning,
    /// Neutral information.
    #[default]
    Info,
}

impl ToastLevel {
    /// Name used in the CSS class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!("unknown toast level: {other}")),
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text to show. Escaped on render.
    pub message: String,
    /// Severity.
    pub level: ToastLevel,
    /// Time on screen.
    pub duration: Duration,
}

impl Toast {
    /// Creates a toast with the default duration.
    #[must_use]
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Creates a success toast.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    /// Creates an error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    /// Creates a warning toast.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Warning)
    }

    /// Creates an info toast.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    /// Sets the display duration (builder pattern).
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Renders the toast.
    #[must_use]
    pub fn view(&self) -> String {
        format!(
            r#"<div class="toast toast-{}">{}</div>"#,
            self.level,
            escape_html(&self.message)
        )
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    toast: Toast,
    expires_at: Duration,
}

/// Visible toasts, oldest first.
#[derive(Debug, Clone)]
pub struct ToastStack {
    entries: Vec<Entry>,
    next_id: u64,
    max: usize,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStack {
    /// Creates an empty stack holding at most [`MAX_TOASTS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            max: MAX_TOASTS,
        }
    }

    /// Sets the maximum number of visible toasts (builder pattern).
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max.max(1);
        self
    }

    /// Adds a toast shown at `now`. Returns its id. The oldest toasts are
    /// dropped when the stack is full.
    pub fn push(&mut self, toast: Toast, now: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let expires_at = now.saturating_add(toast.duration);
        self.entries.push(Entry {
            id,
            toast,
            expires_at,
        });

        // Keep only the most recent toasts
        while self.entries.len() > self.max {
            self.entries.remove(0);
        }
        id
    }

    /// Removes toasts whose time is up. Returns how many were removed.
    pub fn prune(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.expires_at > now);
        before - self.entries.len()
    }

    /// Removes a toast by id.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Removes every toast.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of visible toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over visible toasts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter().map(|e| &e.toast)
    }

    /// Time at which the next toast expires.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.expires_at).min()
    }

    /// Renders every visible toast.
    #[must_use]
    pub fn view(&self) -> String {
        self.iter().map(Toast::view).collect()
    }

    /// Prunes, pushes `toast` and writes the stack into the host's toast
    /// container. Returns the toast id.
    pub fn notify(&mut self, host: &mut dyn Host, toast: Toast, now: Duration) -> u64 {
        self.prune(now);
        let id = self.push(toast, now);
        self.flush(host);
        id
    }

    /// Prunes and re-renders without adding anything. Meant to be called
    /// when the timer for [`next_expiry`](Self::next_expiry) fires.
    pub fn notify_expired(&mut self, host: &mut dyn Host, now: Duration) {
        if self.prune(now) > 0 {
            self.flush(host);
        }
    }

    fn flush(&self, host: &mut dyn Host) {
        if !host.set_inner_html(TOAST_CONTAINER_ID, &self.view()) {
            warn!("Toast container #{TOAST_CONTAINER_ID} not found");
        }
    }
}
