//! Tagged debounce for search input.
//!
//! Every keystroke stores the pending value and bumps a tag. The host is
//! asked to deliver a tick after the quiet period; a tick whose tag is not
//! the latest one is stale and ignored, so only the last keystroke of a burst
//! reaches the table.
//!
//! # Example
//!
//! ```rust
//! use datagrid::debounce::Debouncer;
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! let first = debouncer.input("a");
//! let second = debouncer.input("ab");
//!
//! assert_eq!(debouncer.elapsed(first.tag), None);
//! assert_eq!(debouncer.elapsed(second.tag).as_deref(), Some("ab"));
//! ```

use std::time::Duration;

/// Request to deliver a tick after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Tag to hand back to [`Debouncer::elapsed`].
    pub tag: u64,
    /// Quiet period.
    pub delay: Duration,
}

/// Debounce state machine.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    /// Tag of the latest input.
    tag: u64,
    pending: Option<String>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tag: 0,
            pending: None,
        }
    }

    /// Returns true while an input is waiting for its tick.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records an input and returns the tick to schedule.
    pub fn input(&mut self, value: impl Into<String>) -> Tick {
        self.tag = self.tag.wrapping_add(1);
        self.pending = Some(value.into());
        Tick {
            tag: self.tag,
            delay: self.delay,
        }
    }

    /// Handles a delivered tick. Returns the value to apply when `tag` is
    /// current, `None` for stale or duplicate ticks.
    pub fn elapsed(&mut self, tag: u64) -> Option<String> {
        // Reject old tags
        if tag != self.tag {
            return None;
        }
        self.pending.take()
    }

    /// Drops any pending input. Outstanding ticks become stale.
    pub fn cancel(&mut self) {
        self.tag = self.tag.wrapping_add(1);
        self.pending = None;
    }
}
