//! Render targets.
//!
//! A [`Host`] is whatever the table writes its markup into: a browser
//! document, or the in-memory [`MemoryHost`] used by the CLI and tests.

use std::collections::HashMap;

/// Surface addressed by element id.
pub trait Host {
    /// Returns true if an element with `id` exists.
    fn has_element(&self, id: &str) -> bool;

    /// Replaces the content of element `id`. Returns false when it does not
    /// exist.
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;

    /// Returns the current content of element `id`.
    fn inner_html(&self, id: &str) -> Option<String>;
}

/// In-memory host: a map from element id to content.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    elements: HashMap<String, String>,
}

impl MemoryHost {
    /// Creates a host with no elements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host with one empty element.
    #[must_use]
    pub fn with_element(id: impl Into<String>) -> Self {
        let mut host = Self::new();
        host.add_element(id);
        host
    }

    /// Adds an empty element (no-op if it already exists).
    pub fn add_element(&mut self, id: impl Into<String>) {
        self.elements.entry(id.into()).or_default();
    }

    /// Removes an element.
    pub fn remove_element(&mut self, id: &str) -> Option<String> {
        self.elements.remove(id)
    }
}

impl Host for MemoryHost {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(content) => {
                html.clone_into(content);
                true
            }
            None => false,
        }
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.elements.get(id).cloned()
    }
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn has_element(&self, id: &str) -> bool {
        (**self).has_element(id)
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        (**self).set_inner_html(id, html)
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        (**self).inner_html(id)
    }
}
