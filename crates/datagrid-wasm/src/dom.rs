//! DOM-backed [`Host`].

use datagrid::host::Host;
use web_sys::Document;

/// Renders into elements of a browser document, addressed by id.
#[derive(Debug, Clone)]
pub struct DomHost {
    document: Document,
}

impl DomHost {
    /// Wraps a document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Host for the current window's document, if there is one.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    /// Creates an empty `<div id=...>` at the end of `<body>` unless an
    /// element with that id already exists.
    pub fn ensure_element(&self, id: &str) -> bool {
        if self.has_element(id) {
            return true;
        }
        let Some(body) = self.document.body() else {
            return false;
        };
        let Ok(div) = self.document.create_element("div") else {
            return false;
        };
        div.set_id(id);
        body.append_child(&div).is_ok()
    }
}

impl Host for DomHost {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.document.get_element_by_id(id) {
            Some(element) => {
                element.set_inner_html(html);
                true
            }
            None => false,
        }
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .map(|element| element.inner_html())
    }
}
