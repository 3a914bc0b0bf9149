//! Page arithmetic and the page-button window.
//!
//! Pages are 1-based here, matching what users see.
//!
//! # Example
//!
//! ```rust
//! use datagrid::paginator::{PageItem, Paginator};
//!
//! let mut paginator = Paginator::new().per_page(10);
//! paginator.set_total_pages_from_items(95);
//! assert_eq!(paginator.total_pages(), 10);
//!
//! paginator.set_page(5);
//! assert_eq!(paginator.get_slice_bounds(95), (40, 50));
//!
//! let window = paginator.window(5);
//! assert_eq!(window.first(), Some(&PageItem::Page(1)));
//! assert_eq!(window[1], PageItem::Ellipsis);
//! ```

/// Maximum number of numbered buttons around the current page.
pub const DEFAULT_WINDOW: usize = 5;

/// One element of the rendered page-button strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A numbered button.
    Page(usize),
    /// Marker for elided pages.
    Ellipsis,
}

/// Pagination model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    /// Current page (1-based).
    page: usize,
    /// Items per page.
    per_page: usize,
    /// Total number of pages, at least 1.
    total_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    /// Creates a paginator on page 1 of 1 with one item per page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            per_page: 1,
            total_pages: 1,
        }
    }

    /// Sets the number of items per page.
    #[must_use]
    pub fn per_page(mut self, n: usize) -> Self {
        self.per_page = n.max(1);
        self
    }

    /// Sets the total number of pages.
    #[must_use]
    pub fn total_pages_of(mut self, n: usize) -> Self {
        self.total_pages = n.max(1);
        self.page = self.page.min(self.total_pages);
        self
    }

    /// Returns the current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the current page, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages);
    }

    /// Returns the items per page.
    #[must_use]
    pub fn get_per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Calculates and sets the total pages from an item count, then
    /// re-clamps the current page.
    ///
    /// An empty collection still has one (empty) page.
    pub fn set_total_pages_from_items(&mut self, items: usize) -> usize {
        self.total_pages = items.div_ceil(self.per_page).max(1);
        self.page = self.page.min(self.total_pages);
        self.total_pages
    }

    /// Returns the number of items on the current page.
    #[must_use]
    pub fn items_on_page(&self, total_items: usize) -> usize {
        let (start, end) = self.get_slice_bounds(total_items);
        end - start
    }

    /// Returns slice bounds for the current page, both capped at `length`.
    #[must_use]
    pub fn get_slice_bounds(&self, length: usize) -> (usize, usize) {
        let start = ((self.page - 1) * self.per_page).min(length);
        let end = (start + self.per_page).min(length);
        (start, end)
    }

    /// Navigates to the previous page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns whether we're on the last page.
    #[must_use]
    pub fn on_last_page(&self) -> bool {
        self.page == self.total_pages
    }

    /// Returns whether we're on the first page.
    #[must_use]
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    /// Returns the strip of page buttons: at most `max_visible` consecutive
    /// pages around the current one, with the first and last page always
    /// present and an ellipsis wherever pages are skipped.
    #[must_use]
    pub fn window(&self, max_visible: usize) -> Vec<PageItem> {
        let max_visible = max_visible.max(1);
        let total = self.total_pages;

        let mut start = self.page.saturating_sub(max_visible / 2).max(1);
        let end = (start + max_visible - 1).min(total);
        if end - start < max_visible - 1 {
            start = (end + 1).saturating_sub(max_visible).max(1);
        }

        let mut items = Vec::with_capacity(max_visible + 4);
        if start > 1 {
            items.push(PageItem::Page(1));
            if start > 2 {
                items.push(PageItem::Ellipsis);
            }
        }
        items.extend((start..=end).map(PageItem::Page));
        if end < total {
            if end + 1 < total {
                items.push(PageItem::Ellipsis);
            }
            items.push(PageItem::Page(total));
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_paginator_new() {
        let p = Paginator::new();
        assert_eq!(p.page(), 1);
        assert_eq!(p.get_per_page(), 1);
        assert_eq!(p.total_pages(), 1);
    }

    #[test]
    fn test_paginator_navigation() {
        let mut p = Paginator::new().total_pages_of(5);

        assert!(p.on_first_page());
        assert!(!p.on_last_page());

        p.next_page();
        assert_eq!(p.page(), 2);

        p.next_page();
        p.next_page();
        p.next_page();
        assert_eq!(p.page(), 5);
        assert!(p.on_last_page());

        // Should not go past last page
        p.next_page();
        assert_eq!(p.page(), 5);

        p.set_page(1);
        p.prev_page();
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_paginator_slice_bounds() {
        let mut p = Paginator::new().per_page(3);
        p.set_total_pages_from_items(10);

        assert_eq!(p.get_slice_bounds(10), (0, 3));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (3, 6));
        p.next_page();
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (9, 10));
        assert_eq!(p.items_on_page(10), 1);
    }

    #[test]
    fn test_set_total_pages_from_items() {
        let mut p = Paginator::new().per_page(20);
        assert_eq!(p.set_total_pages_from_items(25), 2);
        assert_eq!(p.set_total_pages_from_items(40), 2);
        assert_eq!(p.set_total_pages_from_items(41), 3);
        assert_eq!(p.set_total_pages_from_items(0), 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut p = Paginator::new().per_page(20);
        p.set_total_pages_from_items(25);
        p.set_page(5);
        assert_eq!(p.page(), 2);
        p.set_page(0);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_shrinking_total_reclamps_page() {
        let mut p = Paginator::new().per_page(10);
        p.set_total_pages_from_items(100);
        p.set_page(10);
        p.set_total_pages_from_items(15);
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn test_window_small_total() {
        let mut p = Paginator::new().total_pages_of(3);
        p.set_page(2);
        assert_eq!(p.window(5), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn test_window_at_start() {
        let p = Paginator::new().total_pages_of(10);
        assert_eq!(
            p.window(5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_in_middle() {
        let mut p = Paginator::new().total_pages_of(20);
        p.set_page(10);
        assert_eq!(
            p.window(5),
            vec![
                Page(1),
                Ellipsis,
                Page(8),
                Page(9),
                Page(10),
                Page(11),
                Page(12),
                Ellipsis,
                Page(20)
            ]
        );
    }

    #[test]
    fn test_window_at_end() {
        let mut p = Paginator::new().total_pages_of(10);
        p.set_page(10);
        assert_eq!(
            p.window(5),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_no_ellipsis_for_adjacent_edges() {
        let mut p = Paginator::new().total_pages_of(7);
        p.set_page(4);
        // Window 2..=6: page 1 and 7 sit right next to it.
        assert_eq!(
            p.window(5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
    }
}
