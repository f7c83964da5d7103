//! One page of results plus its navigation facts.

use serde::Serialize;

use crate::paginator::PageWindow;

/// A single page of an ordered result set.
///
/// Serialises with the navigation fields flattened so templates can read
/// `page.has_next` or `page.next_page_number` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    num_pages: u64,
    total: u64,
    has_next: bool,
    has_previous: bool,
    next_page_number: Option<u64>,
    previous_page_number: Option<u64>,
}

impl<T> Page<T> {
    pub(crate) fn from_window(window: PageWindow, items: Vec<T>) -> Self {
        let number = window.number();
        let num_pages = window.num_pages();
        let has_next = number < num_pages;
        let has_previous = number > 1;
        Self {
            items,
            number,
            num_pages,
            total: window.total(),
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then(|| number - 1),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, keeping only its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total pages in the result set.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// `true` when a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// `true` when an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        self.next_page_number
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        self.previous_page_number
    }

    /// Transform the items while keeping the navigation facts.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}
