//! Page-number resolution against a known row count.

use std::num::{IntErrorKind, NonZeroU64};

use crate::page::Page;

/// Errors raised while configuring pagination.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A paginator cannot slice results into zero-sized pages.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// The request target could not be parsed into a URL.
    #[error("invalid page link base `{value}`: {message}")]
    InvalidLinkBase {
        /// Raw value that failed to parse.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Slices an ordered result set into fixed-size pages.
///
/// The first page always exists, even when the result set is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: NonZeroU64,
}

impl Paginator {
    /// Create a paginator emitting `per_page` items per page.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub fn new(per_page: u64) -> Result<Self, PaginationError> {
        NonZeroU64::new(per_page)
            .map(|per_page| Self { per_page })
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Infallible constructor for page sizes known at compile time.
    #[must_use]
    pub const fn with_page_size(per_page: NonZeroU64) -> Self {
        Self { per_page }
    }

    /// Number of items on a full page.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page.get()
    }

    /// Number of pages needed for `total` items; never less than one.
    #[must_use]
    pub fn num_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page()).max(1)
    }

    /// Resolve a raw `page` query value to a valid page number.
    ///
    /// Missing or non-numeric values resolve to page 1. Numbers below one or
    /// beyond the last page resolve to the last page, however many digits
    /// they have.
    #[must_use]
    pub fn page_number(&self, raw: Option<&str>, total: u64) -> u64 {
        let last = self.num_pages(total);
        match raw.and_then(parse_page_number) {
            None => 1,
            Some(number) if number < 1 => last,
            Some(number) => u64::try_from(number).map_or(last, |value| value.min(last)),
        }
    }

    /// Resolve the storage window for the requested page.
    #[must_use]
    pub fn window(&self, raw: Option<&str>, total: u64) -> PageWindow {
        let number = self.page_number(raw, total);
        PageWindow {
            number,
            offset: (number - 1).saturating_mul(self.per_page()),
            limit: self.per_page(),
            total,
            num_pages: self.num_pages(total),
        }
    }
}

/// Integers too long for `i64` saturate so they still count as out of range.
fn parse_page_number(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(number) => Some(number),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Offset/limit window for one page, ready to feed a storage query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: u64,
    offset: u64,
    limit: u64,
    total: u64,
    num_pages: u64,
}

impl PageWindow {
    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum rows to fetch.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Total rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Total pages.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Attach the fetched rows to produce a [`Page`].
    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page::from_window(self, items)
    }
}
