//! Page-number pagination shared by the Yatube listing views.
//!
//! The crate splits pagination into three pieces:
//!
//! - [`Paginator`] resolves a raw `?page=` value against a total row count and
//!   yields a [`PageWindow`] (offset and limit for the storage query).
//! - [`Page`] carries one slice of results plus the navigation facts templates
//!   need (`has_next`, `previous_page_number`, ...).
//! - [`PageLinks`] rebuilds the current request URL with a different `page`
//!   parameter so navigation links keep every other query parameter.
//!
//! Out-of-range requests never fail: a non-numeric page resolves to the first
//! page and a number outside `1..=num_pages` resolves to the last page.
//!
//! # Examples
//! ```
//! use pagination::Paginator;
//!
//! let paginator = Paginator::new(10).expect("non-zero page size");
//! let window = paginator.window(Some("2"), 13);
//! assert_eq!(window.offset(), 10);
//! assert_eq!(window.limit(), 10);
//!
//! let page = window.into_page(vec!["a", "b", "c"]);
//! assert_eq!(page.number(), 2);
//! assert!(!page.has_next());
//! ```

mod links;
mod page;
mod paginator;

pub use links::{PageLinks, PageNavigation};
pub use page::Page;
pub use paginator::{PageWindow, PaginationError, Paginator};
