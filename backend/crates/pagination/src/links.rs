//! Navigation links that swap the `page` parameter of the current request.

use serde::Serialize;
use url::Url;

use crate::page::Page;
use crate::paginator::PaginationError;

const PAGE_PARAM: &str = "page";
// Only used to resolve relative request targets; never rendered.
const LINK_ORIGIN: &str = "http://localhost";

/// Builds `path?query` links for sibling pages of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    base: Url,
}

/// Rendered navigation links for a [`Page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNavigation {
    /// Link to the first page.
    pub first: String,
    /// Link to the previous page, when one exists.
    pub previous: Option<String>,
    /// Link to the next page, when one exists.
    pub next: Option<String>,
    /// Link to the last page.
    pub last: String,
}

impl PageLinks {
    /// Parse a request target such as `/group/cats/?page=2&sort=new`.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidLinkBase`] when the target is not a
    /// valid relative reference.
    pub fn from_request_target(target: &str) -> Result<Self, PaginationError> {
        let origin = Url::parse(LINK_ORIGIN).map_err(|err| invalid(LINK_ORIGIN, &err))?;
        let base = origin.join(target).map_err(|err| invalid(target, &err))?;
        Ok(Self { base })
    }

    /// Link to page `number`, keeping all other query parameters in order.
    #[must_use]
    pub fn href(&self, number: u64) -> String {
        let mut url = self.base.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .append_pair(PAGE_PARAM, &number.to_string());

        match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_owned(),
        }
    }

    /// Navigation links for `page`.
    #[must_use]
    pub fn navigation<T>(&self, page: &Page<T>) -> PageNavigation {
        PageNavigation {
            first: self.href(1),
            previous: page.previous_page_number().map(|number| self.href(number)),
            next: page.next_page_number().map(|number| self.href(number)),
            last: self.href(page.num_pages()),
        }
    }
}

fn invalid(value: &str, err: &url::ParseError) -> PaginationError {
    PaginationError::InvalidLinkBase {
        value: value.to_owned(),
        message: err.to_string(),
    }
}
