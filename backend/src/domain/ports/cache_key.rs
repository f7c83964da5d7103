//! Cache key type shared by page cache adapters.

use crate::domain::UserId;

/// Prefix shared by every page cache key; adapters use it to clear entries.
pub const PAGE_CACHE_PREFIX: &str = "yatube:page:";

const ANONYMOUS: &str = "anonymous";

/// Key identifying one rendered page for one viewer.
///
/// Rendered pages embed viewer-specific navigation, so the viewer identity is
/// part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCacheKey(String);

impl PageCacheKey {
    /// Key for `path_and_query` rendered for `viewer` (or an anonymous
    /// visitor).
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::ports::PageCacheKey;
    ///
    /// let key = PageCacheKey::for_request("/?page=2", None);
    /// assert_eq!(key.as_str(), "yatube:page:anonymous:/?page=2");
    /// ```
    pub fn for_request(path_and_query: &str, viewer: Option<&UserId>) -> Self {
        let viewer = viewer.map_or(ANONYMOUS, AsRef::as_ref);
        Self(format!("{PAGE_CACHE_PREFIX}{viewer}:{path_and_query}"))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PageCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PageCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
