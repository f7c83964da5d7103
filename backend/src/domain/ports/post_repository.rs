//! Port abstraction for post persistence.
//!
//! Listings are split into a `count` and a windowed `list` so the paginator
//! can resolve the requested page before any rows are fetched.
use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{GroupId, Post, PostDraft, PostId, UserId};

use super::{define_port_error, map_repository_error};

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

map_repository_error!(PostRepositoryError);

/// Which posts a listing covers. Every listing is ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts filed under a group.
    Group(GroupId),
    /// Posts written by a user.
    Author(UserId),
    /// Posts by every author the user follows.
    FollowedBy(UserId),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch one post with author and group resolved.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError>;

    /// The posts matching `filter` inside `window`, newest first.
    async fn list(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    /// Store a new post written by `author`.
    async fn create(&self, author: &UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError>;

    /// Replace the text, group and image of an existing post.
    async fn update(&self, id: PostId, draft: &PostDraft) -> Result<Post, PostRepositoryError>;
}
