//! Driving port for the read-only listing pages.
//!
//! Every listing takes the raw `?page=` value; services resolve it with the
//! shared paginator so out-of-range values never fail.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Comment, Error, Group, Post, PostId, User, UserId};

/// Posts filed under one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<Post>,
}

/// An author's profile: their posts plus follow state for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFeed {
    pub author: User,
    /// Total posts by the author across all pages.
    pub post_count: u64,
    /// `true` when the viewer follows the author; `false` for anonymous
    /// viewers.
    pub following: bool,
    pub page: Page<Post>,
}

/// A single post with its comments.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub author_post_count: u64,
    /// Oldest first.
    pub comments: Vec<Comment>,
}

#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Every post, newest first.
    async fn index(&self, page: Option<&str>) -> Result<Page<Post>, Error>;

    /// Posts of the group with `slug`; `NotFound` when the slug is unknown.
    async fn group(&self, slug: &str, page: Option<&str>) -> Result<GroupFeed, Error>;

    /// Posts by `username`; `NotFound` when the user is unknown.
    async fn profile(
        &self,
        username: &str,
        page: Option<&str>,
        viewer: Option<&UserId>,
    ) -> Result<ProfileFeed, Error>;

    /// One post; `NotFound` when missing.
    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error>;

    /// Posts by authors `viewer` follows.
    async fn follow_feed(&self, viewer: &UserId, page: Option<&str>) -> Result<Page<Post>, Error>;
}
