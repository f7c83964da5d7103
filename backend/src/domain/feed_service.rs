//! Read-side service behind the listing pages.

use std::num::NonZeroU64;

use async_trait::async_trait;
use pagination::{Page, Paginator};
use tracing::debug;

use crate::domain::ports::{FeedQuery, GroupFeed, PostDetail, PostFilter, ProfileFeed};
use crate::domain::{Error, Post, PostId, Repositories, UserId};

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: NonZeroU64 = NonZeroU64::MIN.saturating_add(9);

/// Implements [`FeedQuery`] over the persistence ports.
#[derive(Clone)]
pub struct FeedService {
    repos: Repositories,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            paginator: Paginator::with_page_size(POSTS_PER_PAGE),
        }
    }

    async fn listing(&self, filter: PostFilter, raw_page: Option<&str>) -> Result<Page<Post>, Error> {
        let total = self.repos.posts.count(&filter).await?;
        let window = self.paginator.window(raw_page, total);
        debug!(?filter, page = window.number(), total, "listing posts");
        let posts = self.repos.posts.list(&filter, window).await?;
        Ok(window.into_page(posts))
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn index(&self, page: Option<&str>) -> Result<Page<Post>, Error> {
        self.listing(PostFilter::All, page).await
    }

    async fn group(&self, slug: &str, page: Option<&str>) -> Result<GroupFeed, Error> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| Error::not_found(format!("group {slug} not found")))?;
        let page = self.listing(PostFilter::Group(group.id()), page).await?;
        Ok(GroupFeed { group, page })
    }

    async fn profile(
        &self,
        username: &str,
        page: Option<&str>,
        viewer: Option<&UserId>,
    ) -> Result<ProfileFeed, Error> {
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))?;

        let following = match viewer {
            Some(viewer) if viewer != author.id() => {
                self.repos.follows.is_following(viewer, author.id()).await?
            }
            _ => false,
        };
        let page = self
            .listing(PostFilter::Author(author.id().clone()), page)
            .await?;

        Ok(ProfileFeed {
            post_count: page.total(),
            author,
            following,
            page,
        })
    }

    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))?;
        let author_post_count = self
            .repos
            .posts
            .count(&PostFilter::Author(post.author().id().clone()))
            .await?;
        let comments = self.repos.comments.list_for_post(id).await?;
        Ok(PostDetail {
            post,
            author_post_count,
            comments,
        })
    }

    async fn follow_feed(&self, viewer: &UserId, page: Option<&str>) -> Result<Page<Post>, Error> {
        self.listing(PostFilter::FollowedBy(viewer.clone()), page)
            .await
    }
}
