//! Driving port for subscribing to authors.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow `author_username` and return the author.
    ///
    /// `NotFound` for unknown authors. Following oneself is a no-op and
    /// following twice keeps a single subscription.
    async fn follow(&self, user: &UserId, author_username: &str) -> Result<User, Error>;

    /// Stop following `author_username`; idempotent.
    async fn unfollow(&self, user: &UserId, author_username: &str) -> Result<User, Error>;
}
