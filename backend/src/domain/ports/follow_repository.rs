//! Port abstraction for follow persistence.
use async_trait::async_trait;

use crate::domain::{Follow, UserId};

use super::{define_port_error, map_repository_error};

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

map_repository_error!(FollowRepositoryError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Record `follow`; an existing identical follow is left untouched.
    async fn follow(&self, follow: &Follow) -> Result<(), FollowRepositoryError>;

    /// Remove the follow from `user` to `author` if present.
    async fn unfollow(&self, user: &UserId, author: &UserId) -> Result<(), FollowRepositoryError>;

    /// `true` when `user` follows `author`.
    async fn is_following(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError>;
}
