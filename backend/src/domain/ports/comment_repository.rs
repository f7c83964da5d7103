//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, CommentDraft, PostId, UserId};

use super::{define_port_error, map_repository_error};

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

map_repository_error!(CommentRepositoryError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on `post`, oldest first.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Store a comment by `author` on `post`.
    async fn create(
        &self,
        post: PostId,
        author: &UserId,
        draft: &CommentDraft,
    ) -> Result<Comment, CommentRepositoryError>;
}
