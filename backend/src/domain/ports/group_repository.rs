//! Port abstraction for group persistence.
use async_trait::async_trait;

use crate::domain::{Error, Group, GroupId, NewGroup};

use super::{define_port_error, map_repository_error};

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}",
        /// Another group already uses the slug.
        DuplicateSlug { slug: String } => "group slug {slug} is already taken",
    }
}

map_repository_error!(
    GroupRepositoryError,
    DuplicateSlug { slug } => Error::conflict(format!("group slug {slug} is already taken")),
);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Look a group up by its URL slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, GroupRepositoryError>;

    /// Look a group up by id.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    /// All groups ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, GroupRepositoryError>;

    /// Insert a new group.
    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError>;
}
