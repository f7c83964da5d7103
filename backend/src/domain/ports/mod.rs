//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, page cache, password hashing, media storage)
//! are implemented by outbound adapters and carry a `mockall` automock for
//! unit tests.
//! Driving ports (feeds, post and follow commands, accounts) are implemented
//! by the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::{define_port_error, map_repository_error};

mod cache_key;
mod comment_repository;
mod feed_query;
mod follow_command;
mod follow_repository;
mod group_repository;
mod login_service;
mod media_store;
mod page_cache;
mod password_hasher;
mod post_command;
mod post_repository;
mod user_repository;

pub use cache_key::{PAGE_CACHE_PREFIX, PageCacheKey};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use feed_query::{FeedQuery, GroupFeed, PostDetail, ProfileFeed};
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
pub use login_service::{LoginService, SignupService, UsersQuery};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{PageCache, PageCacheError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostFilter, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    StoredCredentials, UserPersistenceError, UserRegistration, UserRepository,
};
