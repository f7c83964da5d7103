//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Error, FullName, User, UserId, Username};

use super::{define_port_error, map_repository_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

map_repository_error!(
    UserPersistenceError,
    DuplicateUsername { username } => Error::conflict(format!("username {username} is already taken")),
);

/// Everything needed to insert a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub username: Username,
    pub name: FullName,
    pub email: Option<String>,
    /// Encoded password hash; never the plain-text password.
    pub password_hash: String,
}

/// A user together with the stored password hash, for login checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, assigning a fresh id.
    async fn create(&self, registration: &UserRegistration) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their password hash by username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}
