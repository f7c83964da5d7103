//! Driving ports for account use-cases: login, signup and user lookup.
//!
//! Inbound adapters call these without knowing (or importing) the backing
//! infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, FormOutcome, LoginCredentials, NewAccount, User, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown usernames and wrong passwords both yield `Unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Domain use-case port for registration.
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Create an account. A taken username is reported as a form error.
    async fn signup(&self, account: &NewAccount) -> Result<FormOutcome<User>, Error>;
}

/// Domain use-case port for looking up the signed-in user.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user by id; `None` when the account no longer exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
