//! Port for one-way password hashing.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification failed unexpectedly.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

impl From<PasswordHashError> for crate::domain::Error {
    fn from(err: PasswordHashError) -> Self {
        crate::domain::Error::internal(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce an encoded hash for `password`.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// `true` when `password` matches the encoded `hash`.
    ///
    /// A malformed stored hash verifies as `false` rather than failing.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
