//! Bcrypt adapter for the [`PasswordHasher`] port.

use async_trait::async_trait;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes passwords with bcrypt on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher using the given work factor.
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(err.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let cost = self.cost;
        spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        let outcome = spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(join_error)?;
        Ok(outcome.unwrap_or_else(|err| {
            debug!(error = %err, "stored password hash is malformed");
            false
        }))
    }
}
