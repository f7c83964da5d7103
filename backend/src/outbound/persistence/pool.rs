//! bb8 pool of async Diesel connections shared by the repositories.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

/// How long a request waits for a free connection unless configured.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

define_port_error! {
    /// Failures building the pool or checking a connection out of it.
    pub enum PoolError {
        Checkout { message: String } => "failed to get connection from pool: {message}",
        Build { message: String } => "failed to build connection pool: {message}",
    }
}

/// Database URL plus the limits taken from `YATUBE_DB_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// At most `max_size` connections, waiting [`DEFAULT_CHECKOUT_TIMEOUT`]
    /// for one.
    pub fn new(database_url: impl Into<String>, max_size: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_size,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }
}

/// Cloneable handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. No connection is opened until the first checkout.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when bb8 rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            checkout_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(max_size)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] when none frees up within the
    /// checkout timeout or the database refuses a new one.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_config_uses_default_timeout() {
        let config = PoolConfig::new("postgres://localhost/yatube", 4);
        assert_eq!(config.max_size, 4);
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    fn checkout_timeout_can_be_overridden() {
        let config = PoolConfig::new("postgres://localhost/yatube", 4)
            .with_checkout_timeout(Duration::from_millis(500));
        assert_eq!(config.checkout_timeout, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn unreachable_database_fails_at_checkout_within_timeout() {
        let config = PoolConfig::new("postgres://yatube@127.0.0.1:1/yatube", 1)
            .with_checkout_timeout(Duration::from_millis(200));
        let pool = DbPool::new(config).await.expect("pool builds lazily");

        let started = std::time::Instant::now();
        let err = pool.get().await.err().expect("no database listening");
        assert!(matches!(err, PoolError::Checkout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
