//! Whole-page cache adapters implementing the `PageCache` port.
//!
//! - [`InMemoryPageCache`]: per-process map with clock-driven expiry; the
//!   default for single-instance deployments and tests.
//! - [`RedisPageCache`]: shared cache via `bb8-redis`, selected when a Redis
//!   URL is configured.

mod memory;
mod redis;

pub use memory::InMemoryPageCache;
pub use redis::RedisPageCache;
