//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the blog's repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map onto each port's
//!   error enum.
//!
//! # Example
//!
//! ```ignore
//! use yatube::outbound::persistence::{DbPool, PoolConfig, diesel_repositories};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/yatube", 10)).await?;
//! let repos = diesel_repositories(&pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use std::sync::Arc;

use crate::domain::Repositories;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DbPool, PoolConfig, PoolError};

/// Bundle one Diesel repository per aggregate over a shared pool.
pub fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        groups: Arc::new(DieselGroupRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        follows: Arc::new(DieselFollowRepository::new(pool.clone())),
    }
}
