//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for local runs and HTTP tests
//! - **cache**: rendered-page caches (in-process or Redis)
//! - **password**: bcrypt password hashing
//! - **media**: uploaded post images on the local filesystem
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod cache;
pub mod media;
pub mod memory;
pub mod password;
pub mod persistence;
