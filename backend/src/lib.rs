//! Yatube: a server-rendered blogging service.
//!
//! Users publish posts, optionally filed under a group, comment on posts and
//! follow other authors. The crate is laid out hexagonally:
//!
//! - [`domain`]: entities, validation, ports and the use-case services.
//! - [`inbound`]: the Actix HTTP adapter rendering HTML pages.
//! - [`outbound`]: Diesel, in-memory, cache and password adapters.
//! - [`middleware`]: request tracing.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use domain::TraceId;
pub use middleware::Trace;
