//! Domain primitives, ports and services.
//!
//! Purpose: define the blog's entities (users, groups, posts, comments,
//! follows) as validated value types, the transport-agnostic [`Error`], the
//! ports adapters plug into, and the services implementing each use-case.
//!
//! Public surface:
//! - Entities: [`User`], [`Group`], [`Post`], [`Comment`], [`Follow`].
//! - Form handling: [`PostDraft`], [`ImageUpload`], [`CommentDraft`], [`NewAccount`],
//!   [`FieldErrors`], [`FormOutcome`], [`EditOutcome`].
//! - Services: [`FeedService`], [`PostService`], [`FollowService`],
//!   [`AccountService`].

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod error;
pub mod feed_service;
pub mod follow;
pub mod follow_service;
pub mod form;
pub mod group;
pub mod image;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod repositories;
mod slug;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, USERNAME_TAKEN};
pub use self::auth::{
    LoginCredentials, LoginValidationError, NewAccount, PASSWORD_MIN, SignupRequest,
};
pub use self::comment::{Comment, CommentDraft, CommentId};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feed_service::{FeedService, POSTS_PER_PAGE};
pub use self::follow::{Follow, FollowValidationError};
pub use self::follow_service::FollowService;
pub use self::form::{EditOutcome, FieldErrors, FormOutcome, NON_FIELD};
pub use self::group::{Group, GroupId, GroupSlug, GroupValidationError, NewGroup};
pub use self::image::{ImageFormat, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES, PostImage};
pub use self::post::{
    INVALID_GROUP_CHOICE, Post, PostDraft, PostId, PostText, PostValidationError,
};
pub use self::post_service::PostService;
pub use self::repositories::Repositories;
pub use self::trace_id::TraceId;
pub use self::user::{FullName, User, UserId, UserValidationError, Username};
