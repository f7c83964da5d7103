//! Directed subscriptions from a reader to an author.

use super::user::UserId;

/// Errors raised when constructing a [`Follow`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowValidationError {
    #[error("users cannot follow themselves")]
    SelfFollow,
}

/// `user` receives `author`'s posts in their follow feed.
///
/// ## Invariants
/// - `user != author`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Follow {
    user: UserId,
    author: UserId,
}

impl Follow {
    /// # Examples
    /// ```
    /// use yatube::domain::{Follow, UserId};
    ///
    /// let me = UserId::random();
    /// assert!(Follow::try_new(me.clone(), me).is_err());
    /// ```
    pub fn try_new(user: UserId, author: UserId) -> Result<Self, FollowValidationError> {
        if user == author {
            return Err(FollowValidationError::SelfFollow);
        }
        Ok(Self { user, author })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }
}
