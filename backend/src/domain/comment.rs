//! Comments left on posts. Immutable once written.

use chrono::{DateTime, Utc};

use super::form::FieldErrors;
use super::post::PostId;
use super::user::User;

/// Storage identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(i32);

impl CommentId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// A validated comment form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    text: String,
}

impl CommentDraft {
    /// Trim `text` and reject blank submissions.
    pub fn from_form(text: &str) -> Result<Self, FieldErrors> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FieldErrors::single("text", "this field is required"));
        }
        Ok(Self {
            text: text.to_owned(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A stored comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    post: PostId,
    author: User,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        post: PostId,
        author: User,
        text: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post,
            author,
            text,
            created_at,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn post(&self) -> PostId {
        self.post
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
