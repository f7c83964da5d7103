//! Groups: the static taxonomy posts can be filed under.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::{SLUG_MAX, is_valid_slug};

/// Maximum group title length, in characters.
pub const GROUP_TITLE_MAX: usize = 200;

/// Validation errors for group values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("group id must be positive")]
    InvalidId,
    #[error("slug may only contain lowercase letters, digits, hyphens and underscores (max {SLUG_MAX})")]
    InvalidSlug,
    #[error("group title must not be empty")]
    EmptyTitle,
    #[error("group title must be at most {max} characters")]
    TitleTooLong { max: usize },
}

/// Storage identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct GroupId(i32);

impl GroupId {
    pub fn new(value: i32) -> Result<Self, GroupValidationError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(GroupValidationError::InvalidId)
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GroupId> for i32 {
    fn from(value: GroupId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for GroupId {
    type Error = GroupValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// URL-safe group identifier, unique across groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    pub fn new(value: impl Into<String>) -> Result<Self, GroupValidationError> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(GroupValidationError::InvalidSlug)
        }
    }
}

impl AsRef<str> for GroupSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fields of a group that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    title: String,
    slug: GroupSlug,
    description: String,
}

impl NewGroup {
    /// Validate the title; the slug is validated by [`GroupSlug`].
    pub fn try_new(
        title: &str,
        slug: GroupSlug,
        description: &str,
    ) -> Result<Self, GroupValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX,
            });
        }
        Ok(Self {
            title: title.to_owned(),
            slug,
            description: description.trim().to_owned(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attach the identifier assigned by storage.
    pub fn into_group(self, id: GroupId) -> Group {
        Group {
            id,
            title: self.title,
            slug: self.slug,
            description: self.description,
        }
    }
}

/// A stored group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    pub fn new(id: GroupId, title: String, slug: GroupSlug, description: String) -> Self {
        Self {
            id,
            title,
            slug,
            description,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
