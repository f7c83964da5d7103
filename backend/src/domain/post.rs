//! Posts and the drafts submitted through the post form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::form::FieldErrors;
use super::group::{Group, GroupId};
use super::image::{ImageUpload, PostImage};
use super::user::{User, UserId};

/// Characters of the text used as a post's short label.
pub const POST_LABEL_CHARS: usize = 15;
/// Characters of the text used as the post page title.
pub const POST_TITLE_CHARS: usize = 30;

/// Validation errors for post values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("post id must be positive")]
    InvalidId,
    #[error("this field is required")]
    EmptyText,
}

/// Storage identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct PostId(i32);

impl PostId {
    pub fn new(value: i32) -> Result<Self, PostValidationError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PostValidationError::InvalidId)
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostId {
    type Err = PostValidationError;

    /// Parse a URL path segment; only plain decimal digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostValidationError::InvalidId);
        }
        s.parse::<i32>()
            .map_err(|_| PostValidationError::InvalidId)
            .and_then(Self::new)
    }
}

impl From<PostId> for i32 {
    fn from(value: PostId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for PostId {
    type Error = PostValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-blank body text of a post.
///
/// Surrounding whitespace is trimmed; inner line breaks are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostText(String);

impl PostText {
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The first `chars` characters.
    pub fn prefix(&self, chars: usize) -> &str {
        match self.0.char_indices().nth(chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl AsRef<str> for PostText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PostText> for String {
    fn from(value: PostText) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostText {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A validated post form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    text: PostText,
    group: Option<GroupId>,
    image: Option<String>,
    upload: Option<PostImage>,
}

impl PostDraft {
    pub fn new(text: PostText, group: Option<GroupId>) -> Self {
        Self {
            text,
            group,
            image: None,
            upload: None,
        }
    }

    /// Validate raw form fields. An empty `group` means "no group".
    ///
    /// Whether the group exists is checked by the post service.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::PostDraft;
    ///
    /// let draft = PostDraft::from_form("Hello", "").expect("valid draft");
    /// assert!(draft.group().is_none());
    /// assert!(PostDraft::from_form("   ", "").is_err());
    /// ```
    pub fn from_form(text: &str, group: &str) -> Result<Self, FieldErrors> {
        Self::from_submission(text, group, None)
    }

    /// Validate raw form fields together with an optional file upload.
    pub fn from_submission(
        text: &str,
        group: &str,
        upload: Option<ImageUpload>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let text = PostText::new(text)
            .map_err(|err| errors.add("text", err.to_string()))
            .ok();
        let group = parse_group_choice(group).map_err(|message| errors.add("group", message));
        let upload = upload
            .map(ImageUpload::validate)
            .transpose()
            .map(Option::flatten)
            .map_err(|err| errors.add("image", err.to_string()));

        match (text, group, upload) {
            (Some(text), Ok(group), Ok(upload)) if errors.is_empty() => Ok(Self {
                upload,
                ..Self::new(text, group)
            }),
            _ => Err(errors),
        }
    }

    /// Set the stored image path of the post.
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Attach a validated image that still has to be stored.
    pub fn with_upload(mut self, upload: PostImage) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn text(&self) -> &PostText {
        &self.text
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Newly uploaded image, if the form carried one.
    pub fn upload(&self) -> Option<&PostImage> {
        self.upload.as_ref()
    }
}

/// Message shown when the submitted group is not a known choice.
pub const INVALID_GROUP_CHOICE: &str = "select a valid choice; that choice is not one of the available choices";

fn parse_group_choice(raw: &str) -> Result<Option<GroupId>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .ok()
        .and_then(|value| GroupId::new(value).ok())
        .map(Some)
        .ok_or(INVALID_GROUP_CHOICE)
}

/// A stored post with its author and group resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    author: User,
    text: PostText,
    group: Option<Group>,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: PostId,
        author: User,
        text: PostText,
        group: Option<Group>,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            text,
            group,
            image,
            created_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn text(&self) -> &PostText {
        &self.text
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `true` when `user` wrote this post.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author.id() == user
    }

    /// Short label: the first 15 characters of the text.
    pub fn label(&self) -> &str {
        self.text.prefix(POST_LABEL_CHARS)
    }

    /// Page title: the first 30 characters of the text.
    pub fn title(&self) -> &str {
        self.text.prefix(POST_TITLE_CHARS)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{FullName, Username};
    use rstest::rstest;

    fn post_with_text(text: &str) -> Post {
        let author = User::new(
            UserId::random(),
            Username::new("leo").expect("valid username"),
            FullName::default(),
        );
        Post::new(
            PostId::new(1).expect("valid id"),
            author,
            PostText::new(text).expect("valid text"),
            None,
            None,
            Utc::now(),
        )
    }

    #[rstest]
    #[case("1", Ok(1))]
    #[case("42", Ok(42))]
    #[case("0", Err(PostValidationError::InvalidId))]
    #[case("-1", Err(PostValidationError::InvalidId))]
    #[case("+1", Err(PostValidationError::InvalidId))]
    #[case("abc", Err(PostValidationError::InvalidId))]
    #[case("99999999999", Err(PostValidationError::InvalidId))]
    fn post_id_parses_path_segments(
        #[case] raw: &str,
        #[case] expected: Result<i32, PostValidationError>,
    ) {
        assert_eq!(raw.parse::<PostId>().map(PostId::get), expected);
    }

    #[rstest]
    fn label_and_title_truncate_by_characters() {
        let post = post_with_text("Съешь же ещё этих мягких французских булок");
        assert_eq!(post.label(), "Съешь же ещё эт");
        assert_eq!(post.title(), "Съешь же ещё этих мягких франц");
        assert_eq!(post.to_string(), post.label());
    }

    #[rstest]
    fn short_text_is_its_own_label() {
        let post = post_with_text("Hi");
        assert_eq!(post.label(), "Hi");
        assert_eq!(post.title(), "Hi");
    }

    #[rstest]
    #[case("  text  ", "", Some("text"), None)]
    #[case("text", "3", Some("text"), Some(3))]
    #[case("text", " 7 ", Some("text"), Some(7))]
    fn draft_accepts_valid_forms(
        #[case] text: &str,
        #[case] group: &str,
        #[case] expected_text: Option<&str>,
        #[case] expected_group: Option<i32>,
    ) {
        let draft = PostDraft::from_form(text, group).expect("valid draft");
        assert_eq!(Some(draft.text().as_ref()), expected_text);
        assert_eq!(draft.group().map(GroupId::get), expected_group);
    }

    #[rstest]
    #[case("", "", "text")]
    #[case("text", "cats", "group")]
    #[case("text", "0", "group")]
    fn draft_reports_invalid_fields(#[case] text: &str, #[case] group: &str, #[case] field: &str) {
        let errors = PostDraft::from_form(text, group).expect_err("invalid draft");
        assert!(!errors.get(field).is_empty());
    }

    #[test]
    fn draft_carries_a_valid_upload() {
        let upload = ImageUpload {
            file_name: "cat.gif".to_owned(),
            bytes: crate::domain::image::fixtures::TINY_GIF.to_vec(),
        };
        let draft = PostDraft::from_submission("text", "", Some(upload)).expect("valid draft");
        assert_eq!(
            draft.upload().map(PostImage::format),
            Some(crate::domain::ImageFormat::Gif)
        );
        assert!(draft.image().is_none());
    }

    #[test]
    fn draft_reports_invalid_upload_on_image_field() {
        let upload = ImageUpload {
            file_name: "notes.txt".to_owned(),
            bytes: b"not an image".to_vec(),
        };
        let errors = PostDraft::from_submission("", "", Some(upload)).expect_err("invalid draft");
        assert!(!errors.get("text").is_empty());
        assert!(!errors.get("image").is_empty());
    }
}
