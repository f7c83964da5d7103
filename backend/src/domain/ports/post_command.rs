//! Driving port for writing posts and comments.

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentDraft, EditOutcome, Error, FormOutcome, Group, Post, PostDraft, PostId, UserId,
};

#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post by `author`.
    ///
    /// Returns [`FormOutcome::Invalid`] when the draft names an unknown group.
    async fn create(&self, author: &UserId, draft: PostDraft) -> Result<FormOutcome<Post>, Error>;

    /// Load a post for its edit form.
    ///
    /// `NotFound` when missing; `Ok(None)` when `editor` is not the author.
    async fn editable(&self, editor: &UserId, id: PostId) -> Result<Option<Post>, Error>;

    /// Apply an edit. Non-authors get [`EditOutcome::NotAuthor`] and the
    /// post is left unchanged.
    async fn edit(
        &self,
        editor: &UserId,
        id: PostId,
        draft: PostDraft,
    ) -> Result<EditOutcome<Post>, Error>;

    /// Comment on a post; `NotFound` when the post is missing.
    async fn add_comment(
        &self,
        author: &UserId,
        post: PostId,
        draft: CommentDraft,
    ) -> Result<Comment, Error>;

    /// Groups offered by the post form, ordered by title.
    async fn group_choices(&self) -> Result<Vec<Group>, Error>;
}
