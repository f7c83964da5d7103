//! Write-side service for posts and comments.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{MediaStore, PostCommand};
use crate::domain::{
    Comment, CommentDraft, EditOutcome, Error, FieldErrors, FormOutcome, Group, INVALID_GROUP_CHOICE,
    Post, PostDraft, PostId, Repositories, UserId,
};

/// Implements [`PostCommand`] over the persistence and media ports.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
    media: Arc<dyn MediaStore>,
}

impl PostService {
    pub fn new(repos: Repositories, media: Arc<dyn MediaStore>) -> Self {
        Self { repos, media }
    }

    /// Write a newly uploaded image and point the draft at it.
    async fn store_upload(&self, draft: PostDraft) -> Result<PostDraft, Error> {
        let Some(upload) = draft.upload() else {
            return Ok(draft);
        };
        let path = self.media.store(upload).await?;
        info!(image = %path, "post image stored");
        Ok(draft.with_image(Some(path)))
    }

    async fn find_post(&self, id: PostId) -> Result<Post, Error> {
        self.repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    /// `Some(errors)` when the draft's group does not exist.
    async fn check_group(&self, draft: &PostDraft) -> Result<Option<FieldErrors>, Error> {
        let Some(group) = draft.group() else {
            return Ok(None);
        };
        let known = self.repos.groups.find_by_id(group).await?.is_some();
        Ok((!known).then(|| FieldErrors::single("group", INVALID_GROUP_CHOICE)))
    }
}

#[async_trait]
impl PostCommand for PostService {
    async fn create(&self, author: &UserId, draft: PostDraft) -> Result<FormOutcome<Post>, Error> {
        if let Some(errors) = self.check_group(&draft).await? {
            return Ok(FormOutcome::Invalid(errors));
        }
        let draft = self.store_upload(draft).await?;
        let post = self.repos.posts.create(author, &draft).await?;
        info!(post_id = %post.id(), author = %author, "post created");
        Ok(FormOutcome::Saved(post))
    }

    async fn editable(&self, editor: &UserId, id: PostId) -> Result<Option<Post>, Error> {
        let post = self.find_post(id).await?;
        Ok(post.is_authored_by(editor).then_some(post))
    }

    async fn edit(
        &self,
        editor: &UserId,
        id: PostId,
        draft: PostDraft,
    ) -> Result<EditOutcome<Post>, Error> {
        let existing = self.find_post(id).await?;
        if !existing.is_authored_by(editor) {
            warn!(post_id = %id, editor = %editor, "edit rejected for non-author");
            return Ok(EditOutcome::NotAuthor);
        }
        if let Some(errors) = self.check_group(&draft).await? {
            return Ok(EditOutcome::Invalid(errors));
        }

        let draft = if draft.upload().is_some() {
            self.store_upload(draft).await?
        } else {
            draft.with_image(existing.image().map(str::to_owned))
        };
        let post = self.repos.posts.update(id, &draft).await?;
        info!(post_id = %id, "post edited");
        Ok(EditOutcome::Saved(post))
    }

    async fn add_comment(
        &self,
        author: &UserId,
        post: PostId,
        draft: CommentDraft,
    ) -> Result<Comment, Error> {
        let post = self.find_post(post).await?;
        let comment = self.repos.comments.create(post.id(), author, &draft).await?;
        info!(post_id = %post.id(), author = %author, "comment added");
        Ok(comment)
    }

    async fn group_choices(&self) -> Result<Vec<Group>, Error> {
        Ok(self.repos.groups.list_all().await?)
    }
}
