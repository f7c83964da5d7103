//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain entities live
//! here so every repository validates rows the same way.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentId, FullName, Group, GroupId, GroupSlug, PostId, PostText, User, UserId,
    Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

impl UserRow {
    /// Validate the row into a domain [`User`].
    pub fn into_user(self) -> Result<User, String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        let name =
            FullName::new(&self.first_name, &self.last_name).map_err(|err| err.to_string())?;
        Ok(User::new(UserId::from_uuid(self.id), username, name))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    pub fn into_group(self) -> Result<Group, String> {
        let id = GroupId::new(self.id).map_err(|err| err.to_string())?;
        let slug = GroupSlug::new(self.slug).map_err(|err| err.to_string())?;
        Ok(Group::new(id, self.title, slug, self.description))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub(crate) struct NewGroupRow<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl PostRow {
    pub fn post_id(&self) -> Result<PostId, String> {
        PostId::new(self.id).map_err(|err| err.to_string())
    }

    pub fn post_text(&self) -> Result<PostText, String> {
        PostText::new(self.text.clone()).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    pub image: Option<&'a str>,
}

/// Changeset for editing a post; `None` clears the nullable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PostUpdate<'a> {
    pub text: &'a str,
    pub group_id: Option<i32>,
    pub image: Option<&'a str>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub post_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    pub fn into_comment(self, author: User) -> Result<Comment, String> {
        let post = PostId::new(self.post_id).map_err(|err| err.to_string())?;
        Ok(Comment::new(
            CommentId::new(self.id),
            post,
            author,
            self.text,
            self.created_at,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i32,
    pub author_id: Uuid,
    pub text: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
