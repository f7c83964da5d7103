//! In-process blog store.
//!
//! Backs every repository port with plain collections behind one lock. The
//! server falls back to it when no database URL is configured, and the HTTP
//! integration tests drive the full application against it.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use pagination::PageWindow;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    GroupRepository, GroupRepositoryError, PostFilter, PostRepository, PostRepositoryError,
    StoredCredentials, UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{
    Comment, CommentDraft, CommentId, Follow, Group, GroupId, NewGroup, Post, PostDraft, PostId,
    User, UserId,
};

struct StoredUser {
    user: User,
    password_hash: String,
}

struct StoredPost {
    id: PostId,
    author: UserId,
    draft: PostDraft,
    created_at: DateTime<Utc>,
}

struct StoredComment {
    id: CommentId,
    post: PostId,
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct BlogState {
    users: Vec<StoredUser>,
    groups: BTreeMap<GroupId, Group>,
    posts: BTreeMap<PostId, StoredPost>,
    comments: Vec<StoredComment>,
    follows: HashSet<(UserId, UserId)>,
    last_group_id: i32,
    last_post_id: i32,
    last_comment_id: i32,
}

impl BlogState {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|stored| &stored.user)
            .find(|user| user.id() == id)
    }

    fn matches(&self, post: &StoredPost, filter: &PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => post.draft.group() == Some(*group),
            PostFilter::Author(author) => post.author == *author,
            PostFilter::FollowedBy(user) => {
                self.follows.contains(&(user.clone(), post.author.clone()))
            }
        }
    }

    /// Matching posts, newest first.
    fn filtered<'a>(&'a self, filter: &PostFilter) -> Vec<&'a StoredPost> {
        let mut posts: Vec<&StoredPost> = self
            .posts
            .values()
            .filter(|post| self.matches(post, filter))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    fn hydrate(&self, post: &StoredPost) -> Option<Post> {
        let author = self.user(&post.author)?.clone();
        let group = post
            .draft
            .group()
            .and_then(|id| self.groups.get(&id))
            .cloned();
        Some(Post::new(
            post.id,
            author,
            post.draft.text().clone(),
            group,
            post.draft.image().map(str::to_owned),
            post.created_at,
        ))
    }

    fn next_id(counter: &mut i32) -> Option<i32> {
        *counter = counter.checked_add(1)?;
        Some(*counter)
    }
}

/// Thread-safe in-memory implementation of every blog repository port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use yatube::domain::Repositories;
/// use yatube::outbound::memory::InMemoryBlog;
///
/// let repos = Repositories::shared(Arc::new(InMemoryBlog::new()));
/// # let _ = repos;
/// ```
pub struct InMemoryBlog {
    state: RwLock<BlogState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryBlog {
    fn default() -> Self {
        Self::new()
    }
}

const POISONED: &str = "in-memory blog lock poisoned";

impl InMemoryBlog {
    /// Empty store stamping rows with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty store stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(BlogState::default()),
            clock,
        }
    }

    fn read(&self) -> Option<RwLockReadGuard<'_, BlogState>> {
        self.state.read().ok()
    }

    fn write(&self) -> Option<RwLockWriteGuard<'_, BlogState>> {
        self.state.write().ok()
    }
}

#[async_trait]
impl UserRepository for InMemoryBlog {
    async fn create(&self, registration: &UserRegistration) -> Result<User, UserPersistenceError> {
        let mut state = self.write().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let taken = state
            .users
            .iter()
            .any(|stored| stored.user.username() == &registration.username);
        if taken {
            return Err(UserPersistenceError::duplicate_username(
                registration.username.as_ref(),
            ));
        }
        let user = User::new(
            UserId::random(),
            registration.username.clone(),
            registration.name.clone(),
        );
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: registration.password_hash.clone(),
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.read().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(state.user(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .find_credentials(username)
            .await?
            .map(|stored| stored.user))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.read().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username().as_ref() == username)
            .map(|stored| StoredCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }
}

#[async_trait]
impl GroupRepository for InMemoryBlog {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.read().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        Ok(state
            .groups
            .values()
            .find(|group| group.slug().as_ref() == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.read().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        Ok(state.groups.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let state = self.read().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(groups)
    }

    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError> {
        let mut state = self.write().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        if state.groups.values().any(|existing| existing.slug() == group.slug()) {
            return Err(GroupRepositoryError::duplicate_slug(group.slug().as_ref()));
        }
        let raw_id = BlogState::next_id(&mut state.last_group_id)
            .ok_or_else(|| GroupRepositoryError::query("group id space exhausted"))?;
        let id = GroupId::new(raw_id).map_err(|err| GroupRepositoryError::query(err.to_string()))?;
        let stored = group.clone().into_group(id);
        state.groups.insert(id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlog {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.read().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        Ok(state.posts.get(&id).and_then(|post| state.hydrate(post)))
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError> {
        let state = self.read().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let count = state
            .posts
            .values()
            .filter(|post| state.matches(post, filter))
            .count();
        u64::try_from(count).map_err(|err| PostRepositoryError::query(err.to_string()))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.read().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        Ok(state
            .filtered(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|post| state.hydrate(post))
            .collect())
    }

    async fn create(&self, author: &UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut state = self.write().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        if state.user(author).is_none() {
            return Err(PostRepositoryError::query(format!("unknown author {author}")));
        }
        let raw_id = BlogState::next_id(&mut state.last_post_id)
            .ok_or_else(|| PostRepositoryError::query("post id space exhausted"))?;
        let id = PostId::new(raw_id).map_err(|err| PostRepositoryError::query(err.to_string()))?;
        let stored = StoredPost {
            id,
            author: author.clone(),
            draft: draft.clone(),
            created_at: self.clock.utc(),
        };
        let post = state
            .hydrate(&stored)
            .ok_or_else(|| PostRepositoryError::query("failed to load stored post"))?;
        state.posts.insert(id, stored);
        Ok(post)
    }

    async fn update(&self, id: PostId, draft: &PostDraft) -> Result<Post, PostRepositoryError> {
        let mut state = self.write().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let stored = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| PostRepositoryError::query(format!("post {id} vanished")))?;
        stored.draft = draft.clone();
        state
            .posts
            .get(&id)
            .and_then(|post| state.hydrate(post))
            .ok_or_else(|| PostRepositoryError::query("failed to load updated post"))
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlog {
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.read().ok_or_else(|| CommentRepositoryError::query(POISONED))?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.post == post)
            .filter_map(|comment| {
                let author = state.user(&comment.author)?.clone();
                Some(Comment::new(
                    comment.id,
                    comment.post,
                    author,
                    comment.text.clone(),
                    comment.created_at,
                ))
            })
            .collect();
        comments.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then(a.id().cmp(&b.id())));
        Ok(comments)
    }

    async fn create(
        &self,
        post: PostId,
        author: &UserId,
        draft: &CommentDraft,
    ) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.write().ok_or_else(|| CommentRepositoryError::query(POISONED))?;
        let user = state
            .user(author)
            .cloned()
            .ok_or_else(|| CommentRepositoryError::query(format!("unknown author {author}")))?;
        if !state.posts.contains_key(&post) {
            return Err(CommentRepositoryError::query(format!("unknown post {post}")));
        }
        let raw_id = BlogState::next_id(&mut state.last_comment_id)
            .ok_or_else(|| CommentRepositoryError::query("comment id space exhausted"))?;
        let stored = StoredComment {
            id: CommentId::new(raw_id),
            post,
            author: author.clone(),
            text: draft.text().to_owned(),
            created_at: self.clock.utc(),
        };
        let comment = Comment::new(
            stored.id,
            post,
            user,
            stored.text.clone(),
            stored.created_at,
        );
        state.comments.push(stored);
        Ok(comment)
    }
}

#[async_trait]
impl FollowRepository for InMemoryBlog {
    async fn follow(&self, follow: &Follow) -> Result<(), FollowRepositoryError> {
        let mut state = self.write().ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        state
            .follows
            .insert((follow.user().clone(), follow.author().clone()));
        Ok(())
    }

    async fn unfollow(&self, user: &UserId, author: &UserId) -> Result<(), FollowRepositoryError> {
        let mut state = self.write().ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        state.follows.remove(&(user.clone(), author.clone()));
        Ok(())
    }

    async fn is_following(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let state = self.read().ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        Ok(state.follows.contains(&(user.clone(), author.clone())))
    }
}
