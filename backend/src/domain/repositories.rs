//! Bundle of the driven persistence ports shared by the domain services.

use std::sync::Arc;

use crate::domain::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

/// Persistence adapters, one per aggregate.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    /// Use one store for every aggregate.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + GroupRepository
            + PostRepository
            + CommentRepository
            + FollowRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock-backed bundles for service unit tests.
    use super::*;
    use crate::domain::ports::{
        MockCommentRepository, MockFollowRepository, MockGroupRepository, MockPostRepository,
        MockUserRepository,
    };

    use crate::domain::{FullName, Post, PostId, PostText, User, UserId, Username};
    use chrono::Utc;

    pub(crate) fn user(username: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(username).expect("fixture username"),
            FullName::default(),
        )
    }

    pub(crate) fn post(id: i32, author: &User) -> Post {
        Post::new(
            PostId::new(id).expect("fixture post id"),
            author.clone(),
            PostText::new(format!("post number {id}")).expect("fixture text"),
            None,
            None,
            Utc::now(),
        )
    }

    /// Mocks with no expectations; tests replace the ones they exercise.
    pub(crate) struct MockRepositories {
        pub users: MockUserRepository,
        pub groups: MockGroupRepository,
        pub posts: MockPostRepository,
        pub comments: MockCommentRepository,
        pub follows: MockFollowRepository,
    }

    impl MockRepositories {
        pub(crate) fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                groups: MockGroupRepository::new(),
                posts: MockPostRepository::new(),
                comments: MockCommentRepository::new(),
                follows: MockFollowRepository::new(),
            }
        }

        pub(crate) fn build(self) -> Repositories {
            Repositories {
                users: Arc::new(self.users),
                groups: Arc::new(self.groups),
                posts: Arc::new(self.posts),
                comments: Arc::new(self.comments),
                follows: Arc::new(self.follows),
            }
        }
    }
}
