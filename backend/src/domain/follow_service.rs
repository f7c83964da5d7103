//! Follow and unfollow use-cases.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::FollowCommand;
use crate::domain::{Error, Follow, Repositories, User, UserId};

/// Implements [`FollowCommand`] over the persistence ports.
#[derive(Clone)]
pub struct FollowService {
    repos: Repositories,
}

impl FollowService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn find_author(&self, username: &str) -> Result<User, Error> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))
    }
}

#[async_trait]
impl FollowCommand for FollowService {
    async fn follow(&self, user: &UserId, author_username: &str) -> Result<User, Error> {
        let author = self.find_author(author_username).await?;
        match Follow::try_new(user.clone(), author.id().clone()) {
            Ok(follow) => {
                self.repos.follows.follow(&follow).await?;
                info!(user = %user, author = %author.id(), "follow recorded");
            }
            Err(err) => debug!(user = %user, "{err}; ignoring"),
        }
        Ok(author)
    }

    async fn unfollow(&self, user: &UserId, author_username: &str) -> Result<User, Error> {
        let author = self.find_author(author_username).await?;
        self.repos.follows.unfollow(user, author.id()).await?;
        info!(user = %user, author = %author.id(), "follow removed");
        Ok(author)
    }
}
