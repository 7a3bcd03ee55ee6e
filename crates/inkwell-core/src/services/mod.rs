//! Application services: the operations request handlers call.
//!
//! Every service works purely against the [`ports`](crate::ports) traits, so
//! the same code runs over the in-memory store and over PostgreSQL.

mod content;
mod engagement;
mod users;
pub mod validation;

use std::sync::Arc;

use crate::domain::{User, UserId};
use crate::error::{DomainError, DomainResult};
use crate::ports::{Clock, CommentRepository, LikeRepository, PostRepository, UserRepository};

pub use content::{ContentService, NewCommentInput, NewPostInput, PostUpdate};
pub use engagement::{EngagementService, LikeOutcome, LikeView, LikedItem};
pub use users::{ProfileUpdate, RegisterUserInput, UserService};

/// The repositories and clock a service needs, bundled.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub clock: Arc<dyn Clock>,
}

impl Stores {
    /// Build from one adapter that implements every repository.
    pub fn from_shared<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: UserRepository + PostRepository + CommentRepository + LikeRepository + 'static,
    {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store,
            clock,
        }
    }

    pub(crate) async fn require_user(&self, id: UserId) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// The acting user, who must still exist and be active to write.
    pub(crate) async fn require_author(&self, id: UserId) -> DomainResult<User> {
        match self.users.find_by_id(id).await? {
            Some(user) if user.is_active() => Ok(user),
            Some(_) => {
                tracing::warn!(user_id = %id, "Write attempted by deactivated account");
                Err(DomainError::Unauthorized)
            }
            None => Err(DomainError::Unauthorized),
        }
    }
}
