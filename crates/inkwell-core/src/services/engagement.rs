//! Likes on posts and comments, one code path for both kinds.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CommentId, Like, LikeKind, LikeTarget, PostId, User, UserId};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::policy::{self, Action, Actor};
use crate::thread::{self, LikeSummary};

use super::Stores;

/// Result of a like request. A repeated like is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    Created(Like),
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeView {
    pub user_id: UserId,
    pub user_name: String,
    pub target: LikeTarget,
    /// `None` when the target was removed after the like was read.
    pub item: Option<LikedItem>,
    pub created_at: DateTime<Utc>,
}

/// Short summary of the liked post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LikedItem {
    Post {
        id: PostId,
        title: String,
        content: String,
        photo_url: Option<String>,
    },
    Comment {
        id: CommentId,
        content: String,
        created_date: DateTime<Utc>,
    },
}

#[derive(Clone)]
pub struct EngagementService {
    stores: Stores,
}

impl EngagementService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn like(&self, actor: &Actor, target: LikeTarget) -> DomainResult<LikeOutcome> {
        self.require_target(target).await?;
        self.stores.require_author(actor.user_id).await?;

        if self.stores.likes.find(actor.user_id, target).await?.is_some() {
            tracing::debug!(user_id = %actor.user_id, %target, "Like already exists");
            return Ok(LikeOutcome::AlreadyExists);
        }

        let like = Like {
            user_id: actor.user_id,
            target,
            created_at: self.stores.clock.now(),
        };

        match self.stores.likes.insert(like).await {
            Ok(like) => {
                tracing::info!(user_id = %actor.user_id, %target, "Like created");
                Ok(LikeOutcome::Created(like))
            }
            // The unique key is the arbiter when two requests race past the
            // pre-check.
            Err(RepoError::Constraint(_)) => {
                tracing::warn!(user_id = %actor.user_id, %target, "Lost like race");
                Ok(LikeOutcome::AlreadyExists)
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found(
                target.entity_name(),
                target.id(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn unlike(&self, actor: &Actor, target: LikeTarget) -> DomainResult<()> {
        self.stores.require_author(actor.user_id).await?;
        if !self.stores.likes.delete(actor.user_id, target).await? {
            return Err(DomainError::not_found(like_entity(target.kind()), target));
        }

        tracing::info!(user_id = %actor.user_id, %target, "Like removed");
        Ok(())
    }

    pub async fn get_like(&self, user_id: UserId, target: LikeTarget) -> DomainResult<LikeView> {
        let like = self
            .stores
            .likes
            .find(user_id, target)
            .await?
            .ok_or_else(|| DomainError::not_found(like_entity(target.kind()), target))?;

        let mut views = self.views(vec![like]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("like view missing".to_string()))
    }

    pub async fn list_likes_for_target(&self, target: LikeTarget) -> DomainResult<Vec<LikeSummary>> {
        self.require_target(target).await?;

        let likes = self.stores.likes.list_for_target(target).await?;
        let users = self.users_for(&likes).await?;
        Ok(thread::summarize_likes(&likes, &users))
    }

    /// Post likes by a user are public; comment likes are visible to the
    /// user and to administrators only.
    pub async fn list_likes_by_user(
        &self,
        actor: Option<&Actor>,
        user_id: UserId,
        kind: LikeKind,
    ) -> DomainResult<Vec<LikeView>> {
        self.stores.require_user(user_id).await?;
        if kind == LikeKind::Comment {
            let actor = actor.ok_or(DomainError::Unauthorized)?;
            policy::authorize(actor, Some(user_id), Action::ReadPrivate).ensure()?;
        }

        let likes = self.stores.likes.list_by_user(user_id, kind).await?;
        self.views(likes).await
    }

    pub async fn list_all_likes(&self, kind: LikeKind) -> DomainResult<Vec<LikeView>> {
        let likes = self.stores.likes.list_all(kind).await?;
        self.views(likes).await
    }

    async fn require_target(&self, target: LikeTarget) -> DomainResult<()> {
        let exists = match target {
            LikeTarget::Post(id) => self.stores.posts.find_by_id(id).await?.is_some(),
            LikeTarget::Comment(id) => self.stores.comments.find_by_id(id).await?.is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(DomainError::not_found(target.entity_name(), target.id()))
        }
    }

    async fn users_for(&self, likes: &[Like]) -> DomainResult<Vec<User>> {
        let ids: Vec<UserId> = likes
            .iter()
            .map(|l| l.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.stores.users.find_by_ids(&ids).await?)
    }

    async fn views(&self, mut likes: Vec<Like>) -> DomainResult<Vec<LikeView>> {
        let users: HashMap<UserId, String> = self
            .users_for(&likes)
            .await?
            .into_iter()
            .map(|u| (u.id, u.user_name))
            .collect();
        let items = self.items_for(&likes).await?;

        likes.sort_by_key(|l| (l.created_at, l.target.id(), l.user_id));
        Ok(likes
            .into_iter()
            .map(|l| LikeView {
                user_id: l.user_id,
                user_name: users
                    .get(&l.user_id)
                    .cloned()
                    .unwrap_or_else(|| thread::UNKNOWN_AUTHOR.to_string()),
                target: l.target,
                item: items.get(&l.target).cloned(),
                created_at: l.created_at,
            })
            .collect())
    }

    async fn items_for(&self, likes: &[Like]) -> DomainResult<HashMap<LikeTarget, LikedItem>> {
        let targets: HashSet<LikeTarget> = likes.iter().map(|l| l.target).collect();

        let mut items = HashMap::with_capacity(targets.len());
        for target in targets {
            let item = match target {
                LikeTarget::Post(id) => {
                    self.stores
                        .posts
                        .find_by_id(id)
                        .await?
                        .map(|p| LikedItem::Post {
                            id: p.id,
                            title: p.title,
                            content: p.content,
                            photo_url: p.photo_url,
                        })
                }
                LikeTarget::Comment(id) => {
                    self.stores
                        .comments
                        .find_by_id(id)
                        .await?
                        .map(|c| LikedItem::Comment {
                            id: c.id,
                            content: c.content,
                            created_date: c.created_date,
                        })
                }
            };
            if let Some(item) = item {
                items.insert(target, item);
            }
        }
        Ok(items)
    }
}

fn like_entity(kind: LikeKind) -> &'static str {
    match kind {
        LikeKind::Post => "PostLike",
        LikeKind::Comment => "CommentLike",
    }
}
