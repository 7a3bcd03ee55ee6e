use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, PostId, UserId};

/// Which relation a like lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeKind {
    Post,
    Comment,
}

/// The liked node of the content graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(PostId),
    Comment(CommentId),
}

impl LikeTarget {
    pub fn kind(&self) -> LikeKind {
        match self {
            Self::Post(_) => LikeKind::Post,
            Self::Comment(_) => LikeKind::Comment,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Post(_) => "Post",
            Self::Comment(_) => "Comment",
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.entity_name(), self.id())
    }
}

/// A like. Identity is the `(user_id, target)` pair; likes are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: UserId,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn key(&self) -> (UserId, LikeTarget) {
        (self.user_id, self.target)
    }
}
