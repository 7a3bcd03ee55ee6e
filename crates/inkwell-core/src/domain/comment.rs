use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

/// Store-assigned comment id.
pub type CommentId = i64;

/// Comment entity.
///
/// Replies are comments whose `parent_comment_id` points at another comment
/// of the same post; every comment in a thread carries the root post's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub user_id: Option<UserId>,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub created_date: DateTime<Utc>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_comment_id.is_none()
    }
}

/// A comment that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub created_date: DateTime<Utc>,
}
