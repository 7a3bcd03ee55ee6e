use async_trait::async_trait;

use crate::cascade::DeletionPlan;
use crate::domain::{
    Comment, CommentId, Like, LikeKind, LikeTarget, NewComment, NewPost, Post, PostId, User,
    UserId,
};
use crate::error::RepoError;

/// Generic repository trait for rows addressed by a single id.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` when the
    /// row no longer exists; concurrent updates are last-writer-wins.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId> {
    /// Insert a new user. User name and email are unique.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError>;

    async fn list_all(&self) -> Result<Vec<User>, RepoError>;

    /// Physically remove a user in one unit: their likes are deleted and the
    /// authorship of their posts and comments is set to null.
    async fn delete_anonymizing(&self, id: UserId) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Post>, RepoError>;

    /// Remove the post with its whole comment forest and every like on them,
    /// atomically. Returns the executed plan, or `RepoError::NotFound` if the
    /// post is already gone.
    async fn delete_cascade(&self, id: PostId) -> Result<DeletionPlan, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, CommentId> {
    /// Insert a comment. The post and the parent (if any) must exist.
    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Comment>, RepoError>;

    /// Remove the comment, its transitive replies and all their likes,
    /// atomically.
    async fn delete_cascade(&self, id: CommentId) -> Result<DeletionPlan, RepoError>;
}

/// Storage for both like relations.
///
/// The composite `(user_id, target)` key is unique; a second insert for the
/// same key fails with `RepoError::Constraint`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn insert(&self, like: Like) -> Result<Like, RepoError>;

    /// Returns `false` when no such like existed.
    async fn delete(&self, user_id: UserId, target: LikeTarget) -> Result<bool, RepoError>;

    async fn find(&self, user_id: UserId, target: LikeTarget) -> Result<Option<Like>, RepoError>;

    async fn list_for_target(&self, target: LikeTarget) -> Result<Vec<Like>, RepoError>;

    async fn list_for_comments(&self, comment_ids: &[CommentId]) -> Result<Vec<Like>, RepoError>;

    async fn list_by_user(&self, user_id: UserId, kind: LikeKind) -> Result<Vec<Like>, RepoError>;

    async fn list_all(&self, kind: LikeKind) -> Result<Vec<Like>, RepoError>;
}
