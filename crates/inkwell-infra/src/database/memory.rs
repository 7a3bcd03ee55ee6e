//! In-memory content graph store - used when no database is configured.
//!
//! Every operation runs under one async `RwLock`; multi-row changes hold the
//! write guard for their whole duration, which makes them atomic with respect
//! to every other operation. Note: Data is lost on process restart.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkwell_core::cascade::DeletionPlan;
use inkwell_core::domain::{
    Comment, CommentId, Like, LikeKind, LikeTarget, NewComment, NewPost, Post, PostId, User,
    UserId,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    likes: HashMap<(UserId, LikeTarget), Like>,
    last_post_id: PostId,
    last_comment_id: CommentId,
}

impl Tables {
    fn target_exists(&self, target: LikeTarget) -> bool {
        match target {
            LikeTarget::Post(id) => self.posts.contains_key(&id),
            LikeTarget::Comment(id) => self.comments.contains_key(&id),
        }
    }

    fn unique_user_fields(&self, user: &User) -> Result<(), RepoError> {
        for other in self.users.values().filter(|u| u.id != user.id) {
            if other.user_name == user.user_name {
                return Err(RepoError::Constraint(format!(
                    "user_name '{}' already exists",
                    user.user_name
                )));
            }
            if other.email == user.email {
                return Err(RepoError::Constraint("email already exists".to_string()));
            }
        }
        Ok(())
    }

    /// Comments of one post and every like touching the post or them.
    fn thread_snapshot(&self, post_id: PostId) -> (Vec<Comment>, Vec<Like>) {
        let comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        let ids: HashSet<CommentId> = comments.iter().map(|c| c.id).collect();
        let likes = self
            .likes
            .values()
            .filter(|l| match l.target {
                LikeTarget::Post(id) => id == post_id,
                LikeTarget::Comment(id) => ids.contains(&id),
            })
            .cloned()
            .collect();
        (comments, likes)
    }

    fn apply(&mut self, plan: &DeletionPlan) {
        for &(user_id, comment_id) in &plan.comment_likes {
            self.likes
                .remove(&(user_id, LikeTarget::Comment(comment_id)));
        }
        for id in &plan.comments {
            self.comments.remove(id);
        }
        for &(user_id, post_id) in &plan.post_likes {
            self.likes.remove(&(user_id, LikeTarget::Post(post_id)));
        }
        if let Some(id) = plan.post {
            self.posts.remove(&id);
        }
    }
}

/// Content graph store backed by process memory.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, UserId> for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.unique_user_fields(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("user id already exists".to_string()));
        }
        tables.unique_user_fields(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| (a.register_date, &a.user_name).cmp(&(b.register_date, &b.user_name)));
        Ok(users)
    }

    async fn delete_anonymizing(&self, id: UserId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        tables.likes.retain(|(user_id, _), _| *user_id != id);
        for post in tables.posts.values_mut().filter(|p| p.user_id == Some(id)) {
            post.user_id = None;
        }
        for comment in tables.comments.values_mut().filter(|c| c.user_id == Some(id)) {
            comment.user_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.posts.get_mut(&post.id) {
            Some(row) => {
                *row = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new.user_id) {
            return Err(RepoError::NotFound);
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: new.title,
            content: new.content,
            photo_url: new.photo_url,
            register_date: new.register_date,
            user_id: Some(new.user_id),
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn delete_cascade(&self, id: PostId) -> Result<DeletionPlan, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        let (comments, likes) = tables.thread_snapshot(id);
        let plan = DeletionPlan::for_post(id, &comments, &likes);
        tables.apply(&plan);

        tracing::debug!(post_id = id, rows = plan.row_count(), "Post cascade applied");
        Ok(plan)
    }
}

#[async_trait]
impl BaseRepository<Comment, CommentId> for InMemoryStore {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.get_mut(&comment.id) {
            Some(row) => {
                *row = comment.clone();
                Ok(comment)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new.post_id) || !tables.users.contains_key(&new.user_id) {
            return Err(RepoError::NotFound);
        }
        if let Some(parent_id) = new.parent_comment_id {
            match tables.comments.get(&parent_id) {
                Some(parent) if parent.post_id == new.post_id => {}
                Some(_) => {
                    return Err(RepoError::Constraint(
                        "parent comment belongs to another post".to_string(),
                    ));
                }
                None => return Err(RepoError::NotFound),
            }
        }

        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            content: new.content,
            user_id: Some(new.user_id),
            post_id: new.post_id,
            parent_comment_id: new.parent_comment_id,
            created_date: new.created_date,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn delete_cascade(&self, id: CommentId) -> Result<DeletionPlan, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(post_id) = tables.comments.get(&id).map(|c| c.post_id) else {
            return Err(RepoError::NotFound);
        };

        let (comments, likes) = tables.thread_snapshot(post_id);
        let plan = DeletionPlan::for_comment(id, &comments, &likes);
        tables.apply(&plan);

        tracing::debug!(comment_id = id, rows = plan.row_count(), "Comment cascade applied");
        Ok(plan)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.target_exists(like.target) || !tables.users.contains_key(&like.user_id) {
            return Err(RepoError::NotFound);
        }
        if tables.likes.contains_key(&like.key()) {
            return Err(RepoError::Constraint(format!(
                "{} is already liked by {}",
                like.target, like.user_id
            )));
        }
        tables.likes.insert(like.key(), like.clone());
        Ok(like)
    }

    async fn delete(&self, user_id: UserId, target: LikeTarget) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.likes.remove(&(user_id, target)).is_some())
    }

    async fn find(&self, user_id: UserId, target: LikeTarget) -> Result<Option<Like>, RepoError> {
        Ok(self.tables.read().await.likes.get(&(user_id, target)).cloned())
    }

    async fn list_for_target(&self, target: LikeTarget) -> Result<Vec<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.target == target)
            .cloned()
            .collect())
    }

    async fn list_for_comments(&self, comment_ids: &[CommentId]) -> Result<Vec<Like>, RepoError> {
        let ids: HashSet<CommentId> = comment_ids.iter().copied().collect();
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| matches!(l.target, LikeTarget::Comment(id) if ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: UserId, kind: LikeKind) -> Result<Vec<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.user_id == user_id && l.target.kind() == kind)
            .cloned()
            .collect())
    }

    async fn list_all(&self, kind: LikeKind) -> Result<Vec<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.target.kind() == kind)
            .cloned()
            .collect())
    }
}
