//! Posts and comments: the write path of the content graph and its reads.

use std::collections::{BTreeMap, HashSet};

use crate::cascade::DeletionPlan;
use crate::domain::{
    Comment, CommentId, Like, LikeTarget, NewComment, NewPost, PhotoUpdate, Post, PostId, User,
    UserId,
};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::policy::{self, Action, Actor};
use crate::thread::{CommentView, PostView, ThreadProjection};

use super::Stores;
use super::validation::{self, MAX_COMMENT_LEN, MAX_POST_CONTENT_LEN, MAX_TITLE_LEN};

#[derive(Debug, Clone)]
pub struct NewPostInput {
    pub title: String,
    pub content: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub photo: PhotoUpdate,
}

#[derive(Debug, Clone)]
pub struct NewCommentInput {
    pub post_id: PostId,
    pub content: String,
    pub parent_comment_id: Option<CommentId>,
}

#[derive(Clone)]
pub struct ContentService {
    stores: Stores,
}

impl ContentService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create_post(&self, actor: &Actor, input: NewPostInput) -> DomainResult<Post> {
        validate_post(&input.title, &input.content)?;
        self.stores.require_author(actor.user_id).await?;

        let post = self
            .stores
            .posts
            .insert(NewPost {
                user_id: actor.user_id,
                title: input.title,
                content: input.content,
                photo_url: input.photo_url,
                register_date: self.stores.clock.now(),
            })
            .await?;

        tracing::info!(post_id = post.id, author = %actor.user_id, "Post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: PostId) -> DomainResult<PostView> {
        let post = self.require_post(post_id).await?;
        self.project_post(post).await
    }

    pub async fn list_posts(&self) -> DomainResult<Vec<PostView>> {
        let posts = self.stores.posts.list_all().await?;
        self.project_posts(posts).await
    }

    pub async fn list_posts_by_user(&self, user_id: UserId) -> DomainResult<Vec<PostView>> {
        self.stores.require_user(user_id).await?;
        let posts = self.stores.posts.find_by_user_id(user_id).await?;
        self.project_posts(posts).await
    }

    pub async fn update_post(
        &self,
        post_id: PostId,
        actor: &Actor,
        update: PostUpdate,
    ) -> DomainResult<Post> {
        self.stores.require_author(actor.user_id).await?;
        let mut post = self.require_post(post_id).await?;
        policy::authorize(actor, post.user_id, Action::Edit).ensure()?;
        validate_post(&update.title, &update.content)?;

        post.title = update.title;
        post.content = update.content;
        post.photo_url = update.photo.apply(post.photo_url.take());

        let post = self
            .stores
            .posts
            .update(post)
            .await
            .map_err(|e| vanished(e, "Post", post_id))?;

        tracing::debug!(post_id, "Post updated");
        Ok(post)
    }

    /// Remove a post together with its comment forest and every like on it.
    pub async fn delete_post(&self, post_id: PostId, actor: &Actor) -> DomainResult<DeletionPlan> {
        self.stores.require_author(actor.user_id).await?;
        let post = self.require_post(post_id).await?;
        policy::authorize(actor, post.user_id, Action::Delete).ensure()?;

        let plan = self
            .stores
            .posts
            .delete_cascade(post_id)
            .await
            .map_err(|e| vanished(e, "Post", post_id))?;

        tracing::info!(
            post_id,
            comments = plan.comments.len(),
            likes = plan.post_likes.len() + plan.comment_likes.len(),
            "Post deleted"
        );
        Ok(plan)
    }

    pub async fn create_comment(
        &self,
        actor: &Actor,
        input: NewCommentInput,
    ) -> DomainResult<Comment> {
        validation::required_text("Content", &input.content, MAX_COMMENT_LEN)?;
        self.require_post(input.post_id).await?;

        if let Some(parent_id) = input.parent_comment_id {
            match self.stores.comments.find_by_id(parent_id).await? {
                Some(parent) if parent.post_id == input.post_id => {}
                Some(parent) => {
                    return Err(DomainError::validation(format!(
                        "Parent comment {parent_id} belongs to post {}, not {}",
                        parent.post_id, input.post_id
                    )));
                }
                None => {
                    return Err(DomainError::validation(format!(
                        "Parent comment {parent_id} does not exist"
                    )));
                }
            }
        }
        self.stores.require_author(actor.user_id).await?;

        let comment = self
            .stores
            .comments
            .insert(NewComment {
                user_id: actor.user_id,
                post_id: input.post_id,
                parent_comment_id: input.parent_comment_id,
                content: input.content,
                created_date: self.stores.clock.now(),
            })
            .await
            .map_err(|e| vanished(e, "Post", input.post_id))?;

        tracing::info!(
            comment_id = comment.id,
            post_id = comment.post_id,
            parent = ?comment.parent_comment_id,
            "Comment created"
        );
        Ok(comment)
    }

    /// One comment with its reply subtree.
    pub async fn get_comment(&self, comment_id: CommentId) -> DomainResult<CommentView> {
        let comment = self.require_comment(comment_id).await?;
        let thread = self.load_thread(comment.post_id).await?;
        thread
            .projection()
            .subtree(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }

    pub async fn update_comment(
        &self,
        comment_id: CommentId,
        actor: &Actor,
        content: String,
    ) -> DomainResult<Comment> {
        self.stores.require_author(actor.user_id).await?;
        let mut comment = self.require_comment(comment_id).await?;
        policy::authorize(actor, comment.user_id, Action::Edit).ensure()?;
        validation::required_text("Content", &content, MAX_COMMENT_LEN)?;

        comment.content = content;
        let comment = self
            .stores
            .comments
            .update(comment)
            .await
            .map_err(|e| vanished(e, "Comment", comment_id))?;

        tracing::debug!(comment_id, "Comment updated");
        Ok(comment)
    }

    /// Remove a comment, all of its transitive replies and their likes.
    pub async fn delete_comment(
        &self,
        comment_id: CommentId,
        actor: &Actor,
    ) -> DomainResult<DeletionPlan> {
        self.stores.require_author(actor.user_id).await?;
        let comment = self.require_comment(comment_id).await?;
        policy::authorize(actor, comment.user_id, Action::Delete).ensure()?;

        let plan = self
            .stores
            .comments
            .delete_cascade(comment_id)
            .await
            .map_err(|e| vanished(e, "Comment", comment_id))?;

        tracing::info!(
            comment_id,
            replies = plan.comments.len().saturating_sub(1),
            likes = plan.comment_likes.len(),
            "Comment deleted"
        );
        Ok(plan)
    }

    /// Root comments of a post with their reply trees. Comments by
    /// deactivated authors are left out.
    pub async fn list_root_comments(&self, post_id: PostId) -> DomainResult<Vec<CommentView>> {
        self.require_post(post_id).await?;
        let thread = self.load_thread(post_id).await?;
        Ok(thread.projection().roots())
    }

    /// Root comments of every post, each with its reply tree.
    pub async fn list_all_root_comments(&self) -> DomainResult<Vec<CommentView>> {
        let mut posts = self.stores.posts.list_all().await?;
        posts.sort_by_key(|p| p.id);

        let mut roots = Vec::new();
        for post in posts {
            let thread = self.load_thread(post.id).await?;
            roots.extend(thread.projection().roots());
        }
        Ok(roots)
    }

    pub async fn list_comments_by_user(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> DomainResult<Vec<CommentView>> {
        self.stores.require_user(user_id).await?;
        policy::authorize(actor, Some(user_id), Action::ReadPrivate).ensure()?;

        let mut comments = self.stores.comments.find_by_user_id(user_id).await?;
        comments.sort_by_key(|c| (c.created_date, c.id));

        let mut by_post: BTreeMap<PostId, Vec<CommentId>> = BTreeMap::new();
        for comment in &comments {
            by_post.entry(comment.post_id).or_default().push(comment.id);
        }

        let mut views = Vec::with_capacity(comments.len());
        for (post_id, ids) in by_post {
            let thread = self.load_thread(post_id).await?;
            let projection = thread.projection();
            views.extend(ids.into_iter().filter_map(|id| projection.subtree(id)));
        }
        views.sort_by_key(|v| (v.created_date, v.id));
        Ok(views)
    }

    async fn require_post(&self, id: PostId) -> DomainResult<Post> {
        self.stores
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn require_comment(&self, id: CommentId) -> DomainResult<Comment> {
        self.stores
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    async fn project_posts(&self, posts: Vec<Post>) -> DomainResult<Vec<PostView>> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.project_post(post).await?);
        }
        Ok(views)
    }

    async fn project_post(&self, post: Post) -> DomainResult<PostView> {
        let post_likes = self
            .stores
            .likes
            .list_for_target(LikeTarget::Post(post.id))
            .await?;
        let mut thread = self.load_thread(post.id).await?;
        thread.add_users(&self.stores, post.user_id, &post_likes).await?;

        Ok(thread.projection().project_post(&post, &post_likes))
    }

    async fn load_thread(&self, post_id: PostId) -> DomainResult<ThreadSnapshot> {
        let comments = self.stores.comments.find_by_post_id(post_id).await?;
        let ids: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        let likes = if ids.is_empty() {
            Vec::new()
        } else {
            self.stores.likes.list_for_comments(&ids).await?
        };

        let user_ids: HashSet<UserId> = comments
            .iter()
            .filter_map(|c| c.user_id)
            .chain(likes.iter().map(|l| l.user_id))
            .collect();
        let users = self.load_users(user_ids).await?;

        Ok(ThreadSnapshot {
            comments,
            likes,
            users,
        })
    }

    async fn load_users(&self, ids: HashSet<UserId>) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<UserId> = ids.into_iter().collect();
        Ok(self.stores.users.find_by_ids(&ids).await?)
    }
}

/// Rows of one post's thread loaded from the store.
struct ThreadSnapshot {
    comments: Vec<Comment>,
    likes: Vec<Like>,
    users: Vec<User>,
}

impl ThreadSnapshot {
    fn projection(&self) -> ThreadProjection<'_> {
        ThreadProjection::new(&self.comments, &self.likes, &self.users)
    }

    /// Load users referenced by the post itself that the thread did not.
    async fn add_users(
        &mut self,
        stores: &Stores,
        author: Option<UserId>,
        post_likes: &[Like],
    ) -> DomainResult<()> {
        let known: HashSet<UserId> = self.users.iter().map(|u| u.id).collect();
        let missing: Vec<UserId> = author
            .into_iter()
            .chain(post_likes.iter().map(|l| l.user_id))
            .filter(|id| !known.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        if !missing.is_empty() {
            self.users.extend(stores.users.find_by_ids(&missing).await?);
        }
        Ok(())
    }
}

fn validate_post(title: &str, content: &str) -> DomainResult<()> {
    validation::required_text("Title", title, MAX_TITLE_LEN)?;
    validation::required_text("Content", content, MAX_POST_CONTENT_LEN)
}

/// A row that disappeared between the lookup and the write reads as NotFound
/// for that entity rather than a generic one.
fn vanished(err: RepoError, entity_type: &'static str, id: i64) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
