//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use inkwell_core::cascade::DeletionPlan;
use inkwell_core::domain::{
    Comment, CommentId, Like, LikeKind, LikeTarget, NewComment, NewPost, Post, PostId, User,
    UserId,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::comment_like::{self, Entity as CommentLikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        tracing::debug!(user_id = %user.id, "Inserting user");
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::UserName.eq(user_name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            },
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::RegisterDate)
            .order_by_asc(user::Column::UserName)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_anonymizing(&self, id: UserId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostLikeEntity::delete_many()
            .filter(post_like::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        CommentLikeEntity::delete_many()
            .filter(comment_like::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        PostEntity::update_many()
            .col_expr(post::Column::UserId, Expr::value(Option::<UserId>::None))
            .filter(post::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        CommentEntity::update_many()
            .col_expr(comment::Column::UserId, Expr::value(Option::<UserId>::None))
            .filter(comment::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let deleted = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if deleted.rows_affected == 0 {
            // dropping the transaction rolls it back
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(user_id = %id, "User row removed, content anonymized");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, "Post row inserted");
        Ok(model.into())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_cascade(&self, id: PostId) -> Result<DeletionPlan, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Row lock: a concurrent delete of the same post waits here and then
        // finds nothing.
        let locked = PostEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if locked.is_none() {
            return Err(RepoError::NotFound);
        }

        let comments = thread_comments(&txn, id).await?;
        let ids: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        let mut likes: Vec<Like> = PostLikeEntity::find()
            .filter(post_like::Column::PostId.eq(id))
            .all(&txn)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Into::into)
            .collect();
        likes.extend(comment_likes_of(&txn, &ids).await?);

        let plan = DeletionPlan::for_post(id, &comments, &likes);
        execute_plan(&txn, &plan).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = id, rows = plan.row_count(), "Post cascade committed");
        Ok(plan)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel::from(comment)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;
        tracing::debug!(comment_id = model.id, post_id = model.post_id, "Comment row inserted");
        Ok(model.into())
    }

    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedDate)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_asc(comment::Column::CreatedDate)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_cascade(&self, id: CommentId) -> Result<DeletionPlan, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(root) = CommentEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            return Err(RepoError::NotFound);
        };

        let comments = thread_comments(&txn, root.post_id).await?;
        let ids: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        let likes = comment_likes_of(&txn, &ids).await?;

        let plan = DeletionPlan::for_comment(id, &comments, &likes);
        execute_plan(&txn, &plan).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(comment_id = id, rows = plan.row_count(), "Comment cascade committed");
        Ok(plan)
    }
}

async fn thread_comments(
    txn: &DatabaseTransaction,
    post_id: PostId,
) -> Result<Vec<Comment>, RepoError> {
    let rows = CommentEntity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .all(txn)
        .await
        .map_err(map_db_err)?;
    Ok(rows.into_iter().map(Into::into).collect())
}

async fn comment_likes_of(
    txn: &DatabaseTransaction,
    ids: &[CommentId],
) -> Result<Vec<Like>, RepoError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = CommentLikeEntity::find()
        .filter(comment_like::Column::CommentId.is_in(ids.iter().copied()))
        .all(txn)
        .await
        .map_err(map_db_err)?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Issue the plan's deletes in order inside `txn`.
async fn execute_plan(txn: &DatabaseTransaction, plan: &DeletionPlan) -> Result<(), RepoError> {
    if !plan.comments.is_empty() {
        // every like on a removed comment, including ones added after the
        // snapshot was taken
        CommentLikeEntity::delete_many()
            .filter(comment_like::Column::CommentId.is_in(plan.comments.iter().copied()))
            .exec(txn)
            .await
            .map_err(map_db_err)?;
    }

    for &id in &plan.comments {
        CommentEntity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(map_db_err)?;
    }

    if let Some(post_id) = plan.post {
        PostLikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .exec(txn)
            .await
            .map_err(map_db_err)?;
        PostEntity::delete_by_id(post_id)
            .exec(txn)
            .await
            .map_err(map_db_err)?;
    }

    Ok(())
}

/// PostgreSQL storage for both like tables.
pub struct PostgresLikeRepository {
    db: DbConn,
}

impl PostgresLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        tracing::debug!(user_id = %like.user_id, target = %like.target, "Inserting like");

        let inserted: Like = match like.target {
            LikeTarget::Post(post_id) => post_like::ActiveModel {
                user_id: Set(like.user_id),
                post_id: Set(post_id),
                created_at: Set(like.created_at.into()),
            }
            .insert(&self.db)
            .await
            .map_err(map_db_err)?
            .into(),
            LikeTarget::Comment(comment_id) => comment_like::ActiveModel {
                user_id: Set(like.user_id),
                comment_id: Set(comment_id),
                created_at: Set(like.created_at.into()),
            }
            .insert(&self.db)
            .await
            .map_err(map_db_err)?
            .into(),
        };
        Ok(inserted)
    }

    async fn delete(&self, user_id: UserId, target: LikeTarget) -> Result<bool, RepoError> {
        let result = match target {
            LikeTarget::Post(id) => PostLikeEntity::delete_by_id((user_id, id)).exec(&self.db).await,
            LikeTarget::Comment(id) => {
                CommentLikeEntity::delete_by_id((user_id, id))
                    .exec(&self.db)
                    .await
            }
        }
        .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn find(&self, user_id: UserId, target: LikeTarget) -> Result<Option<Like>, RepoError> {
        let like = match target {
            LikeTarget::Post(id) => PostLikeEntity::find_by_id((user_id, id))
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .map(Into::into),
            LikeTarget::Comment(id) => CommentLikeEntity::find_by_id((user_id, id))
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .map(Into::into),
        };
        Ok(like)
    }

    async fn list_for_target(&self, target: LikeTarget) -> Result<Vec<Like>, RepoError> {
        match target {
            LikeTarget::Post(id) => {
                let rows = PostLikeEntity::find()
                    .filter(post_like::Column::PostId.eq(id))
                    .order_by_asc(post_like::Column::CreatedAt)
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
            LikeTarget::Comment(id) => self.list_for_comments(&[id]).await,
        }
    }

    async fn list_for_comments(&self, comment_ids: &[CommentId]) -> Result<Vec<Like>, RepoError> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = CommentLikeEntity::find()
            .filter(comment_like::Column::CommentId.is_in(comment_ids.iter().copied()))
            .order_by_asc(comment_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_user(&self, user_id: UserId, kind: LikeKind) -> Result<Vec<Like>, RepoError> {
        match kind {
            LikeKind::Post => {
                let rows = PostLikeEntity::find()
                    .filter(post_like::Column::UserId.eq(user_id))
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
            LikeKind::Comment => {
                let rows = CommentLikeEntity::find()
                    .filter(comment_like::Column::UserId.eq(user_id))
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
        }
    }

    async fn list_all(&self, kind: LikeKind) -> Result<Vec<Like>, RepoError> {
        match kind {
            LikeKind::Post => {
                let rows = PostLikeEntity::find()
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
            LikeKind::Comment => {
                let rows = CommentLikeEntity::find()
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(rows.into_iter().map(Into::into).collect())
            }
        }
    }
}
