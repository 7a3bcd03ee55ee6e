//! Comment entity for SeaORM.
//!
//! Replies reference their parent through `parent_comment_id`; every row of a
//! thread carries the root post's id.

use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub user_id: Option<Uuid>,
    #[sea_orm(indexed)]
    pub post_id: i64,
    pub parent_comment_id: Option<i64>,
    pub created_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCommentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(has_many = "super::comment_like::Entity")]
    CommentLike,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommentLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for inkwell_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            post_id: model.post_id,
            parent_comment_id: model.parent_comment_id,
            created_date: model.created_date.into(),
        }
    }
}

impl From<inkwell_core::domain::Comment> for ActiveModel {
    fn from(comment: inkwell_core::domain::Comment) -> Self {
        Self {
            id: Set(comment.id),
            content: Set(comment.content),
            user_id: Set(comment.user_id),
            post_id: Set(comment.post_id),
            parent_comment_id: Set(comment.parent_comment_id),
            created_date: Set(comment.created_date.into()),
        }
    }
}

impl From<inkwell_core::domain::NewComment> for ActiveModel {
    fn from(comment: inkwell_core::domain::NewComment) -> Self {
        Self {
            id: NotSet,
            content: Set(comment.content),
            user_id: Set(Some(comment.user_id)),
            post_id: Set(comment.post_id),
            parent_comment_id: Set(comment.parent_comment_id),
            created_date: Set(comment.created_date.into()),
        }
    }
}
