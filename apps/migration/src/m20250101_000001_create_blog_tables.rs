//! Users, posts, threaded comments and the two like relations.
//!
//! Authorship columns are nullable and set to NULL when an account is
//! purged. Likes are keyed by `(user_id, target_id)`, which makes a second
//! like by the same user a unique violation.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::UserName, 256).unique_key().not_null())
                    .col(string_len(Users::Email, 256).unique_key().not_null())
                    .col(string_len(Users::FirstName, 50).not_null())
                    .col(string_len(Users::LastName, 50).not_null())
                    .col(ColumnDef::new(Users::BirthDate).date().null())
                    .col(ColumnDef::new(Users::PhotoUrl).string().null())
                    .col(timestamp_with_time_zone(Users::RegisterDate).not_null())
                    .col(boolean(Users::Status).not_null().default(true))
                    .col(json_binary(Users::Roles).not_null())
                    .col(string(Users::PasswordHash).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(big_integer(Posts::Id).auto_increment().primary_key())
                    .col(string_len(Posts::Title, 50).not_null())
                    .col(text(Posts::Content).not_null())
                    .col(ColumnDef::new(Posts::PhotoUrl).string().null())
                    .col(timestamp_with_time_zone(Posts::RegisterDate).not_null())
                    .col(ColumnDef::new(Posts::UserId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(big_integer(Comments::Id).auto_increment().primary_key())
                    .col(text(Comments::Content).not_null())
                    .col(ColumnDef::new(Comments::UserId).uuid().null())
                    .col(big_integer(Comments::PostId).not_null())
                    .col(ColumnDef::new(Comments::ParentCommentId).big_integer().null())
                    .col(timestamp_with_time_zone(Comments::CreatedDate).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_post")
                            .from(Comments::Table, Comments::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_parent")
                            .from(Comments::Table, Comments::ParentCommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_id")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostLikes::Table)
                    .if_not_exists()
                    .col(uuid(PostLikes::UserId).not_null())
                    .col(big_integer(PostLikes::PostId).not_null())
                    .col(timestamp_with_time_zone(PostLikes::CreatedAt).not_null())
                    .primary_key(
                        Index::create()
                            .col(PostLikes::UserId)
                            .col(PostLikes::PostId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_user")
                            .from(PostLikes::Table, PostLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_post")
                            .from(PostLikes::Table, PostLikes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentLikes::Table)
                    .if_not_exists()
                    .col(uuid(CommentLikes::UserId).not_null())
                    .col(big_integer(CommentLikes::CommentId).not_null())
                    .col(timestamp_with_time_zone(CommentLikes::CreatedAt).not_null())
                    .primary_key(
                        Index::create()
                            .col(CommentLikes::UserId)
                            .col(CommentLikes::CommentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_likes_user")
                            .from(CommentLikes::Table, CommentLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_likes_comment")
                            .from(CommentLikes::Table, CommentLikes::CommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    UserName,
    Email,
    FirstName,
    LastName,
    BirthDate,
    PhotoUrl,
    RegisterDate,
    Status,
    Roles,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Content,
    PhotoUrl,
    RegisterDate,
    UserId,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Content,
    UserId,
    PostId,
    ParentCommentId,
    CreatedDate,
}

#[derive(DeriveIden)]
enum PostLikes {
    Table,
    UserId,
    PostId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CommentLikes {
    Table,
    UserId,
    CommentId,
    CreatedAt,
}
