//! Comment handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{CommentId, PostId, UserId};
use inkwell_core::services::NewCommentInput;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CreateCommentRequest, UpdateCommentRequest};

use super::deletion_summary;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .content
        .create_comment(
            &identity.actor(),
            NewCommentInput {
                post_id: req.post_id,
                content: req.content,
                parent_comment_id: req.parent_comment_id,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// GET /api/comments - root comments of every post, with their replies.
pub async fn list_comments(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let comments = state.content.list_all_root_comments().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// GET /api/comments/post/{post_id}
pub async fn list_post_comments(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let comments = state.content.list_root_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let comment = state.content.get_comment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .content
        .update_comment(path.into_inner(), &identity.actor(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let plan = state
        .content
        .delete_comment(path.into_inner(), &identity.actor())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        deletion_summary(&plan),
        "Comment deleted",
    )))
}

/// GET /api/comments/user/{user_id}
pub async fn list_user_comments(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let comments = state
        .content
        .list_comments_by_user(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}
