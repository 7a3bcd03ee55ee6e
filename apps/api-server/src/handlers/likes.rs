//! Post and comment like handlers. Both kinds share one code path and only
//! differ in the target they build.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{CommentId, LikeKind, LikeTarget, PostId, UserId};
use inkwell_core::services::LikeOutcome;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CommentLikeRequest, PostLikeRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/post-likes
pub async fn list_post_likes(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    list_all(&state, LikeKind::Post).await
}

/// POST /api/post-likes
pub async fn like_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostLikeRequest>,
) -> AppResult<HttpResponse> {
    like(&state, &identity, LikeTarget::Post(body.post_id)).await
}

/// GET /api/post-likes/{post_id} - the caller's like on a post.
pub async fn get_post_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    get_own(&state, &identity, LikeTarget::Post(path.into_inner())).await
}

/// DELETE /api/post-likes/{post_id}
pub async fn unlike_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    unlike(&state, &identity, LikeTarget::Post(path.into_inner())).await
}

/// GET /api/post-likes/user/{user_id} - public.
pub async fn list_user_post_likes(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    by_user(&state, &identity, path.into_inner(), LikeKind::Post).await
}

/// GET /api/comment-likes
pub async fn list_comment_likes(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    list_all(&state, LikeKind::Comment).await
}

/// POST /api/comment-likes
pub async fn like_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CommentLikeRequest>,
) -> AppResult<HttpResponse> {
    like(&state, &identity, LikeTarget::Comment(body.comment_id)).await
}

/// GET /api/comment-likes/{comment_id}
pub async fn get_comment_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    get_own(&state, &identity, LikeTarget::Comment(path.into_inner())).await
}

/// DELETE /api/comment-likes/{comment_id}
pub async fn unlike_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    unlike(&state, &identity, LikeTarget::Comment(path.into_inner())).await
}

/// GET /api/comment-likes/user/{user_id} - owner or Admin only.
pub async fn list_user_comment_likes(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    by_user(&state, &identity, path.into_inner(), LikeKind::Comment).await
}

async fn like(state: &AppState, identity: &Identity, target: LikeTarget) -> AppResult<HttpResponse> {
    match state.engagement.like(&identity.actor(), target).await? {
        LikeOutcome::Created(like) => Ok(HttpResponse::Created().json(ApiResponse::ok(like))),
        LikeOutcome::AlreadyExists => Err(AppError::Conflict(format!(
            "{} already liked",
            target
        ))),
    }
}

async fn unlike(
    state: &AppState,
    identity: &Identity,
    target: LikeTarget,
) -> AppResult<HttpResponse> {
    state.engagement.unlike(&identity.actor(), target).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn get_own(
    state: &AppState,
    identity: &Identity,
    target: LikeTarget,
) -> AppResult<HttpResponse> {
    let like = state.engagement.get_like(identity.user_id, target).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(like)))
}

async fn list_all(state: &AppState, kind: LikeKind) -> AppResult<HttpResponse> {
    let likes = state.engagement.list_all_likes(kind).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(likes)))
}

async fn by_user(
    state: &AppState,
    identity: &OptionalIdentity,
    user_id: UserId,
    kind: LikeKind,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let likes = state
        .engagement
        .list_likes_by_user(actor.as_ref(), user_id, kind)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(likes)))
}
