//! Post handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{LikeTarget, PhotoUpdate, PostId, UserId};
use inkwell_core::services::{NewPostInput, PostUpdate};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::deletion_summary;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.content.list_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .content
        .create_post(
            &identity.actor(),
            NewPostInput {
                title: req.title,
                content: req.content,
                photo_url: req.photo_url,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.content.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .content
        .update_post(
            path.into_inner(),
            &identity.actor(),
            PostUpdate {
                title: req.title,
                content: req.content,
                photo: PhotoUpdate::from_request(req.photo_url, req.remove_photo),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let plan = state
        .content
        .delete_post(path.into_inner(), &identity.actor())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        deletion_summary(&plan),
        "Post deleted",
    )))
}

/// GET /api/posts/user/{user_id}
pub async fn list_posts_by_user(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let posts = state.content.list_posts_by_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{id}/likes
pub async fn list_post_likes(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let likes = state
        .engagement
        .list_likes_for_target(LikeTarget::Post(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(likes)))
}
