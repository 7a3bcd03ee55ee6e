//! Account handlers: profiles and moderation.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{PhotoUpdate, User, UserId};
use inkwell_core::services::ProfileUpdate;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{UpdateUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        birth_date: user.birth_date,
        photo_url: user.photo_url,
        register_date: user.register_date,
        status: user.status,
        roles: user.roles,
    }
}

/// GET /api/users - Admin only.
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let users = state.users.list_users(&identity.actor()).await?;
    let users: Vec<UserResponse> = users.into_iter().map(user_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .get_user(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(user))))
}

/// PUT /api/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        birth_date: req.birth_date,
        photo: PhotoUpdate::from_request(req.photo_url, req.remove_photo),
    };

    let user = state
        .users
        .update_profile(&identity.actor(), path.into_inner(), update)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(user))))
}

/// DELETE /api/users/{id} - deactivates; rows are kept.
pub async fn deactivate_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .deactivate(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        user_response(user),
        "User deactivated",
    )))
}

/// POST /api/users/{id}/reactivate - Admin only.
pub async fn reactivate_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .reactivate(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        user_response(user),
        "User reactivated",
    )))
}

/// DELETE /api/users/{id}/purge - Admin only. Content stays, authorship is
/// cleared.
pub async fn purge_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    state
        .users
        .hard_delete(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
