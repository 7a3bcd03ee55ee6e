//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use inkwell_core::domain::User;
use inkwell_core::ports::TokenService;
use inkwell_core::services::RegisterUserInput;
use inkwell_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::users::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .register(RegisterUserInput {
            user_name: req.user_name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            first_name: req.first_name,
            last_name: req.last_name,
            birth_date: req.birth_date,
            photo_url: req.photo_url,
        })
        .await?;

    Ok(HttpResponse::Created().json(issue_token(token_service.get_ref().as_ref(), &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.authenticate(&req.user_name, &req.password).await?;

    Ok(HttpResponse::Ok().json(issue_token(token_service.get_ref().as_ref(), &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .get_user(&identity.actor(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}

fn issue_token(token_service: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(user.id, &user.user_name, user.roles.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    })
}
