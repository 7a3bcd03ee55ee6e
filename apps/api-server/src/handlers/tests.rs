use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use inkwell_core::ports::{AuthError, PasswordService, TokenService};
use inkwell_infra::{JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::middleware::error::json_error_handler;
use crate::state::AppState;

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

fn state() -> AppState {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig::default()));
    AppState::in_memory(tokens, Arc::new(PlainPasswords))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($state.tokens.clone()))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .configure(configure_routes),
        )
        .await
    };
}

/// Registers a user and yields its bearer header value.
macro_rules! register {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "user_name": $name,
                "email": format!("{}@example.com", $name),
                "password": "password1",
                "confirm_password": "password1",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        format!("Bearer {}", body["access_token"].as_str().unwrap())
    }};
}

macro_rules! create_post {
    ($app:expr, $auth:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", $auth.as_str()))
            .set_json(json!({ "title": "Hello", "content": "First post" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["data"]["id"].as_i64().unwrap()
    }};
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_second_like_is_conflict() {
    let state = state();
    let app = app!(state);
    let alice = register!(app, "alice");
    let post_id = create_post!(app, alice);

    let like = || {
        test::TestRequest::post()
            .uri("/api/post-likes")
            .insert_header(("Authorization", alice.as_str()))
            .set_json(json!({ "post_id": post_id }))
            .to_request()
    };

    let first = test::call_service(&app, like()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(&app, like()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["status"], 409);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/likes"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_only_owner_deletes_post() {
    let state = state();
    let app = app!(state);
    let alice = register!(app, "alice");
    let mallory = register!(app, "mallory");
    let post_id = create_post!(app, alice);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(("Authorization", mallory.as_str()))
        .set_json(json!({ "post_id": post_id, "content": "nice" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let delete = |auth: &str| {
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(("Authorization", auth.to_string()))
            .to_request()
    };

    let denied = test::call_service(&app, delete(&mallory)).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let body: Value = test::call_and_read_body_json(&app, delete(&alice)).await;
    assert_eq!(body["data"]["comments"], 1);

    let gone = test::call_service(&app, delete(&alice)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_writes_require_token() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "t", "content": "c" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_malformed_body_is_problem_document() {
    let state = state();
    let app = app!(state);
    let alice = register!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", alice.as_str()))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"title\":")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["instance"], "/api/posts");
}

#[actix_rt::test]
async fn test_comment_listing_nests_replies() {
    let state = state();
    let app = app!(state);
    let alice = register!(app, "alice");
    let post_id = create_post!(app, alice);

    let comment = |parent: Option<i64>| {
        test::TestRequest::post()
            .uri("/api/comments")
            .insert_header(("Authorization", alice.as_str()))
            .set_json(json!({
                "post_id": post_id,
                "content": "thread",
                "parent_comment_id": parent,
            }))
            .to_request()
    };

    let root: Value = test::call_and_read_body_json(&app, comment(None)).await;
    let root_id = root["data"]["id"].as_i64().unwrap();
    let reply: Value = test::call_and_read_body_json(&app, comment(Some(root_id))).await;
    let reply_id = reply["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/post/{post_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], root_id);
    assert_eq!(roots[0]["replies"][0]["id"], reply_id);
}

#[actix_rt::test]
async fn test_comment_index_covers_all_posts() {
    let state = state();
    let app = app!(state);
    let alice = register!(app, "alice");
    let first = create_post!(app, alice);
    let second = create_post!(app, alice);

    for post_id in [first, second] {
        let req = test::TestRequest::post()
            .uri("/api/comments")
            .insert_header(("Authorization", alice.as_str()))
            .set_json(json!({ "post_id": post_id, "content": "root" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get().uri("/api/comments").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["post_id"], first);
    assert_eq!(roots[1]["post_id"], second);
}

#[actix_rt::test]
async fn test_admin_cannot_edit_member_post() {
    let state = state();
    state.users.ensure_bootstrap_admin("adminpass").await.unwrap();
    let app = app!(state);
    let alice = register!(app, "alice");
    let post_id = create_post!(app, alice);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "user_name": "admin", "password": "adminpass" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let admin = format!("Bearer {}", login["access_token"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(("Authorization", admin.as_str()))
        .set_json(json!({ "title": "Hijacked", "content": "Not mine" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(("Authorization", admin.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_user_list_is_admin_only() {
    let state = state();
    state.users.ensure_bootstrap_admin("adminpass").await.unwrap();
    let app = app!(state);
    let alice = register!(app, "alice");

    let list = |auth: &str| {
        test::TestRequest::get()
            .uri("/api/users")
            .insert_header(("Authorization", auth.to_string()))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, list(&alice)).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "user_name": "admin", "password": "adminpass" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let admin = format!("Bearer {}", login["access_token"].as_str().unwrap());

    let body: Value = test::call_and_read_body_json(&app, list(&admin)).await;
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}
