//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A user's profile as returned to clients. Never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub register_date: DateTime<Utc>,
    pub status: bool,
    pub roles: Vec<String>,
}

/// Profile update. Omitted fields are left unchanged; the photo is only
/// cleared when `remove_photo` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub remove_photo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Post update. Without `photo_url` the existing photo is kept unless
/// `remove_photo` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub remove_photo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: i64,
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLikeRequest {
    pub post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLikeRequest {
    pub comment_id: i64,
}

/// Rows removed by a cascading delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionSummary {
    pub comments: usize,
    pub likes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_post_defaults_keep_photo() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"title":"t","content":"c"}"#).unwrap();

        assert!(req.photo_url.is_none());
        assert!(!req.remove_photo);
    }

    #[test]
    fn test_register_request_optional_profile() {
        let req: RegisterUserRequest = serde_json::from_str(
            r#"{"user_name":"bob","email":"bob@example.com","password":"p","confirm_password":"p"}"#,
        )
        .unwrap();

        assert_eq!(req.first_name, "");
        assert!(req.birth_date.is_none());
    }
}
