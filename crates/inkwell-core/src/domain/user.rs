use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity-provider assigned user id.
pub type UserId = Uuid;

/// Role name that grants moderation rights over every resource.
pub const ADMIN_ROLE: &str = "Admin";

/// User name of the account seeded at startup. It can never be deactivated
/// or deleted, so the system always keeps one administrator.
pub const BOOTSTRAP_USER_NAME: &str = "admin";

/// User entity - an author of posts, comments and likes.
///
/// Users are never physically removed by the regular flows: deactivation
/// flips `status` and hides their comments from listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub register_date: DateTime<Utc>,
    pub status: bool,
    pub roles: Vec<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    /// Create a new active user with a generated id.
    pub fn new(
        user_name: String,
        email: String,
        password_hash: String,
        register_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name,
            email,
            first_name: String::new(),
            last_name: String::new(),
            birth_date: None,
            photo_url: None,
            register_date,
            status: true,
            roles: Vec::new(),
            password_hash,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_bootstrap_admin(&self) -> bool {
        self.user_name == BOOTSTRAP_USER_NAME
    }
}
