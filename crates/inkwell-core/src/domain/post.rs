use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Store-assigned post id.
pub type PostId = i64;

/// Post entity - a blog post owning a comment forest and a set of likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub photo_url: Option<String>,
    pub register_date: DateTime<Utc>,
    /// `None` once the author account has been purged.
    pub user_id: Option<UserId>,
}

/// A post that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub photo_url: Option<String>,
    pub register_date: DateTime<Utc>,
}

/// What an update does to an existing photo reference.
///
/// Omitting a photo keeps the current one; clearing it must be explicit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoUpdate {
    #[default]
    Keep,
    Replace(String),
    Clear,
}

impl PhotoUpdate {
    /// Build from the wire shape: an optional new url plus a removal flag.
    pub fn from_request(photo_url: Option<String>, remove_photo: bool) -> Self {
        match (photo_url, remove_photo) {
            (Some(url), _) => Self::Replace(url),
            (None, true) => Self::Clear,
            (None, false) => Self::Keep,
        }
    }

    pub fn apply(self, current: Option<String>) -> Option<String> {
        match self {
            Self::Keep => current,
            Self::Replace(url) => Some(url),
            Self::Clear => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_update_keeps_existing_by_default() {
        let current = Some("/uploads/a.png".to_string());
        assert_eq!(PhotoUpdate::default().apply(current.clone()), current);
    }

    #[test]
    fn test_photo_update_from_request() {
        assert_eq!(
            PhotoUpdate::from_request(Some("/b.png".into()), false),
            PhotoUpdate::Replace("/b.png".into())
        );
        assert_eq!(PhotoUpdate::from_request(None, true), PhotoUpdate::Clear);
        assert_eq!(PhotoUpdate::from_request(None, false), PhotoUpdate::Keep);
        assert_eq!(PhotoUpdate::Clear.apply(Some("/a.png".into())), None);
    }
}
