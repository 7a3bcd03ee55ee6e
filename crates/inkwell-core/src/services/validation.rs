//! Field limits and input checks. All of them run before any store write.

use crate::error::{DomainError, DomainResult};

pub const MAX_TITLE_LEN: usize = 50;
pub const MAX_POST_CONTENT_LEN: usize = 300;
pub const MAX_COMMENT_LEN: usize = 500;
pub const MAX_NAME_LEN: usize = 50;
pub const MAX_USER_NAME_LEN: usize = 256;
pub const MAX_EMAIL_LEN: usize = 256;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Non-blank text of at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    max_length(field, value, max)
}

pub fn max_length(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn email(value: &str) -> DomainResult<()> {
    max_length("Email", value, MAX_EMAIL_LEN)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(DomainError::validation("Invalid email address")),
    }
}

pub fn password(value: &str, confirmation: &str) -> DomainResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if value != confirmation {
        return Err(DomainError::validation(
            "Password and confirmation do not match",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(required_text("Title", "Hello", MAX_TITLE_LEN).is_ok());
        assert!(required_text("Title", "   ", MAX_TITLE_LEN).is_err());
        assert!(required_text("Title", &"x".repeat(51), MAX_TITLE_LEN).is_err());
        // counted in characters, not bytes
        assert!(required_text("Title", &"ü".repeat(50), MAX_TITLE_LEN).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(email("alice@example.com").is_ok());
        assert!(email("alice").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("a@b@c").is_err());
    }

    #[test]
    fn test_password_confirmation_must_match() {
        assert!(password("correct horse", "correct horse").is_ok());
        assert!(matches!(
            password("correct horse", "correct house"),
            Err(DomainError::Validation(_))
        ));
        assert!(password("short", "short").is_err());
    }
}
