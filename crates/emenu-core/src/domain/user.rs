//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// First name when set, otherwise the login handle.
    pub fn greeting_name(&self) -> &str {
        let first = self.first_name.trim();
        if first.is_empty() {
            &self.username
        } else {
            first
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,

    #[validate(length(max = 150, message = "First name too long"))]
    pub first_name: String,

    #[validate(length(max = 150, message = "Last name too long"))]
    pub last_name: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        username: String,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            username: username.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
        };
        user.validate()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first_name: &str) -> User {
        User {
            id: 1,
            username: "Eve".to_string(),
            first_name: first_name.to_string(),
            last_name: String::new(),
            email: "eve@example.com".to_string(),
            password_hash: String::new(),
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_greeting_falls_back_to_username() {
        assert_eq!(user("").greeting_name(), "Eve");
        assert_eq!(user("  ").greeting_name(), "Eve");
        assert_eq!(user("Evelyn").greeting_name(), "Evelyn");
    }

    #[test]
    fn test_new_user_requires_valid_email() {
        let result = NewUser::new(
            "eve".to_string(),
            String::new(),
            String::new(),
            "not-an-email".to_string(),
            "hash".to_string(),
        );
        assert!(result.unwrap_err().field_errors().contains_key("email"));
    }
}
