//! Domain errors

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::{DishId, MenuId};
use crate::query::QueryError;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Dish not found: {0}")]
    DishNotFound(DishId),

    #[error("Menu not found: {0}")]
    MenuNotFound(MenuId),

    #[error("User not found")]
    UserNotFound,

    #[error("User not active")]
    UserNotActive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Dish with this name already exists: {0}")]
    DishNameAlreadyExists(String),

    #[error("Menu with this name already exists: {0}")]
    MenuNameAlreadyExists(String),

    #[error("User with this username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Unknown dishes: {0:?}")]
    UnknownDishes(Vec<DishId>),

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Field or query expression a client-side error refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::DishNameAlreadyExists(_)
            | DomainError::MenuNameAlreadyExists(_) => Some("name"),
            DomainError::UsernameAlreadyExists(_) => Some("username"),
            DomainError::UnknownDishes(_) => Some("dishes"),
            DomainError::PasswordTooShort | DomainError::PasswordTooLong => Some("password"),
            DomainError::ValidationError { field, .. } => Some(field),
            DomainError::InvalidQuery(e) => Some(e.expression()),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut entries: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        entries.sort();

        match entries.into_iter().next() {
            Some((field, message)) => DomainError::ValidationError { field, message },
            None => DomainError::ValidationError {
                field: "non_field_errors".to_string(),
                message: errors.to_string(),
            },
        }
    }
}
