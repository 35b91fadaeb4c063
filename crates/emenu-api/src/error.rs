use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use emenu_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: String,
        field: Option<String>,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::BadRequest {
            code: "VALIDATION_ERROR",
            message: message.into(),
            field: field.map(str::to_string),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let field = e.field().map(str::to_string);
        match e {
            DomainError::DishNotFound(_) | DomainError::MenuNotFound(_) | DomainError::UserNotFound => {
                ApiError::NotFound(e.to_string())
            }
            DomainError::InvalidCredentials | DomainError::UserNotActive | DomainError::InvalidToken(_) => {
                ApiError::Unauthorized(e.to_string())
            }
            DomainError::InvalidQuery(_) => ApiError::BadRequest {
                code: "INVALID_QUERY",
                message: e.to_string(),
                field,
            },
            DomainError::DishNameAlreadyExists(_)
            | DomainError::MenuNameAlreadyExists(_)
            | DomainError::UsernameAlreadyExists(_)
            | DomainError::UnknownDishes(_)
            | DomainError::PasswordTooShort
            | DomainError::PasswordTooLong => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: e.to_string(),
                field,
            },
            DomainError::ValidationError { message, .. } => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message,
                field,
            },
            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                let body = Json(ApiResponse::<()>::error("UNAUTHORIZED", &msg, None));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                )
                    .into_response();
            }
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None)
            }
            ApiError::BadRequest { code, message, field } => {
                tracing::debug!("Bad request ({}): {}", code, message);
                (StatusCode::BAD_REQUEST, code, message, field)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Data store unavailable".to_string(),
                    None,
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(code, &message, field.as_deref()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emenu_core::QueryError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::MenuNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::UnknownDishes(vec![4]), StatusCode::BAD_REQUEST),
            (
                DomainError::InvalidQuery(QueryError::UnknownOrderingField("price".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::DatabaseError("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_query_error_names_expression() {
        let err = ApiError::from(DomainError::InvalidQuery(QueryError::UnknownOrderingField(
            "price".to_string(),
        )));
        match err {
            ApiError::BadRequest { code, field, .. } => {
                assert_eq!(code, "INVALID_QUERY");
                assert_eq!(field.as_deref(), Some("ordering"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
