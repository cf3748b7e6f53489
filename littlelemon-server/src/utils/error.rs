//! Unified error handling
//!
//! [`AppError`] is the error type of every HTTP handler. Bodies follow the
//! conventions REST clients of this API expect:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | `Validation` | 400 | `{"Field": ["message"]}` |
//! | `Invalid` | 400 | `{"detail": "..."}` |
//! | `Unauthorized` / `InvalidToken` | 401 | `{"detail": "..."}` |
//! | `Forbidden` | 403 | `{"detail": "..."}` |
//! | `NotFound` | 404 | `{"detail": "..."}` |
//! | `Database` / `Internal` | 500 | `{"detail": "A server error occurred."}` |
//!
//! # Usage
//!
//! ```ignore
//! Err(AppError::not_found("No Menu matches the given query."))
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use shared::FieldErrors;
use shared::client::Detail;
use tracing::error;

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
const SERVER_ERROR: &str = "A server error occurred.";

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (401) ==========
    #[error("Authentication required")]
    /// No credentials supplied
    Unauthorized,

    #[error("Invalid token: {0}")]
    /// Malformed, expired, unknown or revoked token
    InvalidToken(String),

    // ========== Authorization (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Request errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    /// Per-field validation failure (400)
    Validation(FieldErrors),

    #[error("Invalid request: {0}")]
    /// Unparseable request (400)
    Invalid(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::Unauthorized => return challenge(NOT_AUTHENTICATED.to_string()),
            AppError::InvalidToken(msg) => return challenge(msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
        };

        (status, Json(Detail::new(detail))).into_response()
    }
}

/// 401 carrying the `WWW-Authenticate: Token` challenge
fn challenge(detail: String) -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, Json(Detail::new(detail))).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
    response
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// 403 with the standard message
    pub fn permission_denied() -> Self {
        Self::Forbidden(PERMISSION_DENIED.to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Single non-field validation message (e.g. failed login)
    pub fn non_field(msg: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(
            shared::serializer::NON_FIELD_ERRORS,
            msg,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_renders_field_map() {
        let response = AppError::from(FieldErrors::single("Title", "This field is required."))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"Title": ["This field is required."]})
        );
    }

    #[tokio::test]
    async fn test_unauthorized_sets_challenge() {
        let response = AppError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Token");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": NOT_AUTHENTICATED})
        );
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = AppError::database("disk I/O error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": SERVER_ERROR})
        );
    }
}
