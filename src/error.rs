//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::{PasswordError, TokenError};
use crate::domain::ValidationErrors;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Generic body for every 5xx response
const SERVER_ERROR_MSG: &str = "Server Error";

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Not Authorized")]
    NotAuthorized,

    #[error("Expense not found")]
    ExpenseNotFound,

    // Server errors (5xx)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Single-message response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingToken | AppError::InvalidToken | AppError::NotAuthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ExpenseNotFound => StatusCode::NOT_FOUND,
            AppError::Store(_)
            | AppError::Token(_)
            | AppError::Password(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::Validation(errors) => (status, Json(errors)).into_response(),

            // Causes stay in the server log
            AppError::Store(ref e) => {
                tracing::error!("Store error: {:?}", e);
                server_error()
            }
            AppError::Token(ref e) => {
                tracing::error!("Token error: {:?}", e);
                server_error()
            }
            AppError::Password(ref e) => {
                tracing::error!("Password error: {:?}", e);
                server_error()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                server_error()
            }

            other => (status, Json(MessageResponse::new(other.to_string()))).into_response(),
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new(SERVER_ERROR_MSG)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_body() {
        let response = AppError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["msg"], "No token, authorization denied");
    }

    #[tokio::test]
    async fn test_validation_body() {
        let err = AppError::from(ValidationErrors::single("name", "Name is required"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["msg"], "Name is required");
    }

    #[tokio::test]
    async fn test_server_error_hides_cause() {
        let err = AppError::Internal("connection reset by peer".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["msg"], "Server Error");
        assert!(!json.to_string().contains("connection reset"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotAuthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ExpenseNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidRequest("User already exists".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
