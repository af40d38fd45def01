//! Unified error handling for the web layer.
//!
//! Route handlers return `Result<T, AppError>`. A failed list fetch renders
//! as a full-page error state; every other failure maps to a plain status
//! response. Nothing here is fatal to the process - each error is local to
//! one request.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::supabase::BackendError;

/// Application-level error type for the web front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Full-page error state, shown when the product list cannot be fetched.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Backend(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        match self {
            Self::Backend(err) => {
                let template = ErrorTemplate {
                    message: err.to_string(),
                };
                let body = template
                    .render()
                    .unwrap_or_else(|e| format!("Template error: {e}"));
                (StatusCode::BAD_GATEWAY, Html(body)).into_response()
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            // Don't expose internal error details to clients
            Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Backend(BackendError::Transport(
                "connection refused".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let response = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
