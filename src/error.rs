//! Error taxonomy shared by the auth and entry services.
//!
//! Client-side failures carry their message to the caller. Server-side
//! failures are logged here and answered with a generic body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scoring::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already in use")]
    DuplicateEmail,

    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session token was presented.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Upload too large")]
    PayloadTooLarge,

    /// Authenticated, but acting on another user's data.
    #[error("Forbidden")]
    Forbidden,

    #[error("scoring service unavailable: {0}")]
    ScoringUnavailable(#[from] ScoringError),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::Unauthorized
            | AppError::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ScoringUnavailable(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Server error".to_string()
        } else {
            self.to_string()
        }
    }

    fn log(&self) {
        match self {
            AppError::ScoringUnavailable(e) => {
                tracing::error!(error = %e, "scoring collaborator failed");
            }
            AppError::Storage(e) => {
                tracing::error!(error = %format!("{e:#}"), "storage failure");
            }
            AppError::Internal(msg) => {
                tracing::error!(message = %msg, "internal error");
            }
            _ => {
                tracing::debug!(error = %self, "request rejected");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}
