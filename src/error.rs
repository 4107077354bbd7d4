//! Unified error type for every handler.
//!
//! Handlers return `Result<T, AppError>`; the response is always a JSON body of the
//! form `{"error": "..."}`. Server-side failures are logged and answered with a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::email::mailer::MailError;
use crate::users::repo::UserStoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Credential mismatch or missing/expired session.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violated.
    #[error("{0}")]
    Conflict(String),

    #[error("mail transport failed: {0}")]
    Mail(#[source] MailError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Mail(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UserStoreError> for AppError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::Duplicate => {
                Self::Conflict("An account with this email or phone already exists".into())
            }
            UserStoreError::Other(e) => Self::Internal(e),
        }
    }
}

impl From<MailError> for AppError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::InvalidAddress(addr) => {
                Self::Validation(format!("Invalid email address: {addr}"))
            }
            other => Self::Mail(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
            match self {
                Self::Mail(_) => "Failed to send email".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
