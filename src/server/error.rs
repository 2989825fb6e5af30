//! Error taxonomy for the token issuance routes
//!
//! Every variant surfaces to the caller as `{"error": "<message>"}`.
//! Validation failures keep HTTP 500 for wire compatibility with existing
//! callers of the original endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("channel is required")]
    MissingChannel,

    #[error("uid is required")]
    MissingUid,

    #[error("role is incorrect")]
    InvalidRole,

    #[error("token type is invalid")]
    InvalidTokenType,

    #[error("expiry is invalid")]
    InvalidExpiry,

    /// The token builder faulted; never fatal to the process
    #[error("failed to build token: {0}")]
    TokenBuildFailure(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::TokenBuildFailure(detail) => {
                tracing::error!(error = %detail, "token build failed");
                "failed to build token".to_string()
            }
            other => other.to_string(),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: message }),
        )
            .into_response()
    }
}
