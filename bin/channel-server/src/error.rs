//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`]. Authorization failures answer with a
//! plain-text 400; everything else answers with a JSON
//! `{"success": false, "error": ...}` body.
//!
//! Internal errors are logged with full detail but only a generic message is
//! returned to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use channel_core::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const INVALID_AUTHORIZATION: &str = "Invalid authorization";
pub const MESSAGE_NOT_FOUND: &str = "Message ID not found";

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing or wrong `Authorization` header.
    #[error("invalid authorization")]
    Unauthorized,

    /// The caller referenced a message that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match self {
            ServerError::Unauthorized => {
                return (StatusCode::BAD_REQUEST, INVALID_AUTHORIZATION).into_response();
            }
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (
            status,
            Json(json!({ "success": false, "error": client_message })),
        )
            .into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ServerError::NotFound(MESSAGE_NOT_FOUND.to_owned()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}
