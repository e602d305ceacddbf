//! Error taxonomy and the mapping from service failures to HTTP responses.
//!
//! Only handshake-time failures ever reach a client; post-handshake faults
//! (malformed frames, illegal moves) are logged and swallowed so a misbehaving
//! peer can never disturb the room's other participant.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in session registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No room is registered under the given code.
    #[error("room `{0}` not found")]
    RoomNotFound(String),
    /// Both player slots of the room are already taken.
    #[error("room `{0}` is full")]
    RoomFull(String),
    /// A required handshake query parameter was absent or unusable.
    #[error("missing or invalid query parameter `{0}`")]
    MissingParam(&'static str),
    /// Code generation kept colliding with existing rooms.
    #[error("room code space exhausted")]
    CodeSpaceExhausted,
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RoomNotFound(_) => AppError::NotFound(err.to_string()),
            ServiceError::RoomFull(_) => AppError::BadRequest(err.to_string()),
            ServiceError::MissingParam(_) => AppError::BadRequest(err.to_string()),
            ServiceError::CodeSpaceExhausted => AppError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
