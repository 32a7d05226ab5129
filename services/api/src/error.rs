//! Error types for the parking service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Domain errors raised by the allocation and session lifecycle engine.
#[derive(Error, Debug)]
pub enum ParkingError {
    /// The presented scan token does not resolve to a user
    #[error("Invalid scan token")]
    InvalidToken,

    /// No user record for the given email
    #[error("User not found")]
    UserNotFound,

    /// Explicitly requested spot does not exist
    #[error("Spot not found")]
    SpotNotFound,

    /// Explicitly requested spot is not available
    #[error("Spot is not available")]
    SpotUnavailable,

    /// The lot is full; terminal for the current scan
    #[error("No available spots")]
    NoAvailableSpot,

    /// Stored preference value is outside the lot's naming scheme
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// An open session already exists for the user
    #[error("User already has an open parking session")]
    UserAlreadyParked,

    /// The session's end timestamp was already set
    #[error("Parking session already closed")]
    SessionAlreadyClosed,

    /// Store-level failure
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found with message
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting state transition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<ParkingError> for ApiError {
    fn from(err: ParkingError) -> Self {
        match err {
            ParkingError::InvalidToken
            | ParkingError::UserNotFound
            | ParkingError::SpotNotFound => ApiError::NotFound(err.to_string()),
            ParkingError::SpotUnavailable
            | ParkingError::NoAvailableSpot
            | ParkingError::InvalidPreference(_) => ApiError::BadRequest(err.to_string()),
            ParkingError::UserAlreadyParked | ParkingError::SessionAlreadyClosed => {
                ApiError::Conflict(err.to_string())
            }
            ParkingError::Store(e) => {
                tracing::error!("Store error: {:#}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
