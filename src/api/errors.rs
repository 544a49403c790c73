use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::init_data::InitDataError;

/// Errors that reject an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bot token is configured, so nothing can be verified.
    #[error("Bot token is not configured")]
    Misconfigured,
    /// No `Authorization: tma ...` header.
    #[error("Authorization header is missing or is not a tma credential")]
    MissingInitData,
    /// The `initData` failed validation.
    #[error("Invalid init data: {0}")]
    InvalidInitData(#[from] InitDataError),
    /// The caller is not an admin.
    #[error("User is not an admin")]
    Forbidden,
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Fixed, client-facing message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Clients get one message per status; the specific cause only goes to the log.
        let (status, message) = match &self {
            ApiError::Misconfigured => {
                tracing::error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error")
            }
            ApiError::MissingInitData | ApiError::InvalidInitData(_) => {
                tracing::warn!("Rejected request: {self}");
                (StatusCode::UNAUTHORIZED, "Invalid initData")
            }
            ApiError::Forbidden => {
                tracing::warn!("Rejected request: {self}");
                (StatusCode::FORBIDDEN, "Forbidden")
            }
        };

        (status, Json(ErrorResponse { error: message.to_string() })).into_response()
    }
}
