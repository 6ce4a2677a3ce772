/*
 * Responsibility
 * - Process / handler level errors (startup, config, unexpected failures)
 * - IntoResponse: rendered through ApiResponse like every other error body
 *
 * Token validation failures are NOT errors here: they come back as data
 * (ValidationResult) and the auth middleware renders them.
 */
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::ConfigError;
use crate::response::ApiResponse;
use crate::services::auth::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid access token key: {0}")]
    InvalidKey(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => ApiResponse::unauthorized()
                .error(ApiError::new("Unauthorized").with_status(401))
                .into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                ApiResponse::server_error().into_response()
            }
        }
    }
}
