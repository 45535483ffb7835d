use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Message shown to clients when an upstream collaborator fails. The
/// underlying detail only goes to the logs.
pub const UPSTREAM_MESSAGE: &str = "Something went wrong, please try again later";

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid credentials at the middleware boundary.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The principal is authenticated but does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl AppError {
    /// Text that is safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Auth(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Only authentication failures leave the in-band envelope.
        let status = match &self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::OK,
        };

        match &self {
            AppError::Upstream(detail) => tracing::error!("Upstream failure: {}", detail),
            AppError::Auth(msg) => tracing::warn!("Rejected request: {}", msg),
            other => tracing::debug!("Request failed in-band: {}", other),
        }

        let body: Json<ApiResponse<()>> = Json(ApiResponse::failure(self.public_message()));

        (status, body).into_response()
    }
}
