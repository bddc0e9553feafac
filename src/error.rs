// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{message::ErrorResponse, services::completion::UpstreamError};

pub const INVALID_REQUEST_MESSAGE: &str = "Message is required";
pub const UPSTREAM_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("message is required")]
    InvalidRequest,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::InvalidRequest => INVALID_REQUEST_MESSAGE,
            AppError::Upstream(err) => {
                // detail stays in the server log
                error!(error = %err, "Error from completion API");
                UPSTREAM_ERROR_MESSAGE
            }
        };
        let body = ErrorResponse { error: message.to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}
