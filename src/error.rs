use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Sign in to continue")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0:#}")]
    Upstream(#[from] anyhow::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Template(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message safe to show a visitor
    pub fn public_message(&self) -> String {
        match self {
            AppError::Upstream(_) | AppError::Template(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.kind(),
            message: self.public_message(),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}
