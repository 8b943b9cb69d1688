use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use sponsorgrid_core::ApiResponse;

/// Handler error, always rendered as a `success: false` envelope.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// A dataset could not be loaded; the envelope still carries `data: []`.
    Unavailable(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) | Self::Unavailable(msg) => f.write_str(msg),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) | AppError::Unavailable(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body: ApiResponse<Value> = match &self {
            AppError::Unavailable(msg) => ApiResponse::failure_with_data(msg.clone(), Value::Array(Vec::new())),
            other => ApiResponse::failure(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Startup failure of the server process.
#[derive(Debug)]
pub enum ServerError {
    Catalog(serde_json::Error),
    Client(sponsorgrid_register_client::FetchError),
    Bind { addr: String, source: std::io::Error },
    Serve(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "built-in catalog is invalid: {e}"),
            Self::Client(e) => write!(f, "cannot build register client: {e}"),
            Self::Bind { addr, source } => write!(f, "cannot bind {addr}: {source}"),
            Self::Serve(e) => write!(f, "server error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {}
