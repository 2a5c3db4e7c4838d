//! Helper types and traits for cleaner route handlers.
//!
//! Provides an error response type carrying a JSON `detail` body and an
//! extension trait for collapsing internal errors into it, reducing
//! boilerplate in routes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Message returned for every failure inside the merge pipeline.
pub const PROCESSING_FAILURE: &str = "An error occurred while processing PDFs.";

/// Message returned when a request carries no `files` parts.
pub const NO_FILES: &str = "No files uploaded.";

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

/// An error response: status code plus a client-facing detail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: &'static str,
}

impl ApiError {
    pub const fn processing_failure() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: PROCESSING_FAILURE,
        }
    }

    pub const fn no_files() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: NO_FILES,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
///
/// The underlying error is logged server-side; the client only ever sees the
/// generic processing failure.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Logs the error and converts it to 500 Internal Server Error.
    fn or_processing_failure(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_processing_failure(self) -> RouteResult<T> {
        self.map_err(|e| {
            error!("Error: {}", e);
            ApiError::processing_failure()
        })
    }
}
