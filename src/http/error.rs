use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{error::LibraryError, runtime::handle::RuntimeError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl LibraryError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Everything a handler can fail with, rendered as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The library refused the operation or is not running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// The request body is not the expected JSON.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
    /// A path segment does not parse.
    #[error("{}", .0.body_text())]
    Path(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Runtime(RuntimeError::Library(err)) => err.status_code(),
            Self::Runtime(RuntimeError::ChannelClosed) => {
                tracing::error!(error.message = %self, "library runtime unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Body(_) | Self::Path(_) => {
                tracing::debug!(error.message = %self, "malformed request");
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
