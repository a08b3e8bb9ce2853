//! HTTP error responses for the docpdf server.
//!
//! Every failure reaches the client as `{"error": "<message>"}`. Internal
//! detail is logged, not returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docpdf_core::Error;
use serde_json::json;

/// Structured errors for the docpdf server.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty request input.
    #[error("{0}")]
    Validation(String),

    /// The source document could not be downloaded.
    #[error("Failed to download file: {0}")]
    Download(String),

    /// The backend could not produce a PDF.
    #[error("PDF conversion failed: {0}")]
    Conversion(String),

    /// Local I/O or setup failure.
    #[error("PDF conversion failed: internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Download(_) => StatusCode::BAD_REQUEST,
            ApiError::Conversion(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::Validation(msg),
            e if e.is_download() => ApiError::Download(e.detail()),
            Error::ConversionFailed(msg) => ApiError::Conversion(msg),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(msg) => tracing::warn!("rejected request: {msg}"),
            ApiError::Internal(detail) => tracing::error!(detail = %detail, "request failed"),
            other => tracing::error!("request failed: {other}"),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
