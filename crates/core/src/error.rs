//! Unified error types for docpdf.
//!
//! Each variant belongs to one of the failure classes the HTTP layer
//! reports: validation (400), download (400) and conversion/internal (500).

/// Unified error types for the docpdf service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., missing URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The source URL could not be parsed or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network failure or non-success status while fetching the source document.
    #[error("DOWNLOAD_FAILED: {0}")]
    DownloadFailed(String),

    /// Source document exceeds the configured size limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// The conversion backend rejected the document or could not be reached.
    #[error("CONVERSION_FAILED: {0}")]
    ConversionFailed(String),

    /// Filesystem operation on the cache directory failed.
    #[error("CACHE_ERROR: {0}")]
    Cache(#[from] std::io::Error),

    /// Anything else that prevents a response from being produced.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error stems from retrieving the source document.
    pub fn is_download(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::DownloadFailed(_) | Error::FetchTooLarge(_))
    }

    /// The human-readable cause, without the error code prefix.
    pub fn detail(&self) -> String {
        match self {
            Error::InvalidInput(msg)
            | Error::InvalidUrl(msg)
            | Error::DownloadFailed(msg)
            | Error::FetchTooLarge(msg)
            | Error::ConversionFailed(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Cache(e) => e.to_string(),
        }
    }
}
