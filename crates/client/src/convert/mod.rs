//! Document-to-PDF conversion through an external backend.
//!
//! The [`Converter`] trait is the seam between the request handler and the
//! backend. [`GotenbergClient`] is the production implementation.

pub mod gotenberg;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub use gotenberg::{GotenbergClient, GotenbergConfig};

/// Errors that can occur while converting a document.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file could not be read.
    #[error("cannot read input {path}: {source}")]
    Input { path: String, source: std::io::Error },

    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(Arc<reqwest::Error>),

    /// The backend did not answer in time.
    #[error("backend timeout")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String, trace: Option<String> },

    /// The backend answered 200 with an empty body.
    #[error("backend returned an empty document")]
    EmptyResponse,

    /// The PDF could not be written to the output path.
    #[error("cannot write output {path}: {source}")]
    Output { path: String, source: std::io::Error },
}

impl From<reqwest::Error> for ConvertError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ConvertError::Timeout } else { ConvertError::Unreachable(Arc::new(err)) }
    }
}

impl From<ConvertError> for docpdf_core::Error {
    fn from(err: ConvertError) -> Self {
        docpdf_core::Error::ConversionFailed(err.to_string())
    }
}

/// Converter trait for document-to-PDF backends.
#[async_trait::async_trait]
pub trait Converter: Send + Sync {
    /// Convert the document at `input` and write the PDF to `output`.
    ///
    /// Nothing is written to `output` unless the conversion succeeds.
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;

    /// Check that the backend is reachable and healthy.
    async fn health(&self) -> Result<(), ConvertError>;
}

/// Write `bytes` to `output` through a sibling temp file and a rename, so
/// readers never observe a partially written PDF.
///
/// The write runs on the blocking pool.
pub(crate) async fn write_atomic<B>(output: &Path, bytes: B) -> Result<(), ConvertError>
where
    B: AsRef<[u8]> + Send + 'static,
{
    let target = output.to_path_buf();
    let path = output.display().to_string();

    tokio::task::spawn_blocking(move || write_atomic_blocking(&target, bytes.as_ref()))
        .await
        .map_err(|e| ConvertError::Output { path, source: std::io::Error::other(e) })?
}

fn write_atomic_blocking(output: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let to_output_err = |source: std::io::Error| ConvertError::Output { path: output.display().to_string(), source };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new().prefix(".partial-").tempfile_in(dir).map_err(to_output_err)?;
    tmp.write_all(bytes).and_then(|()| tmp.flush()).map_err(to_output_err)?;
    tmp.persist(output).map_err(|e| to_output_err(e.error))?;

    Ok(())
}
