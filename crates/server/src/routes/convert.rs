//! /convert route implementation.
//!
//! Downloads the document behind `url`, converts it to PDF through the
//! backend and returns the PDF, serving from the on-disk cache when enabled.
//!
//! Request lifecycle:
//! `received -> cache check -> (hit -> respond) | (miss -> download -> convert -> store -> respond)`,
//! with the downloaded input removed after conversion whatever the outcome.

use std::path::{Path, PathBuf};

use axum::{
    body::{Body, Bytes},
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use docpdf_client::DownloadedFile;
use docpdf_core::{CleanName, EntryStatus, Error};
use serde::{Deserialize, Serialize};
use tempfile::TempPath;
use tokio_util::io::ReaderStream;

use crate::error::ApiError;
use crate::handler::DocPdfServer;

/// Response header telling whether the PDF came from the cache.
const CACHE_HEADER: &str = "x-cache";

/// Input parameters for /convert, from the query string or a JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertParams {
    /// The URL of the document to convert.
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /convert?url=...`
///
/// A query string that does not deserialize is treated as a missing URL.
pub async fn convert_get(
    State(server): State<DocPdfServer>, query: Result<Query<ConvertParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("rejected query string: {}", rejection);
            ConvertParams::default()
        }
    };
    convert_impl(&server, params).await
}

/// `POST /convert` with `{"url": "..."}`.
///
/// A missing or malformed body is treated as a missing URL.
pub async fn convert_post(State(server): State<DocPdfServer>, body: Bytes) -> Result<Response, ApiError> {
    let params = serde_json::from_slice::<ConvertParams>(&body).unwrap_or_default();
    convert_impl(&server, params).await
}

/// Implementation shared by both /convert routes.
pub async fn convert_impl(server: &DocPdfServer, params: ConvertParams) -> Result<Response, ApiError> {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        return Err(Error::InvalidInput("URL is required".into()).into());
    };
    tracing::debug!("received conversion request for url: {}", url);

    let cache = server.cache();
    let cache_path = if cache.is_enabled() {
        let path = cache.path_for(&url);
        tracing::debug!("cache path for url: {}", path.display());

        match cache.status(&path).await {
            EntryStatus::Fresh => {
                tracing::info!("serving cached PDF for url: {}", url);
                return serve_pdf(&path, "HIT").await;
            }
            EntryStatus::Expired => {
                tracing::info!("cached PDF for url {} expired, regenerating", url);
                cache.evict(&path).await?;
            }
            EntryStatus::Absent => {}
        }
        Some(path)
    } else {
        None
    };

    tracing::debug!("downloading file from url: {}", url);
    let download = server.fetcher().download(&url).await?;
    tracing::info!("downloaded file to {}", download.path().display());

    match cache_path {
        Some(output) => {
            convert_download(server, download, &output).await?;
            tracing::info!("saved converted PDF to {}", output.display());
            serve_pdf(&output, "MISS").await
        }
        None => {
            // Dropping the TempPath removes the output if the request is abandoned.
            let output = TempPath::from_path(ephemeral_path(&server.temp_dir(), download.file_name()));
            convert_download(server, download, &output).await?;
            let response = serve_pdf(&output, "MISS").await;
            discard(output).await;
            response
        }
    }
}

/// Convert the downloaded input into `output`, then remove the input.
async fn convert_download(server: &DocPdfServer, download: DownloadedFile, output: &Path) -> Result<(), Error> {
    let converted = server.converter().convert(download.path(), output).await;
    discard(download.into_temp_path()).await;
    converted.map_err(Error::from)
}

/// Stream the PDF at `path` as the response body.
///
/// The file handle is opened before returning, so the file may be unlinked
/// while the body is still being sent.
async fn serve_pdf(path: &Path, cache_status: &'static str) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(path).await.map_err(Error::from)?;
    let len = file.metadata().await.map_err(Error::from)?.len();
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (header::CONTENT_TYPE.as_str(), "application/pdf".to_string()),
            (header::CONTENT_LENGTH.as_str(), len.to_string()),
            (CACHE_HEADER, cache_status.to_string()),
        ],
        body,
    )
        .into_response())
}

/// Timestamp-suffixed output path used when caching is disabled.
fn ephemeral_path(dir: &Path, name: &CleanName) -> PathBuf {
    let stem = if name.stem.is_empty() { "document" } else { name.stem.as_str() };
    dir.join(format!("{}-{}.pdf", stem, Utc::now().format("%Y%m%d%H%M%S%f")))
}

/// Remove a temporary file on the blocking pool. Failure is logged, never surfaced.
async fn discard(path: TempPath) {
    let shown = path.to_path_buf();
    match tokio::task::spawn_blocking(move || path.close()).await {
        Ok(Ok(())) => tracing::debug!("removed temporary file {}", shown.display()),
        Ok(Err(e)) => tracing::warn!("failed to remove temporary file {}: {}", shown.display(), e),
        Err(e) => tracing::warn!("removal task for {} failed: {}", shown.display(), e),
    }
}
