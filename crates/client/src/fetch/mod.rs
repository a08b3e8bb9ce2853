//! Source document download pipeline.
//!
//! ### URL Handling
//! - Trim whitespace, require `http`/`https`
//! - Drop fragments, keep the query string
//!
//! ### Safety Gates
//! - Max redirects: 10 (configurable)
//! - Max body bytes: 100MB (configurable)
//!
//! ### Temporary Files
//! - The body is written to a fresh temp file named after the sanitized
//!   URL filename (extension preserved so the backend can detect the format).
//! - [`DownloadedFile`] owns that file; it is deleted when the value (or the
//!   [`TempPath`] taken from it) is dropped or closed.

pub mod url;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::{Client, header};
use tempfile::TempPath;

pub use url::{UrlError, parse_source_url, path_and_query};

use docpdf_core::{AppConfig, CleanName, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "docpdf/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 100MB)
    pub max_bytes: usize,

    /// Request timeout (default: none)
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,

    /// Directory for downloaded files (default: OS temp dir)
    pub temp_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "docpdf/0.1".to_string(),
            max_bytes: 100 * 1024 * 1024,
            timeout: None,
            max_redirects: 10,
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            temp_dir: config.temp_dir(),
        }
    }
}

/// A downloaded source document on local disk.
#[derive(Debug)]
pub struct DownloadedFile {
    path: TempPath,
    file_name: CleanName,
    content_type: Option<String>,
    len: usize,
}

impl DownloadedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitized filename derived from the source URL.
    pub fn file_name(&self) -> &CleanName {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Take ownership of the file's path; closing it deletes the file.
    pub fn into_temp_path(self) -> TempPath {
        self.path
    }
}

/// HTTP client that downloads source documents to temp files.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Download `url_str` into a new temp file.
    ///
    /// Any transport failure or non-success status is a `DownloadFailed`.
    pub async fn download(&self, url_str: &str) -> Result<DownloadedFile, Error> {
        let start = Instant::now();
        let url = parse_source_url(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Error::DownloadFailed(format!("network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::DownloadFailed(format!("status {} for url {}", status.as_u16(), url)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::DownloadFailed(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let file_name = CleanName::from_url_path(&path_and_query(&url));
        tracing::debug!("using filename {} from url {}", file_name, url);

        let len = bytes.len();
        let path = self.persist(&file_name, bytes).await?;

        tracing::debug!(
            "downloaded {} to {} in {}ms ({} bytes)",
            url,
            path.display(),
            start.elapsed().as_millis(),
            len
        );

        Ok(DownloadedFile { path, file_name, content_type, len })
    }

    /// Write the body to a new temp file on the blocking pool.
    async fn persist<B>(&self, file_name: &CleanName, bytes: B) -> Result<TempPath, Error>
    where
        B: AsRef<[u8]> + Send + 'static,
    {
        let prefix = file_name.stem.clone();
        let suffix = file_name.extension.clone();
        let dir = self.config.temp_dir.clone();

        tokio::task::spawn_blocking(move || -> Result<TempPath, Error> {
            let mut file = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&suffix)
                .tempfile_in(&dir)
                .map_err(|e| Error::Internal(format!("failed to create temp file: {}", e)))?;

            file.write_all(bytes.as_ref())
                .and_then(|()| file.flush())
                .map_err(|e| Error::Internal(format!("failed to write temp file: {}", e)))?;

            Ok(file.into_temp_path())
        })
        .await
        .map_err(|e| Error::Internal(format!("temp file task failed: {}", e)))?
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_in(dir: &Path) -> FetchClient {
        FetchClient::new(FetchConfig { temp_dir: dir.to_path_buf(), ..Default::default() }).unwrap()
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "docpdf/0.1");
        assert_eq!(config.max_bytes, 100 * 1024 * 1024);
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig {
            user_agent: "test-agent".into(),
            max_bytes: 1024,
            timeout_ms: Some(5_000),
            temp_dir: Some(PathBuf::from("/scratch")),
            ..Default::default()
        };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.temp_dir, PathBuf::from("/scratch"));
    }

    #[tokio::test]
    async fn test_download_writes_temp_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/q1-report(final).docx")
            .with_status(200)
            .with_header("content-type", "application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            .with_body("docx-bytes")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_in(dir.path());
        let url = format!("{}/files/q1-report(final).docx", server.url());

        let file = client.download(&url).await.unwrap();
        mock.assert_async().await;

        assert_eq!(std::fs::read(file.path()).unwrap(), b"docx-bytes");
        assert_eq!(file.len(), 10);
        assert_eq!(file.file_name().to_string(), "q1-reportfinal.docx");
        let on_disk = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(on_disk.starts_with("q1-reportfinal"));
        assert!(on_disk.ends_with(".docx"));
        assert!(file.content_type().unwrap().contains("wordprocessingml"));

        let path = file.path().to_path_buf();
        file.into_temp_path().close().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_download_dropped_file_is_removed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/a.odt").with_status(200).with_body("odt").create_async().await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_in(dir.path());
        let file = client.download(&format!("{}/a.odt", server.url())).await.unwrap();
        assert_eq!(entries(dir.path()), 1);

        drop(file);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/missing.docx").with_status(404).create_async().await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_in(dir.path());
        let result = client.download(&format!("{}/missing.docx", server.url())).await;

        assert!(matches!(result, Err(Error::DownloadFailed(msg)) if msg.contains("404")));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_too_large() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/big.pdf").with_status(200).with_body(vec![0u8; 64]).create_async().await;

        let dir = tempfile::tempdir().unwrap();
        let client =
            FetchClient::new(FetchConfig { temp_dir: dir.path().to_path_buf(), max_bytes: 16, ..Default::default() })
                .unwrap();
        let result = client.download(&format!("{}/big.pdf", server.url())).await;

        assert!(matches!(result, Err(Error::FetchTooLarge(_))));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_in(dir.path());
        let result = client.download("ftp://example.com/a.docx").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_download_unreachable_host() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_in(dir.path());
        let result = client.download("http://127.0.0.1:1/a.docx").await;
        assert!(matches!(result, Err(Error::DownloadFailed(_))));
    }
}
