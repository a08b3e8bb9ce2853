//! Gotenberg API client.
//!
//! ### Specification
//!
//! - **Route**: `POST {base}/forms/libreoffice/convert` (multipart, field `files`)
//! - **Success**: `200` with the PDF as body
//! - **Failure**: non-2xx with a plain-text reason; `Gotenberg-Trace` header
//!   carries the request id for correlating with backend logs
//! - **Health**: `GET {base}/health`
//!
//! No retries; one request per conversion.

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{ConvertError, Converter, write_atomic};
use docpdf_core::AppConfig;

/// LibreOffice conversion route.
const LIBREOFFICE_ROUTE: &str = "/forms/libreoffice/convert";

/// Health check route.
const HEALTH_ROUTE: &str = "/health";

/// Header Gotenberg uses to echo its request id.
const TRACE_HEADER: &str = "Gotenberg-Trace";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "docpdf/0.1";

/// Gotenberg client configuration.
#[derive(Debug, Clone)]
pub struct GotenbergConfig {
    /// Base URL (default: http://localhost:3000).
    pub base_url: String,
    /// Request timeout (default: none).
    pub timeout: Option<Duration>,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for GotenbergConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:3000".to_string(), timeout: None, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl From<&AppConfig> for GotenbergConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.gotenberg_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Body of the `/health` response.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Gotenberg API client.
#[derive(Debug, Clone)]
pub struct GotenbergClient {
    http: reqwest::Client,
    config: GotenbergConfig,
}

impl GotenbergClient {
    /// Create a new Gotenberg client with the given configuration.
    pub fn new(config: GotenbergConfig) -> Result<Self, ConvertError> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), route)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &GotenbergConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Converter for GotenbergClient {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        let start = Instant::now();

        let document = tokio::fs::read(input)
            .await
            .map_err(|source| ConvertError::Input { path: input.display().to_string(), source })?;

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        tracing::debug!("converting {} ({} bytes) with Gotenberg", file_name, document.len());

        let form = Form::new().part("files", Part::bytes(document).file_name(file_name));

        let response = self.http.post(self.endpoint(LIBREOFFICE_ROUTE)).multipart(form).send().await?;

        let status = response.status();
        let trace = response
            .headers()
            .get(TRACE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default().trim().to_string();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                message
            };
            tracing::debug!(status = status.as_u16(), trace = ?trace, "Gotenberg rejected conversion");
            return Err(ConvertError::Backend { status: status.as_u16(), message, trace });
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(ConvertError::EmptyResponse);
        }

        let len = pdf.len();
        write_atomic(output, pdf).await?;

        tracing::debug!(
            "converted to {} in {}ms ({} bytes, trace {:?})",
            output.display(),
            start.elapsed().as_millis(),
            len,
            trace
        );

        Ok(())
    }

    async fn health(&self) -> Result<(), ConvertError> {
        let response = self.http.get(self.endpoint(HEALTH_ROUTE)).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ConvertError::Backend {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
                trace: None,
            });
        }

        let health: HealthResponse = response.json().await?;
        if health.status != "up" {
            return Err(ConvertError::Backend {
                status: status.as_u16(),
                message: format!("status {}", health.status),
                trace: None,
            });
        }

        Ok(())
    }
}
