//! /health route implementation.
//!
//! Always answers 200 while the process is alive; the backend field reports
//! whether the conversion backend answered its own health check.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::handler::DocPdfServer;

/// Output structure for /health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthOutput {
    pub status: String,
    /// "up" or "down".
    pub backend: String,
    pub cache_enabled: bool,
    pub version: String,
}

pub async fn health_check(State(server): State<DocPdfServer>) -> Json<HealthOutput> {
    let backend = match server.converter().health().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!("conversion backend health check failed: {e}");
            "down"
        }
    };

    Json(HealthOutput {
        status: "ok".into(),
        backend: backend.into(),
        cache_enabled: server.cache().is_enabled(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
