//! HTTP server handler implementation.
//!
//! This module defines the shared server state and the router that maps
//! routes to the implementations in [`crate::routes`].

use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, routing::get};
use docpdf_client::{Converter, FetchClient, FetchConfig, GotenbergClient, GotenbergConfig};
use docpdf_core::{AppConfig, CacheStore, Error};
use tower_http::trace::TraceLayer;

use crate::routes::{convert, health};

/// Shared state for the docpdf server.
///
/// Cheap to clone; every request handler receives its own copy.
#[derive(Clone)]
pub struct DocPdfServer {
    config: Arc<AppConfig>,
    cache: CacheStore,
    fetcher: Arc<FetchClient>,
    converter: Arc<dyn Converter>,
}

impl DocPdfServer {
    /// Assemble the server from already-built components.
    pub fn new(config: AppConfig, fetcher: FetchClient, converter: Arc<dyn Converter>) -> Self {
        let cache = CacheStore::from_config(&config);
        Self { config: Arc::new(config), cache, fetcher: Arc::new(fetcher), converter }
    }

    /// Build every component from configuration and prepare the cache directory.
    pub async fn from_config(config: AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(&config))?;
        let converter = GotenbergClient::new(GotenbergConfig::from(&config))?;
        let server = Self::new(config, fetcher, Arc::new(converter));
        server.cache.init().await?;
        Ok(server)
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn fetcher(&self) -> &FetchClient {
        &self.fetcher
    }

    pub fn converter(&self) -> &dyn Converter {
        self.converter.as_ref()
    }

    /// Directory for uncached conversion output.
    pub fn temp_dir(&self) -> PathBuf {
        self.config.temp_dir()
    }

    /// Build the axum router for this server.
    pub fn router(self) -> Router {
        Router::new()
            .route("/convert", get(convert::convert_get).post(convert::convert_post))
            .route("/health", get(health::health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }
}
