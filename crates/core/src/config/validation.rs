//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound for `cache_ttl_minutes`: one year.
pub(crate) const MAX_CACHE_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `gotenberg_url` is not an http(s) URL
    /// - `max_bytes` is 0 or exceeds 1GB
    /// - `timeout_ms` is set below 100ms or above 10 minutes
    /// - `user_agent` is empty
    /// - `cache_ttl_minutes` exceeds one year
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "bind_addr".into(),
                reason: format!("'{}' is not a socket address", self.bind_addr),
            });
        }

        match url::Url::parse(&self.gotenberg_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "gotenberg_url".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "gotenberg_url".into(), reason: e.to_string() });
            }
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 1024 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 1GB".into() });
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
            }
            if timeout_ms > 600_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 10 minutes (600000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_ttl_minutes > MAX_CACHE_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_minutes".into(),
                reason: format!("must not exceed {} (one year)", MAX_CACHE_TTL_MINUTES),
            });
        }

        if self.cache_enabled && self.cache_ttl_minutes == 0 {
            tracing::warn!("cache_ttl_minutes is 0; every cached PDF is regenerated on request");
        }

        Ok(())
    }
}
