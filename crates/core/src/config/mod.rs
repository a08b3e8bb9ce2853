//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DOCPDF_*)
//! 2. TOML config file (if DOCPDF_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loaded once at startup and shared read-only with every component.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DOCPDF_*)
/// 2. TOML config file (if DOCPDF_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    ///
    /// Set via DOCPDF_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the Gotenberg conversion backend.
    ///
    /// Set via DOCPDF_GOTENBERG_URL environment variable.
    #[serde(default = "default_gotenberg_url")]
    pub gotenberg_url: String,

    /// Whether converted PDFs are cached on disk.
    ///
    /// Set via DOCPDF_CACHE_ENABLED environment variable.
    #[serde(default)]
    pub cache_enabled: bool,

    /// Minutes a cached PDF stays fresh.
    ///
    /// Set via DOCPDF_CACHE_TTL_MINUTES environment variable.
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Directory holding cached `<sha256>.pdf` files.
    ///
    /// Set via DOCPDF_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory for downloaded inputs and uncached outputs.
    /// Falls back to the OS temp directory.
    ///
    /// Set via DOCPDF_TEMP_DIR environment variable.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// User-Agent string for source downloads.
    ///
    /// Set via DOCPDF_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to download per source document.
    ///
    /// Set via DOCPDF_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum redirects followed when downloading.
    ///
    /// Set via DOCPDF_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Optional HTTP timeout in milliseconds for downloads and conversions.
    /// Unset means the HTTP client default (no timeout).
    ///
    /// Set via DOCPDF_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".into()
}

fn default_gotenberg_url() -> String {
    "http://localhost:3000".into()
}

fn default_cache_ttl_minutes() -> u64 {
    60
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("pdf_cache")
}

fn default_user_agent() -> String {
    "docpdf/0.1".into()
}

fn default_max_bytes() -> usize {
    100 * 1024 * 1024 // 100MB
}

fn default_max_redirects() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            gotenberg_url: default_gotenberg_url(),
            cache_enabled: false,
            cache_ttl_minutes: default_cache_ttl_minutes(),
            cache_dir: default_cache_dir(),
            temp_dir: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
            timeout_ms: None,
        }
    }
}

impl AppConfig {
    /// Cache time-to-live as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    /// Timeout as Duration for use with reqwest, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Directory for temporary files.
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DOCPDF_`
    /// 2. TOML file from `DOCPDF_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DOCPDF_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DOCPDF_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.gotenberg_url, "http://localhost:3000");
        assert!(!config.cache_enabled);
        assert_eq!(config.cache_ttl_minutes, 60);
        assert_eq!(config.cache_dir, PathBuf::from("pdf_cache"));
        assert!(config.temp_dir.is_none());
        assert_eq!(config.user_agent, "docpdf/0.1");
        assert_eq!(config.max_redirects, 10);
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn test_cache_ttl_duration() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));

        let config = AppConfig { cache_ttl_minutes: 5, ..Default::default() };
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));

        let config = AppConfig { cache_ttl_minutes: u64::MAX, ..Default::default() };
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_timeout_duration() {
        assert_eq!(AppConfig::default().timeout(), None);

        let config = AppConfig { timeout_ms: Some(2_500), ..Default::default() };
        assert_eq!(config.timeout(), Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn test_temp_dir_fallback() {
        assert_eq!(AppConfig::default().temp_dir(), std::env::temp_dir());

        let config = AppConfig { temp_dir: Some(PathBuf::from("/var/tmp/docpdf")), ..Default::default() };
        assert_eq!(config.temp_dir(), PathBuf::from("/var/tmp/docpdf"));
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCPDF_GOTENBERG_URL", "http://gotenberg:3000");
            jail.set_env("DOCPDF_CACHE_ENABLED", "true");
            jail.set_env("DOCPDF_CACHE_TTL_MINUTES", "15");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.gotenberg_url, "http://gotenberg:3000");
            assert!(config.cache_enabled);
            assert_eq!(config.cache_ttl_minutes, 15);
            assert_eq!(config.bind_addr, "0.0.0.0:5000");
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "docpdf.toml",
                r#"
                    cache_enabled = true
                    cache_dir = "/srv/pdf"
                    bind_addr = "127.0.0.1:8080"
                "#,
            )?;
            jail.set_env("DOCPDF_CONFIG_FILE", "docpdf.toml");
            jail.set_env("DOCPDF_BIND_ADDR", "127.0.0.1:9090");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert!(config.cache_enabled);
            assert_eq!(config.cache_dir, PathBuf::from("/srv/pdf"));
            assert_eq!(config.bind_addr, "127.0.0.1:9090");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCPDF_GOTENBERG_URL", "not a url");

            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "gotenberg_url"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_huge_ttl() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCPDF_CACHE_TTL_MINUTES", "18446744073709551615");

            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_minutes"));
            Ok(())
        });
    }
}
