//! Ingest configuration
//!
//! Loaded once in `main` from the environment (plus an optional
//! `pronom.env` file) and handed to the monitor, exporter, and store client.

use pronom_common::types::DEFAULT_CDN_BASE;
use pronom_common::{PronomError, Result};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Ingest Configuration Constants
// ============================================================================

/// Optional env file read before the process environment
pub const ENV_FILE: &str = "pronom.env";

pub const DEFAULT_RELEASE_NOTES_URL: &str =
    "https://www.nationalarchives.gov.uk/aboutapps/pronom/release-notes.xml";

/// Feed whose `Last-Modified` date names the current container file
pub const DEFAULT_CONTAINER_URL: &str =
    "https://www.nationalarchives.gov.uk/pronom/container-signature.xml";

pub const DEFAULT_REGISTRY_URL: &str = "https://www.nationalarchives.gov.uk/PRONOM/";

pub const DEFAULT_EXPORT_DIR: &str = "pronom-export";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Pause after each exported record is written
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Exporter backoff bounds in seconds
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 4;
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 10;

/// Highest x-fmt record number; the namespace is closed
pub const X_FMT_LIMIT: u32 = 455;

/// Ingest configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub release_notes_url: String,
    pub container_url: String,
    pub cdn_base: String,
    pub registry_url: String,

    /// Where exported record documents are written
    pub export_dir: PathBuf,

    /// Where downloaded signature files are written
    pub download_dir: PathBuf,

    pub http_timeout_secs: u64,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub backoff_min_secs: u64,
    pub backoff_max_secs: u64,

    /// Concurrent exporter requests and summarizer workers
    pub concurrency: usize,

    /// Stats server base address, e.g. `http://localhost:26000`
    pub server_addr: Option<String>,

    /// Shared secret for the stats server upload endpoint
    pub server_auth: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            release_notes_url: DEFAULT_RELEASE_NOTES_URL.to_string(),
            container_url: DEFAULT_CONTAINER_URL.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            download_dir: PathBuf::from("."),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_min_secs: DEFAULT_BACKOFF_MIN_SECS,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            concurrency: crate::summary::default_workers(),
            server_addr: None,
            server_auth: None,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl IngestConfig {
    /// Read `pronom.env` and `.env` if present, then the environment
    pub fn load() -> Result<Self> {
        dotenvy::from_filename(ENV_FILE).ok();
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Defaults overridden by `PRONOM_*`, `SERVER_ADDR` and `SERVER_AUTH`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            release_notes_url: env_string("PRONOM_RELEASE_NOTES_URL")
                .unwrap_or(defaults.release_notes_url),
            container_url: env_string("PRONOM_CONTAINER_URL").unwrap_or(defaults.container_url),
            cdn_base: env_string("PRONOM_CDN_BASE").unwrap_or(defaults.cdn_base),
            registry_url: env_string("PRONOM_REGISTRY_URL").unwrap_or(defaults.registry_url),
            export_dir: env_string("PRONOM_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            download_dir: env_string("PRONOM_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            http_timeout_secs: env_or("PRONOM_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            request_delay_ms: env_or("PRONOM_REQUEST_DELAY_MS", defaults.request_delay_ms),
            max_retries: env_or("PRONOM_MAX_RETRIES", defaults.max_retries),
            backoff_min_secs: env_or("PRONOM_BACKOFF_MIN_SECS", defaults.backoff_min_secs),
            backoff_max_secs: env_or("PRONOM_BACKOFF_MAX_SECS", defaults.backoff_max_secs),
            concurrency: env_or("PRONOM_CONCURRENCY", defaults.concurrency),
            server_addr: env_string("SERVER_ADDR"),
            server_auth: env_string("SERVER_AUTH"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("release notes URL", &self.release_notes_url),
            ("container URL", &self.container_url),
            ("CDN base", &self.cdn_base),
            ("registry URL", &self.registry_url),
        ] {
            if url.trim().is_empty() {
                return Err(PronomError::config(format!("{} cannot be empty", name)));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(PronomError::config("HTTP timeout must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(PronomError::config("max retries must be at least 1"));
        }

        if self.concurrency == 0 {
            return Err(PronomError::config("concurrency must be greater than 0"));
        }

        if self.backoff_min_secs > self.backoff_max_secs {
            return Err(PronomError::config(format!(
                "backoff minimum ({}s) cannot exceed maximum ({}s)",
                self.backoff_min_secs, self.backoff_max_secs
            )));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Stats server address and secret, both required for uploads
    pub fn store_target(&self) -> Result<(&str, &str)> {
        let addr = self
            .server_addr
            .as_deref()
            .ok_or_else(|| PronomError::config("SERVER_ADDR is not set"))?;
        let auth = self
            .server_auth
            .as_deref()
            .ok_or_else(|| PronomError::config("SERVER_AUTH is not set"))?;
        Ok((addr.trim_end_matches('/'), auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PRONOM_RELEASE_NOTES_URL",
        "PRONOM_EXPORT_DIR",
        "PRONOM_MAX_RETRIES",
        "PRONOM_CONCURRENCY",
        "SERVER_ADDR",
        "SERVER_AUTH",
    ];

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = IngestConfig::from_env().unwrap();
        assert_eq!(config.release_notes_url, DEFAULT_RELEASE_NOTES_URL);
        assert_eq!(config.export_dir, PathBuf::from("pronom-export"));
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.store_target().is_err());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear();
        std::env::set_var("PRONOM_EXPORT_DIR", "/tmp/records");
        std::env::set_var("PRONOM_MAX_RETRIES", "2");
        std::env::set_var("SERVER_ADDR", "http://localhost:26000/");
        std::env::set_var("SERVER_AUTH", "secret");

        let config = IngestConfig::from_env().unwrap();
        assert_eq!(config.export_dir, PathBuf::from("/tmp/records"));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.store_target().unwrap(), ("http://localhost:26000", "secret"));
        clear();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear();
        std::env::set_var("PRONOM_CONCURRENCY", "0");
        assert!(matches!(IngestConfig::from_env(), Err(PronomError::Config(_))));
        clear();
    }

    #[test]
    fn test_backoff_bounds_validated() {
        let config = IngestConfig {
            backoff_min_secs: 20,
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
