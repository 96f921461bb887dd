//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COHORT_API_BASE_URL` - Base URL of the Cohort Homes REST API
//!
//! ## Optional
//! - `COHORT_API_KEY` - Public API key sent as `X-Api-Key`
//! - `COHORT_STORE_PATH` - Path of the file-backed store (default: `.cohort/store.json`)
//! - `COHORT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `COHORT_CACHE_TTL_SECS` - Property detail cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STORE_PATH: &str = ".cohort/store.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// REST API settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative joins keep any path prefix.
    pub base_url: Url,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    /// Location of the file-backed key-value store.
    pub store_path: PathBuf,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        Ok(Self {
            api: ApiConfig::from_lookup(&env)?,
            store_path: store_path_from(&env),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(env: &Lookup<F>) -> Result<Self, ConfigError> {
        let raw = env.required("COHORT_API_BASE_URL")?;
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("COHORT_API_BASE_URL".to_string(), e))?;

        Ok(Self {
            base_url,
            api_key: env.optional("COHORT_API_KEY").map(SecretString::from),
            timeout: Duration::from_secs(
                env.seconds("COHORT_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            ),
            cache_ttl: Duration::from_secs(
                env.seconds("COHORT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            ),
        })
    }
}

/// Store location alone, for commands that never touch the API.
#[must_use]
pub fn store_path_from_env() -> PathBuf {
    let _ = dotenvy::dotenv();
    store_path_from(&Lookup(|name: &str| std::env::var(name).ok()))
}

fn store_path_from<F: Fn(&str) -> Option<String>>(env: &Lookup<F>) -> PathBuf {
    env.optional("COHORT_STORE_PATH")
        .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from)
}

fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {}", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err("URL must have a host".to_string());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Unset and blank values are both treated as absent.
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    fn seconds(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(raw) = self.optional(name) else {
            return Ok(default);
        };
        match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar(
                name.to_string(),
                "must be greater than zero".to_string(),
            )),
            Ok(secs) => Ok(secs),
            Err(e) => Err(ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("COHORT_API_BASE_URL", "https://api.cohorthomes.in")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.cohorthomes.in/");
        assert_eq!(config.api.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.api.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert!(config.api.api_key.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = load(&[("COHORT_API_BASE_URL", "https://cohorthomes.in/api/v1")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://cohorthomes.in/api/v1/");
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "COHORT_API_BASE_URL"));
    }

    #[test]
    fn test_blank_is_missing() {
        assert!(matches!(
            load(&[("COHORT_API_BASE_URL", "  ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            load(&[("COHORT_API_BASE_URL", "ftp://files.example")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[("COHORT_API_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_timeouts() {
        let config = load(&[
            ("COHORT_API_BASE_URL", "http://localhost:8080"),
            ("COHORT_HTTP_TIMEOUT_SECS", "3"),
            ("COHORT_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.api.cache_ttl, Duration::from_secs(60));

        assert!(matches!(
            load(&[
                ("COHORT_API_BASE_URL", "http://localhost:8080"),
                ("COHORT_HTTP_TIMEOUT_SECS", "0"),
            ]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[
                ("COHORT_API_BASE_URL", "http://localhost:8080"),
                ("COHORT_CACHE_TTL_SECS", "soon"),
            ]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = load(&[
            ("COHORT_API_BASE_URL", "http://localhost:8080"),
            ("COHORT_API_KEY", "pk_live_123"),
            ("COHORT_STORE_PATH", "/tmp/cohort.json"),
        ])
        .unwrap();
        assert_eq!(
            config.api.api_key.as_ref().unwrap().expose_secret(),
            "pk_live_123"
        );
        assert!(!format!("{config:?}").contains("pk_live_123"));
        assert_eq!(config.store_path, PathBuf::from("/tmp/cohort.json"));
    }
}
