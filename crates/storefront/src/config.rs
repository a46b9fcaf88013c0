//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SABLE_BACKEND_URL` - Base URL of the hosted platform API
//! - `SABLE_PROJECT_ID` - Project identifier on the hosted platform
//! - `SABLE_API_KEY` - Platform API key
//!
//! ## Optional
//! - `SENTRY_DSN` - Sentry error tracking DSN

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted platform connection settings
    pub backend: BackendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Hosted platform connection settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the platform API (e.g. `https://api.sableplatform.dev`)
    pub base_url: Url,
    /// Project identifier on the platform
    pub project_id: String,
    /// Platform API key (server-side only)
    pub api_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env("SABLE_BACKEND_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SABLE_BACKEND_URL".to_owned(), e.to_string()))?;

        let project_id = get_env("SABLE_PROJECT_ID")?;
        let api_key = get_secret("SABLE_API_KEY")?;

        let sentry_dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            backend: BackendConfig {
                base_url,
                project_id,
                api_key,
            },
            sentry_dsn,
        })
    }
}

/// Get a required environment variable.
fn get_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Get a required secret, rejecting obvious placeholder values.
fn get_secret(name: &str) -> Result<SecretString, ConfigError> {
    let value = get_env(name)?;
    validate_secret(name, value)
}

/// Reject secrets that look like placeholders left in from setup docs.
fn validate_secret(name: &str, value: String) -> Result<SecretString, ConfigError> {
    let lower = value.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("value contains placeholder pattern \"{pattern}\""),
            ));
        }
    }

    Ok(SecretString::from(value))
}
