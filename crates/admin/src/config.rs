//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (`https://` enables secure cookies)
//! - `ADMIN_USERNAME` - Operator username
//! - `ADMIN_PASSWORD` - Operator password
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `THREADLINE_API_BASE_URL` - Backend REST base URL (default: `http://localhost:8080/api`)
//! - `THREADLINE_API_TIMEOUT_SECS` - Backend request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use threadline_api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use crate::services::gate::CredentialGate;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
///
/// Implements `Debug` manually to redact the operator password.
#[derive(Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Backend REST API location
    pub api: ApiConfig,
    /// Operator username
    pub username: String,
    /// Operator password
    pub password: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("api", &self.api)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl AdminConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_var(&lookup, "ADMIN_HOST", "127.0.0.1")?;
        let port = parse_var(&lookup, "ADMIN_PORT", "3001")?;
        let base_url = get_required(&lookup, "ADMIN_BASE_URL")?;
        let api = api_config(&lookup)?;
        let (username, password) = admin_credentials(&lookup)?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            api,
            username,
            password,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// The login check for the configured operator.
    #[must_use]
    pub fn gate(&self) -> CredentialGate {
        CredentialGate::new(self.username.clone(), self.password.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read the backend location and timeout.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for an unusable URL or timeout.
pub fn api_config<F>(lookup: &F) -> Result<ApiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get_or_default(lookup, "THREADLINE_API_BASE_URL", DEFAULT_BASE_URL);
    let timeout: u64 = parse_var(
        lookup,
        "THREADLINE_API_TIMEOUT_SECS",
        &DEFAULT_TIMEOUT_SECS.to_string(),
    )?;

    ApiConfig::from_base_url(&raw)
        .map(|config| config.with_timeout(Duration::from_secs(timeout)))
        .map_err(|e| ConfigError::InvalidEnvVar("THREADLINE_API_BASE_URL".to_string(), e.to_string()))
}

/// Read `ADMIN_USERNAME` and `ADMIN_PASSWORD`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if either is unset.
pub fn admin_credentials<F>(lookup: &F) -> Result<(String, SecretString), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let username = get_required(lookup, "ADMIN_USERNAME")?;
    let password = SecretString::from(get_required(lookup, "ADMIN_PASSWORD")?);
    Ok((username, password))
}

/// Get a required environment variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(lookup, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
