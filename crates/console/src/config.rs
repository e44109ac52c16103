//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PARCEL_API_BASE_URL` - Base URL of the parcel service (default: `http://localhost:8083`)
//! - `PARCEL_API_TOKEN` - Bearer token obtained from `authenticate`
//! - `PARCEL_API_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default location of the parcel service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8083";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Console configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Base URL of the parcel service, without a trailing slash
    pub base_url: Url,
    /// Bearer token attached to every request (optional)
    pub token: Option<SecretString>,
    /// Per-request timeout; `None` waits for the transport's own error
    pub timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl ConsoleConfig {
    /// Configuration pointing at `base_url`, with everything else unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a valid
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            timeout: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(&get_env_or_default("PARCEL_API_BASE_URL", DEFAULT_BASE_URL))?;

        let token = get_optional_env("PARCEL_API_TOKEN").map(|token| {
            if let Err(e) = validate_secret_strength(&token, "PARCEL_API_TOKEN") {
                tracing::warn!("PARCEL_API_TOKEN validation warning: {e}");
            }
            SecretString::from(token)
        });

        let timeout = get_optional_env("PARCEL_API_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("PARCEL_API_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            base_url,
            token,
            timeout,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Returns the base URL as a string without a trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("PARCEL_API_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "PARCEL_API_BASE_URL".to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Token length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token returned by login."
            ),
        ));
    }

    Ok(())
}
