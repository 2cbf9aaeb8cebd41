//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `STOREFRONT_DATA_DIR` - Directory holding the session slot (default: `.home-of-suits`)
//! - `STOREFRONT_AUTH_LATENCY_MS` - Simulated login/register latency (default: 1000)
//! - `STOREFRONT_CHECKOUT_LATENCY_MS` - Simulated checkout latency (default: 1500)
//! - `GEMINI_API_KEY` - Styling advice API key; unset means the stylist is offline
//! - `GEMINI_MODEL` - Model id (default: `gemini-2.5-flash`)
//! - `GEMINI_BASE_URL` - API base URL (default: `https://generativelanguage.googleapis.com/v1beta/`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".home-of-suits";
const DEFAULT_AUTH_LATENCY_MS: u64 = 1_000;
const DEFAULT_CHECKOUT_LATENCY_MS: u64 = 1_500;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted session slot
    pub data_dir: PathBuf,
    /// Simulated latency of login and registration
    pub auth_latency: Duration,
    /// Simulated latency of order placement
    pub checkout_latency: Duration,
    /// Styling advice API configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Generative-language API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` puts the stylist in offline mode
    pub api_key: Option<SecretString>,
    /// Model id used for `generateContent`
    pub model: String,
    /// Base URL ending in the API version segment
    pub base_url: Url,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            auth_latency: Duration::from_millis(DEFAULT_AUTH_LATENCY_MS),
            checkout_latency: Duration::from_millis(DEFAULT_CHECKOUT_LATENCY_MS),
            gemini: GeminiConfig::default(),
            sentry_dsn: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("STOREFRONT_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let auth_latency = Duration::from_millis(parse_or_default(
            "STOREFRONT_AUTH_LATENCY_MS",
            get("STOREFRONT_AUTH_LATENCY_MS"),
            DEFAULT_AUTH_LATENCY_MS,
        )?);
        let checkout_latency = Duration::from_millis(parse_or_default(
            "STOREFRONT_CHECKOUT_LATENCY_MS",
            get("STOREFRONT_CHECKOUT_LATENCY_MS"),
            DEFAULT_CHECKOUT_LATENCY_MS,
        )?);

        let gemini = GeminiConfig {
            api_key: get("GEMINI_API_KEY").and_then(|key| checked_api_key("GEMINI_API_KEY", key)),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: match get("GEMINI_BASE_URL") {
                Some(raw) => parse_base_url("GEMINI_BASE_URL", &raw)?,
                None => default_gemini_base_url(),
            },
        };

        Ok(Self {
            data_dir,
            auth_latency,
            checkout_latency,
            gemini,
            sentry_dsn: get("SENTRY_DSN"),
        })
    }

    /// Zero-latency configuration, for tests and scripted runs.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            auth_latency: Duration::ZERO,
            checkout_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a base URL, ensuring a trailing slash so `Url::join` keeps the
/// version segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

fn default_gemini_base_url() -> Url {
    Url::parse(DEFAULT_GEMINI_BASE_URL).expect("default base URL is valid")
}

/// Accept an API key unless it looks like a template placeholder.
fn checked_api_key(var_name: &str, value: String) -> Option<SecretString> {
    let secret = SecretString::from(value);
    if let Some(pattern) = placeholder_pattern(secret.expose_secret()) {
        tracing::warn!(
            variable = var_name,
            pattern,
            "API key looks like a placeholder; styling advice will be offline"
        );
        return None;
    }
    Some(secret)
}

/// Returns the first placeholder pattern contained in `value`.
fn placeholder_pattern(value: &str) -> Option<&'static str> {
    let lower = value.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".home-of-suits"));
        assert_eq!(config.auth_latency, Duration::from_millis(1000));
        assert_eq!(config.checkout_latency, Duration::from_millis(1500));
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(
            config.gemini.base_url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/"
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_DATA_DIR", "/tmp/hos"),
            ("STOREFRONT_AUTH_LATENCY_MS", "0"),
            ("STOREFRONT_CHECKOUT_LATENCY_MS", " 250 "),
            ("GEMINI_API_KEY", "AIzaSyD3k9Qm2Lr7Tz"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:8080/v1beta"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/hos"));
        assert_eq!(config.auth_latency, Duration::ZERO);
        assert_eq!(config.checkout_latency, Duration::from_millis(250));
        assert_eq!(
            config.gemini.api_key.unwrap().expose_secret(),
            "AIzaSyD3k9Qm2Lr7Tz"
        );
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.base_url.as_str(), "http://127.0.0.1:8080/v1beta/");
    }

    #[test]
    fn test_invalid_latency_is_rejected() {
        let err = load(&[("STOREFRONT_AUTH_LATENCY_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_AUTH_LATENCY_MS"));

        let err = load(&[("STOREFRONT_CHECKOUT_LATENCY_MS", "-5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = load(&[("GEMINI_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "GEMINI_BASE_URL"));
    }

    #[test]
    fn test_placeholder_api_key_is_treated_as_absent() {
        let config = load(&[("GEMINI_API_KEY", "your-gemini-key-here")]).unwrap();
        assert!(config.gemini.api_key.is_none());

        let config = load(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_placeholder_pattern_detection() {
        assert_eq!(placeholder_pattern("CHANGEME"), Some("changeme"));
        assert_eq!(placeholder_pattern("AIzaSyD3k9Qm2Lr7Tz"), None);
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: Some(SecretString::from("super_secret_gemini_key")),
            ..GeminiConfig::default()
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("gemini-2.5-flash"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_gemini_key"));
    }

    #[test]
    fn test_instant_has_no_latency() {
        let config = StorefrontConfig::instant();
        assert_eq!(config.auth_latency, Duration::ZERO);
        assert_eq!(config.checkout_latency, Duration::ZERO);
    }
}
