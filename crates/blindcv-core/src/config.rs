//! Configuration module
//!
//! `AppConfig` is built once at startup and handed to every component that
//! needs it: the workspace layout, the redaction client and the HTTP layer.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{PLACEHOLDER_API_KEY, PLACEHOLDER_SESSION_SECRET};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MISTRAL_API_BASE: &str = "https://api.mistral.ai/v1";
const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
const REDACTION_TIMEOUT_SECS: u64 = 120;
const MAX_UPLOAD_SIZE_MB: usize = 50;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Parent of the `curriculos/` and `temp_zips/` directories.
    pub base_dir: PathBuf,
    pub mistral_api_key: String,
    pub mistral_api_base: String,
    pub mistral_model: String,
    pub redaction_timeout_secs: u64,
    /// Signs the flash cookie.
    pub session_secret: String,
    pub max_upload_size_bytes: usize,
    /// Keep the saved original when a later step of its slot fails.
    pub retain_failed_originals: bool,
    pub open_browser: bool,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_dir: PathBuf::from("."),
            mistral_api_key: PLACEHOLDER_API_KEY.to_string(),
            mistral_api_base: DEFAULT_MISTRAL_API_BASE.to_string(),
            mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
            redaction_timeout_secs: REDACTION_TIMEOUT_SECS,
            session_secret: PLACEHOLDER_SESSION_SECRET.to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            retain_failed_originals: true,
            open_browser: true,
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => default.port,
        };

        let base_dir = match lookup("BLINDCV_BASE_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => env::current_dir().unwrap_or(default.base_dir),
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        Ok(Self {
            host: lookup("HOST").unwrap_or(default.host),
            port,
            base_dir,
            mistral_api_key: lookup("MISTRAL_API_KEY").unwrap_or(default.mistral_api_key),
            mistral_api_base: lookup("MISTRAL_API_BASE").unwrap_or(default.mistral_api_base),
            mistral_model: lookup("MISTRAL_MODEL").unwrap_or(default.mistral_model),
            redaction_timeout_secs: lookup("REDACTION_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(REDACTION_TIMEOUT_SECS),
            session_secret: lookup("SESSION_SECRET").unwrap_or(default.session_secret),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            retain_failed_originals: parse_bool(lookup("RETAIN_FAILED_ORIGINALS"), true),
            open_browser: parse_bool(lookup("OPEN_BROWSER"), true),
            environment: lookup("ENVIRONMENT")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or(default.environment),
        })
    }

    /// Configuration rooted at `base_dir` with every other value at its default.
    pub fn for_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.session_secret.is_empty() {
            return Err(anyhow::anyhow!("SESSION_SECRET must not be empty"));
        }

        if self.redaction_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "REDACTION_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.uses_placeholder_api_key() {
            tracing::warn!(
                "MISTRAL_API_KEY is not set; using the placeholder key, redaction calls will fail"
            );
        }

        if self.session_secret == PLACEHOLDER_SESSION_SECRET {
            if self.is_production() {
                return Err(anyhow::anyhow!(
                    "SESSION_SECRET must be set when running in production"
                ));
            }
            tracing::warn!("SESSION_SECRET is not set; using the development placeholder");
        }

        Ok(())
    }

    pub fn uses_placeholder_api_key(&self) -> bool {
        self.mistral_api_key == PLACEHOLDER_API_KEY
    }

    pub fn redaction_timeout(&self) -> Duration {
        Duration::from_secs(self.redaction_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    raw.and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.mistral_model, "mistral-large-latest");
        assert_eq!(config.redaction_timeout_secs, 120);
        assert_eq!(config.max_upload_size_bytes, 50 * 1024 * 1024);
        assert!(config.retain_failed_originals);
        assert!(config.uses_placeholder_api_key());
        assert_eq!(config.session_secret, PLACEHOLDER_SESSION_SECRET);
    }

    #[test]
    fn test_values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("BLINDCV_BASE_DIR", "/tmp/blindcv"),
            ("MISTRAL_API_KEY", "real-key"),
            ("REDACTION_TIMEOUT_SECS", "15"),
            ("MAX_UPLOAD_SIZE_MB", "2"),
            ("RETAIN_FAILED_ORIGINALS", "FALSE"),
            ("OPEN_BROWSER", "false"),
            ("APP_ENV", "prod"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.base_dir, PathBuf::from("/tmp/blindcv"));
        assert!(!config.uses_placeholder_api_key());
        assert_eq!(config.redaction_timeout(), Duration::from_secs(15));
        assert_eq!(config.max_upload_size_bytes, 2 * 1024 * 1024);
        assert!(!config.retain_failed_originals);
        assert!(!config.open_browser);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("REDACTION_TIMEOUT_SECS", "soon"),
            ("MAX_UPLOAD_SIZE_MB", "-1"),
        ]))
        .unwrap();
        assert_eq!(config.redaction_timeout_secs, 120);
        assert_eq!(config.max_upload_size_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.session_secret.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.redaction_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_session_secret() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.session_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_urls() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.public_url(), "http://127.0.0.1:5000");
    }
}
