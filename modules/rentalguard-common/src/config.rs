use std::env;
use std::time::Duration;

use crate::error::RentalGuardError;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub openai_api_key: Option<String>,
    pub model: String,
    pub openai_base_url: String,

    // Page fetch
    pub fetch_timeout: Duration,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    ///
    /// A missing `OPENAI_API_KEY` is not fatal: verification requests then
    /// report a misconfigured AI service instead of the server refusing to boot.
    pub fn from_env() -> Result<Self, RentalGuardError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RentalGuardError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let web_port = match non_empty("WEB_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| RentalGuardError::Config(format!("WEB_PORT must be a number, got {raw:?}")))?,
            None => 3000,
        };

        let fetch_timeout_secs = match non_empty("FETCH_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                RentalGuardError::Config(format!("FETCH_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            model: non_empty("RENTALGUARD_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            web_host: non_empty("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let prefix: String = v.chars().take(5).collect();
                    format!("{prefix}...({} chars)", v.chars().count())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  RENTALGUARD_MODEL: {}", self.model);
        tracing::info!("  OPENAI_BASE_URL: {}", self.openai_base_url);
        tracing::info!("  FETCH_TIMEOUT_SECS: {}", self.fetch_timeout.as_secs());
        if self.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; /verify will answer 502 until it is");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, RentalGuardError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.web_host, "0.0.0.0");
        assert_eq!(config.web_port, 3000);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test-123"),
            ("RENTALGUARD_MODEL", "gpt-4o"),
            ("WEB_PORT", "8080"),
            ("FETCH_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test-123"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.web_port, 8080);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = load(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_bad_port_is_error() {
        let err = load(&[("WEB_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, RentalGuardError::Config(_)));
    }

    #[test]
    fn test_bad_timeout_is_error() {
        let err = load(&[("FETCH_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, RentalGuardError::Config(_)));
    }
}
