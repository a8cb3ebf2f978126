use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_PROVIDER_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_PROVIDER_MODEL: &str = "llama-3.3-70b-versatile";

/// Application configuration loaded from environment variables.
///
/// Only numeric values that fail to parse are startup errors. A missing
/// provider key is tolerated so the operator sees the service come up and
/// every scoring call report the configuration problem.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider_api_key: Option<String>,
    pub provider_api_url: String,
    pub provider_model: String,
    pub provider_timeout: Duration,
    pub provider_max_concurrency: usize,
    pub min_text_chars: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider_api_key = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty());

        Ok(Config {
            provider_api_key,
            provider_api_url: lookup("PROVIDER_API_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_API_URL.to_string()),
            provider_model: lookup("PROVIDER_MODEL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_MODEL.to_string()),
            provider_timeout: Duration::from_secs(parse_or(
                &lookup,
                "PROVIDER_TIMEOUT_SECS",
                60u64,
            )?),
            provider_max_concurrency: parse_or(&lookup, "PROVIDER_MAX_CONCURRENCY", 8usize)?
                .max(1),
            min_text_chars: parse_or(&lookup, "MIN_TEXT_CHARS", 50usize)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 20 * 1024 * 1024usize)?,
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn provider_configured(&self) -> bool {
        self.provider_api_key.is_some()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert!(config.provider_api_key.is_none());
        assert!(!config.provider_configured());
        assert_eq!(config.provider_api_url, DEFAULT_PROVIDER_API_URL);
        assert_eq!(config.provider_model, DEFAULT_PROVIDER_MODEL);
        assert_eq!(config.provider_timeout, Duration::from_secs(60));
        assert_eq!(config.provider_max_concurrency, 8);
        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("GROQ_API_KEY", "   ")]).unwrap();
        assert!(!config.provider_configured());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PROVIDER_MODEL", "llama-3.1-8b-instant"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
            ("MIN_TEXT_CHARS", "120"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.provider_api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.provider_model, "llama-3.1-8b-instant");
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(config.min_text_chars, 120);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_concurrency_is_raised_to_one() {
        let config = config_from(&[("PROVIDER_MAX_CONCURRENCY", "0")]).unwrap();
        assert_eq!(config.provider_max_concurrency, 1);
    }
}
