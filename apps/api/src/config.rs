use std::time::Duration;

use anyhow::{Context, Result};

/// Scoring server configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the answer store falls back to process memory.
    pub database_url: Option<String>,
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Timing and locale knobs for a spoken interview session.
///
/// The two delays are heuristics: `settle_delay` gives speech output a head
/// start before listening begins, `advance_delay` lets the last transcript
/// render before the next question is asked.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub settle_delay: Duration,
    pub advance_delay: Duration,
    pub language: String,
    /// Only consulted by recognizers without their own silence detection.
    pub silence_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(3000),
            advance_delay: Duration::from_millis(1000),
            language: "en-US".to_string(),
            silence_timeout: Duration::from_millis(10_000),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(SessionConfig {
            settle_delay: millis_env("SESSION_SETTLE_DELAY_MS", defaults.settle_delay)?,
            advance_delay: millis_env("SESSION_ADVANCE_DELAY_MS", defaults.advance_delay)?,
            language: std::env::var("SESSION_LANGUAGE").unwrap_or(defaults.language),
            silence_timeout: millis_env("SESSION_SILENCE_TIMEOUT_MS", defaults.silence_timeout)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn millis_env(key: &str, default: Duration) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("{key} must be a whole number of milliseconds")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults_match_heuristics() {
        let config = SessionConfig::default();
        assert_eq!(config.settle_delay, Duration::from_secs(3));
        assert_eq!(config.advance_delay, Duration::from_secs(1));
        assert_eq!(config.language, "en-US");
    }

    #[test]
    fn test_millis_env_falls_back_when_unset() {
        let value = millis_env("INTERVIEW_API_TEST_UNSET_DELAY", Duration::from_millis(42)).unwrap();
        assert_eq!(value, Duration::from_millis(42));
    }

    #[test]
    fn test_millis_env_rejects_garbage() {
        std::env::set_var("INTERVIEW_API_TEST_BAD_DELAY", "soon");
        let result = millis_env("INTERVIEW_API_TEST_BAD_DELAY", Duration::from_millis(1));
        assert!(result.is_err());
        std::env::remove_var("INTERVIEW_API_TEST_BAD_DELAY");
    }
}
