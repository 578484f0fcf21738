//! Configuration management for the FeedLens engine
//!
//! Provides strongly-typed configuration with validation, environment variable parsing,
//! and sensible defaults.
//!
//! # Example
//! ```no_run
//! use feedlens::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Feed size: {}", config.feed.target_size);
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Placeholder values shipped in sample `.env` files; treated as "no key".
const API_KEY_SENTINELS: &[&str] = &["INSERT YOUR API KEY HERE", "YOUR_NEWS_API_KEY_HERE"];

/// Accepted `NEWS_LOOKBACK_DAYS` values
const LOOKBACK_DAYS_RANGE: std::ops::RangeInclusive<i64> = 0..=365;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// News-search provider configuration
    pub news: NewsConfig,
    /// Link-aggregator provider configuration
    pub aggregator: AggregatorConfig,
    /// Feed composition configuration
    pub feed: FeedConfig,
}

/// News-search provider configuration
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// API key; `None` means every news call reports `NotConfigured`
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://newsapi.org/v2`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Article language filter
    pub language: String,
    /// How far back interest searches look
    pub lookback_days: i64,
}

/// Link-aggregator provider configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Base URL, e.g. `https://www.reddit.com`
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause after each request to respect the provider's informal rate limit
    pub request_delay: Duration,
}

/// Feed composition configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Number of items in the final feed
    pub target_size: usize,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Directory to export results into after a run
    pub export_dir: Option<PathBuf>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".to_string(),
            timeout: Duration::from_secs(5),
            language: "en".to_string(),
            lookback_days: 7,
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            user_agent: "RecommendationSystem/1.0".to_string(),
            timeout: Duration::from_secs(5),
            request_delay: Duration::from_millis(1000),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            target_size: 15,
            seed: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env if present; a malformed file is an error
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::config("Failed to load .env file", e));
            }
        }

        let config = Self {
            news: NewsConfig::from_env()?,
            aggregator: AggregatorConfig::from_env()?,
            feed: FeedConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("NEWS_API_BASE", &self.news.base_url),
            ("REDDIT_API_BASE", &self.aggregator.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("Expected an http(s) URL, got '{}'", url).into(),
                });
            }
        }

        if !LOOKBACK_DAYS_RANGE.contains(&self.news.lookback_days) {
            return Err(Error::InvalidConfig {
                key: "NEWS_LOOKBACK_DAYS",
                message: format!(
                    "lookback must be within {}..={} days, got {}",
                    LOOKBACK_DAYS_RANGE.start(),
                    LOOKBACK_DAYS_RANGE.end(),
                    self.news.lookback_days
                )
                .into(),
            });
        }

        if self.feed.target_size == 0 {
            return Err(Error::InvalidConfig {
                key: "FEED_TARGET_SIZE",
                message: "target size must be at least 1".into(),
            });
        }

        if self.aggregator.user_agent.trim().is_empty() {
            return Err(Error::InvalidConfig {
                key: "REDDIT_USER_AGENT",
                message: "user agent cannot be empty".into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary (without sensitive data)
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  News:");
        info!("    Base URL: {}", self.news.base_url);
        info!(
            "    API key: {}",
            self.news
                .api_key
                .as_deref()
                .map(mask_key)
                .unwrap_or_else(|| "<none, placeholders only>".to_string())
        );
        info!("    Timeout: {:?}", self.news.timeout);
        info!("  Aggregator:");
        info!("    Base URL: {}", self.aggregator.base_url);
        info!("    Request delay: {:?}", self.aggregator.request_delay);
        info!("  Feed:");
        info!("    Target size: {}", self.feed.target_size);
        match self.feed.seed {
            Some(seed) => info!("    Seed: {}", seed),
            None => info!("    Seed: <entropy>"),
        }
        if let Some(dir) = &self.feed.export_dir {
            info!("    Export dir: {}", dir.display());
        }
    }
}

impl NewsConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let api_key = std::env::var("NEWS_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !API_KEY_SENTINELS.contains(&k.as_str()));

        Ok(Self {
            api_key,
            base_url: get_env_or("NEWS_API_BASE", &defaults.base_url),
            timeout: Duration::from_secs(get_env_parsed_or("NEWS_API_TIMEOUT_SECS", 5)?),
            language: get_env_or("NEWS_API_LANGUAGE", &defaults.language),
            lookback_days: get_env_parsed_or("NEWS_LOOKBACK_DAYS", defaults.lookback_days)?,
        })
    }
}

impl AggregatorConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: get_env_or("REDDIT_API_BASE", &defaults.base_url),
            user_agent: get_env_or("REDDIT_USER_AGENT", &defaults.user_agent),
            timeout: Duration::from_secs(get_env_parsed_or("REDDIT_TIMEOUT_SECS", 5)?),
            request_delay: Duration::from_millis(get_env_parsed_or(
                "REDDIT_REQUEST_DELAY_MS",
                1000,
            )?),
        })
    }
}

impl FeedConfig {
    fn from_env() -> Result<Self> {
        let seed = match std::env::var("FEED_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_value("FEED_SEED", raw.trim())?),
            _ => None,
        };

        Ok(Self {
            target_size: get_env_parsed_or("FEED_TARGET_SIZE", 15)?,
            seed,
            export_dir: std::env::var("EXPORT_DIR")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse environment variable, falling back to `default` when unset.
/// A value that is set but unparsable is a configuration error.
fn get_env_parsed_or<T>(key: &'static str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => parse_value(key, value.trim()),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| Error::InvalidConfig {
        key,
        message: format!("Invalid value '{}': {}", value, e).into(),
    })
}

/// Mask all but the last four characters of a secret
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            news: NewsConfig::default(),
            aggregator: AggregatorConfig::default(),
            feed: FeedConfig::default(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_zero_target_size_rejected() {
        let mut cfg = config();
        cfg.feed.target_size = 0;
        match cfg.validate() {
            Err(Error::InvalidConfig { key, .. }) => assert_eq!(key, "FEED_TARGET_SIZE"),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_lookback_outside_range_rejected() {
        for days in [-1, 366, 1_000_000_000] {
            let mut cfg = config();
            cfg.news.lookback_days = days;
            match cfg.validate() {
                Err(Error::InvalidConfig { key, .. }) => assert_eq!(key, "NEWS_LOOKBACK_DAYS"),
                other => panic!("expected InvalidConfig for {}, got {:?}", days, other),
            }
        }

        let mut cfg = config();
        cfg.news.lookback_days = 365;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_non_http_base_rejected() {
        let mut cfg = config();
        cfg.news.base_url = "ftp://newsapi.org".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcdef123456"), "****3456");
        assert_eq!(mask_key("abc"), "****");
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u64>("FEED_SEED", "not-a-number").unwrap_err();
        assert!(err.to_string().contains("FEED_SEED"));
    }
}
