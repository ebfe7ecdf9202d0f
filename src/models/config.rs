//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Teacher page retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Cell parsing settings
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Serialize configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        url::Url::parse(&self.client.base_url)
            .map_err(|e| AppError::validation(format!("client.base_url is invalid: {e}")))?;
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if self.client.teacher_timeout_secs == 0 {
            return Err(AppError::validation(
                "client.teacher_timeout_secs must be > 0",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(AppError::validation(
                "retry.base_delay_ms must not exceed retry.max_delay_ms",
            ));
        }
        if !matches!(self.parser.semester, 1 | 2) {
            return Err(AppError::validation("parser.semester must be 1 or 2"));
        }
        if self.parser.max_concurrent_lookups == 0 {
            return Err(AppError::validation(
                "parser.max_concurrent_lookups must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the schedule pages
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Per-attempt timeout for teacher schedule pages, which are slow
    #[serde(default = "defaults::teacher_timeout")]
    pub teacher_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            teacher_timeout_secs: defaults::teacher_timeout(),
        }
    }
}

/// Bounded retry with exponential backoff for teacher pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts before a teacher schedule is reported unavailable
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed attempt
    #[serde(default = "defaults::base_delay")]
    pub base_delay_ms: u64,

    /// Upper bound for a single delay
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            base_delay_ms: defaults::base_delay(),
            max_delay_ms: defaults::max_delay(),
        }
    }
}

impl RetryConfig {
    /// Delay to wait after the given failed attempt (one-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        let delay = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Cell parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Semester number stamped into slot identifiers
    #[serde(default = "defaults::semester")]
    pub semester: u8,

    /// Teacher lookups in flight per cell
    #[serde(default = "defaults::max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            semester: defaults::semester(),
            max_concurrent_lookups: defaults::max_concurrent_lookups(),
        }
    }
}

mod defaults {
    // Client defaults
    pub fn base_url() -> String {
        "http://rozklad.kpi.ua/Schedules".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; rozklad/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn teacher_timeout() -> u64 {
        60
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        5
    }
    pub fn base_delay() -> u64 {
        500
    }
    pub fn max_delay() -> u64 {
        8000
    }

    // Parser defaults
    pub fn semester() -> u8 {
        1
    }
    pub fn max_concurrent_lookups() -> usize {
        4
    }
}
