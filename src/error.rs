// src/error.rs

//! Unified error handling for the schedule parser.

use std::fmt;

use thiserror::Error;

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Slot coordinate outside its defined range
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    /// A teacher's personal schedule could not be fetched or read
    #[error("Schedule unavailable for teacher {teacher}: {message}")]
    ScheduleUnavailable { teacher: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid slot error.
    pub fn invalid_slot(message: impl Into<String>) -> Self {
        Self::InvalidSlot(message.into())
    }

    /// Create a teacher schedule error scoped to one teacher reference.
    pub fn schedule_unavailable(teacher: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ScheduleUnavailable {
            teacher: teacher.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error only affects a single teacher lookup.
    pub fn is_schedule_unavailable(&self) -> bool {
        matches!(self, Self::ScheduleUnavailable { .. })
    }
}
