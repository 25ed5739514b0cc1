// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
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

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Login rejected by the forum; fatal, aborts the run
    #[error("Login failed for {0}")]
    Login(String),

    /// Profile page did not have the expected shape; fatal
    #[error("Profile page error: {0}")]
    Profile(String),

    /// A stage was invoked before its inputs were populated
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Digest email could not be sent
    #[error("Mail error: {0}")]
    Mail(String),
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

    /// Create a profile-shape error.
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile(message.into())
    }

    /// Create a not-ready precondition error.
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }

    /// Create a mail delivery error.
    pub fn mail(message: impl fmt::Display) -> Self {
        Self::Mail(message.to_string())
    }
}
