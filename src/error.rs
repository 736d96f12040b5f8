// src/error.rs

//! Unified error handling for the grabber.

use std::fmt;

use thiserror::Error;

/// Result type alias for grabber operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

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

    /// Claim endpoint answered 401
    #[error("Session is expired. Please update credentials in the config file.")]
    Unauthorized,

    /// Claim endpoint answered 403
    #[error("Forbidden access. Please check your permissions and credentials.")]
    Forbidden,

    /// Claim endpoint answered 5xx
    #[error("Server error ({status}). Please try again later.")]
    ServerError { status: u16 },

    /// Any other non-success status
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// A 2xx body that does not have the expected shape
    #[error("Unexpected claim response: {0}")]
    Decode(String),

    /// Rate-limit message without a usable wait duration
    #[error("Cannot read cooldown from message: {0}")]
    Cooldown(String),
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

    /// Create a cooldown parsing error.
    pub fn cooldown(message: impl Into<String>) -> Self {
        Self::Cooldown(message.into())
    }

    /// Map a non-success HTTP status to its error class.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            500..=599 => Self::ServerError { status },
            _ => Self::UnexpectedStatus { status },
        }
    }

    /// Fatal errors halt processing and need operator action.
    ///
    /// Everything else is transient: logged, then retried on a later tick.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Forbidden
                | Self::Cooldown(_)
                | Self::Config(_)
                | Self::Validation(_)
        )
    }
}
