//! Custom error types for autoclicker.
//!
//! One `thiserror` enum covers configuration, platform and input-injection
//! failures so both front ends can decide how to surface them.

use std::io;
use thiserror::Error;

/// Main error type for autoclicker operations.
#[derive(Error, Debug)]
pub enum ClickerError {
    /// A click configuration field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Input injection is not available on this operating system.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The operating system rejected an injected input event.
    #[error("input injection failed: {0}")]
    InputInjection(String),

    /// The click worker thread panicked before reporting a result.
    #[error("click worker panicked")]
    WorkerPanicked,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for autoclicker operations.
pub type Result<T> = std::result::Result<T, ClickerError>;

impl ClickerError {
    /// Create a new InvalidConfig error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Create a new UnsupportedPlatform error.
    pub fn unsupported_platform(message: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(message.into())
    }

    /// Create a new InputInjection error.
    pub fn input_injection(message: impl Into<String>) -> Self {
        Self::InputInjection(message.into())
    }

    /// Name of the offending field for configuration errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig { field, .. } => Some(field),
            _ => None,
        }
    }
}
