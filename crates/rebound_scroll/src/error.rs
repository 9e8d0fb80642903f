//! Scroll controller error types

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML syntax or type error
    #[error("Failed to parse scroll config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A constant is NaN, infinite or negative
    #[error("{field} must be a finite, non-negative number (got {value})")]
    OutOfRange { field: &'static str, value: f64 },

    /// A constant that divides or paces time is zero or negative
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    /// Scrollbar opacity ceiling outside (0, 1]
    #[error("scrollbar.max_opacity must be in (0, 1] (got {0})")]
    Opacity(f64),
}

/// Errors surfaced when constructing a controller
///
/// Everything after construction is clamped or ignored rather than reported.
#[derive(Error, Debug)]
pub enum ScrollError {
    /// The timer service no longer accepts timers
    #[error("Timer service unavailable")]
    TimerUnavailable,

    /// Rejected configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for scroll controller operations
pub type Result<T> = std::result::Result<T, ScrollError>;
