#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Panel operations themselves never fail: invalid requests are ignored and
//! degenerate geometry keeps the last good values. The only fallible surface
//! is loading and strictly validating a [`PanelConfig`](crate::PanelConfig).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
