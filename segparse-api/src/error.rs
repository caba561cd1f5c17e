//! API error types

use segparse_core::{ConfigError, ParseError};
use std::string::FromUtf8Error;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Categories, lexicons or grammar could not be built
    #[error("setup error: {0}")]
    Setup(#[from] ConfigError),

    /// A parse could not be converted for output
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Configuration document could not be decoded
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
