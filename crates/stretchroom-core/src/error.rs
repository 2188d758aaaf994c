//! Core error types for stretchroom-core.
//!
//! This module defines the error hierarchy using thiserror. Only plan
//! validation can fail inside the timer engine itself; everything else comes
//! from the storage layer around it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stretchroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Plan validation errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML write errors
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// A session was started outside a tokio runtime
    #[error("No tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// An exercise plan that cannot be turned into a timer session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The plan has no sections at all
    #[error("plan has no sections")]
    NoSections,

    /// Every section produced zero segments
    #[error("plan produces no segments")]
    Empty,

    /// A single section is malformed
    #[error("section {index} is invalid: {message}")]
    InvalidSection { index: usize, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Plan store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No plan stored under this id
    #[error("Plan not found: {0}")]
    NotFound(String),

    /// A plan file exists but cannot be parsed
    #[error("Corrupt plan file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Plan ids double as file names
    #[error("Invalid plan id: '{0}'")]
    InvalidId(String),

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
