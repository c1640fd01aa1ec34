//! Error types for listenkit.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Permission platform errors
    #[error("Permission query failed for {capability}: {message}")]
    PermissionQuery { capability: String, message: String },

    // Recognition engine errors
    #[error("Recognition engine failed to start: {message}")]
    EngineStart { message: String },

    #[error("Recognition engine failed to stop: {message}")]
    EngineStop { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ListenError>;
