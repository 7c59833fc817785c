//! Runtime error types.

use std::path::PathBuf;

use callinfo_engine::NativeError;

/// Errors that can occur while configuring or loading a runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Explicitly requested configuration file does not exist
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Malformed configuration
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Native call or realm operation failed
    #[error("Runtime error: {0}")]
    Native(#[from] NativeError),
}
