//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Output path exists but is not a directory
    #[error("Output path is not a directory: {path}")]
    OutputNotDirectory { path: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn output_not_directory(path: impl Into<String>) -> Self {
        Self::OutputNotDirectory { path: path.into() }
    }
}
