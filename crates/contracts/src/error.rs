//! Layered error definitions
//!
//! Categorized by source: config / encoding / capability / point cloud

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Rendering Errors =====
    /// Image encoding failed
    #[error("failed to encode {encoding} image: {message}")]
    Encoding { encoding: String, message: String },

    // ===== Capability Errors =====
    /// Capability deliberately not provided by this resource
    #[error("{capability} unimplemented")]
    Unimplemented { capability: String },

    /// Point cloud payload could not be decoded
    #[error("point cloud decode error: {message}")]
    PointCloudDecode { message: String },

    /// Crash command was received but the exit hook returned
    #[error("debug crash trigger received")]
    DebugTrigger,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create encoding error
    pub fn encoding(encoding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            encoding: encoding.into(),
            message: message.into(),
        }
    }

    /// Create unimplemented capability error
    pub fn unimplemented(capability: impl Into<String>) -> Self {
        Self::Unimplemented {
            capability: capability.into(),
        }
    }

    /// Create point cloud decode error
    pub fn point_cloud_decode(message: impl Into<String>) -> Self {
        Self::PointCloudDecode {
            message: message.into(),
        }
    }
}
