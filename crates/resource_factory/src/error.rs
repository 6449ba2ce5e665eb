//! Resource Factory error types

use contracts::ContractError;
use thiserror::Error;

/// Resource Factory specific error
#[derive(Debug, Error)]
pub enum ResourceFactoryError {
    /// No constructor for the API/model pair
    #[error("model '{model}' is not registered for api '{api}'")]
    ModelNotRegistered { api: String, model: String },

    /// Constructor registered twice
    #[error("model '{model}' is already registered for api '{api}'")]
    DuplicateRegistration { api: String, model: String },

    /// Unknown resource name
    #[error("resource '{name}' not found")]
    ResourceNotFound { name: String },

    /// Constructor failed
    #[error("failed to construct resource '{name}': {source}")]
    Construction {
        name: String,
        #[source]
        source: ContractError,
    },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ResourceFactoryError {
    pub fn model_not_registered(api: impl ToString, model: impl ToString) -> Self {
        Self::ModelNotRegistered {
            api: api.to_string(),
            model: model.to_string(),
        }
    }

    pub fn duplicate_registration(api: impl ToString, model: impl ToString) -> Self {
        Self::DuplicateRegistration {
            api: api.to_string(),
            model: model.to_string(),
        }
    }

    pub fn resource_not_found(name: impl ToString) -> Self {
        Self::ResourceNotFound {
            name: name.to_string(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, ResourceFactoryError>;
