//! Resource config validation
//!
//! Rules:
//! - resource name is non-empty and contains no '/'
//! - api is the camera api
//! - attributes parse and validate as the camera model's attributes
//! - unknown attribute keys only warn

use contracts::{Api, AttributeConfig, ContractError, ResourceConfig};

use crate::CameraConfig;

const KNOWN_ATTRIBUTES: [&str; 3] = ["big", "color", "image_type"];

/// Validate a resource config
///
/// Returns the first error encountered, or the collected warnings.
pub fn validate(config: &ResourceConfig) -> Result<Vec<String>, ContractError> {
    validate_name(config)?;
    validate_api(config)?;
    validate_attributes(config)
}

fn validate_name(config: &ResourceConfig) -> Result<(), ContractError> {
    if config.name.is_empty() {
        return Err(ContractError::config_validation(
            "name",
            "resource name cannot be empty",
        ));
    }
    if config.name.contains('/') {
        return Err(ContractError::config_validation(
            "name",
            format!("resource name '{}' cannot contain '/'", config.name),
        ));
    }
    Ok(())
}

fn validate_api(config: &ResourceConfig) -> Result<(), ContractError> {
    let expected = Api::camera();
    if config.api != expected {
        return Err(ContractError::config_validation(
            format!("{}.api", config.name),
            format!("unsupported api '{}', expected '{expected}'", config.api),
        ));
    }
    Ok(())
}

fn validate_attributes(config: &ResourceConfig) -> Result<Vec<String>, ContractError> {
    let attributes: CameraConfig = config.native_config()?;
    let mut warnings = attributes.validate(&config.name)?;

    if let Some(object) = config.attributes.as_object() {
        for key in object.keys() {
            if !KNOWN_ATTRIBUTES.contains(&key.as_str()) {
                warnings.push(format!(
                    "unknown attribute '{key}' on resource '{}' is ignored",
                    config.name
                ));
            }
        }
    }

    Ok(warnings)
}
