//! Resource identity and lifecycle
//!
//! Model / API triples, resource configs as delivered by the host, and the
//! lifecycle hooks every constructed resource exposes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ContractError;

fn split_triple<'a>(kind: &str, s: &'a str) -> Result<[&'a str; 3], ContractError> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [a, b, c] if !a.is_empty() && !b.is_empty() && !c.is_empty() => Ok([*a, *b, *c]),
        _ => Err(ContractError::config_parse(format!(
            "invalid {kind} '{s}': expected three non-empty parts separated by ':'"
        ))),
    }
}

/// Model triple `namespace:family:name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Model {
    pub namespace: String,
    pub family: String,
    pub name: String,
}

impl Model {
    pub fn new(
        namespace: impl Into<String>,
        family: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            family: family.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

impl FromStr for Model {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [namespace, family, name] = split_triple("model", s)?;
        Ok(Self::new(namespace, family, name))
    }
}

impl TryFrom<String> for Model {
    type Error = ContractError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        model.to_string()
    }
}

/// API triple `namespace:type:subtype`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Api {
    pub namespace: String,
    pub resource_type: String,
    pub subtype: String,
}

impl Api {
    pub fn new(
        namespace: impl Into<String>,
        resource_type: impl Into<String>,
        subtype: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            resource_type: resource_type.into(),
            subtype: subtype.into(),
        }
    }

    /// `rdk:component:camera`
    pub fn camera() -> Self {
        Self::new("rdk", "component", "camera")
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.namespace, self.resource_type, self.subtype
        )
    }
}

impl FromStr for Api {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [namespace, resource_type, subtype] = split_triple("api", s)?;
        Ok(Self::new(namespace, resource_type, subtype))
    }
}

impl TryFrom<String> for Api {
    type Error = ContractError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Api> for String {
    fn from(api: Api) -> Self {
        api.to_string()
    }
}

/// Fully qualified resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    pub api: Api,
    pub name: String,
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api, self.name)
    }
}

/// Resource configuration as delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Instance name
    pub name: String,

    /// API the resource implements
    #[serde(default = "Api::camera")]
    pub api: Api,

    /// Model to construct
    pub model: Model,

    /// Model-specific attributes (JSON object)
    #[serde(default)]
    pub attributes: Value,
}

impl ResourceConfig {
    pub fn resource_name(&self) -> ResourceName {
        ResourceName {
            api: self.api.clone(),
            name: self.name.clone(),
        }
    }

    /// Deserialize the attributes into the model's native config type
    ///
    /// Missing attributes are treated as an empty object.
    pub fn native_config<C: AttributeConfig>(&self) -> Result<C, ContractError> {
        let attributes = match &self.attributes {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        serde_json::from_value(attributes).map_err(|e| ContractError::ConfigParse {
            message: format!("attributes of '{}': {e}", self.name),
            source: Some(Box::new(e)),
        })
    }
}

/// Model-specific attribute config
pub trait AttributeConfig: DeserializeOwned + Send + 'static {
    /// Validate the config
    ///
    /// `path` locates the config in the host's document and prefixes field
    /// names in errors. Returns non-fatal warnings.
    fn validate(&self, path: &str) -> Result<Vec<String>, ContractError>;
}

/// Lifecycle hooks of a constructed resource
pub trait Resource: Send + Sync {
    fn name(&self) -> &ResourceName;

    /// Whether a config change must destroy and reconstruct the resource
    fn rebuild_on_reconfigure(&self) -> bool {
        true
    }

    /// Release held resources
    fn close(&self) -> Result<(), ContractError>;
}

/// Resources injected into a constructor
pub type Dependencies = HashMap<ResourceName, Arc<dyn Resource>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trip() {
        let model: Model = "ncs:camera:nickcam".parse().unwrap();
        assert_eq!(model.namespace, "ncs");
        assert_eq!(model.family, "camera");
        assert_eq!(model.name, "nickcam");
        assert_eq!(model.to_string(), "ncs:camera:nickcam");
    }

    #[test]
    fn test_model_rejects_bad_triples() {
        assert!("ncs:camera".parse::<Model>().is_err());
        assert!("ncs::nickcam".parse::<Model>().is_err());
        assert!("a:b:c:d".parse::<Model>().is_err());
    }

    #[test]
    fn test_resource_config_defaults_api() {
        let config: ResourceConfig = serde_json::from_str(
            r#"{"name": "cam", "model": "ncs:camera:nickcam", "attributes": {"big": true}}"#,
        )
        .unwrap();
        assert_eq!(config.api, Api::camera());
        assert_eq!(
            config.resource_name().to_string(),
            "rdk:component:camera/cam"
        );
    }
}
