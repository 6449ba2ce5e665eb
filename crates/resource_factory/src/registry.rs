//! Constructor registry
//!
//! Maps an API/model pair to a type-erased constructor. Attribute parsing and
//! validation are erased together with the constructor, so callers only ever
//! hand over a [`ResourceConfig`].

use std::collections::HashMap;

use contracts::{
    Api, AttributeConfig, ContractError, Dependencies, Model, ResourceConfig, ResourceName,
};
use tracing::{debug, instrument};

use crate::error::{ResourceFactoryError, Result};

type Constructor<R> = Box<
    dyn Fn(ResourceName, &ResourceConfig, &Dependencies) -> std::result::Result<R, ContractError>
        + Send
        + Sync,
>;

type Validator =
    Box<dyn Fn(&ResourceConfig) -> std::result::Result<Vec<String>, ContractError> + Send + Sync>;

/// Constructor plus attribute validator for one model
pub struct Registration<R> {
    constructor: Constructor<R>,
    validator: Validator,
}

impl<R: 'static> Registration<R> {
    /// Wrap a typed constructor
    ///
    /// `C` is the model's attribute type; it is parsed from the config's
    /// attributes and validated before `constructor` sees it.
    pub fn new<C, F>(constructor: F) -> Self
    where
        C: AttributeConfig,
        F: Fn(ResourceName, C, &Dependencies) -> std::result::Result<R, ContractError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            validator: Box::new(|config: &ResourceConfig| {
                let attributes: C = config.native_config()?;
                attributes.validate(&config.name)
            }),
            constructor: Box::new(
                move |name: ResourceName, config: &ResourceConfig, deps: &Dependencies| {
                    let attributes: C = config.native_config()?;
                    attributes.validate(&config.name)?;
                    constructor(name, attributes, deps)
                },
            ),
        }
    }

    /// Validate attributes, returning warnings
    pub fn validate(
        &self,
        config: &ResourceConfig,
    ) -> std::result::Result<Vec<String>, ContractError> {
        (self.validator)(config)
    }

    pub fn construct(
        &self,
        config: &ResourceConfig,
        deps: &Dependencies,
    ) -> std::result::Result<R, ContractError> {
        (self.constructor)(config.resource_name(), config, deps)
    }
}

/// Registered models, keyed by API and model
pub struct ResourceRegistry<R> {
    registrations: HashMap<(Api, Model), Registration<R>>,
}

impl<R> Default for ResourceRegistry<R> {
    fn default() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }
}

impl<R> ResourceRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor
    ///
    /// Fails when the pair is already registered; the first registration
    /// stays in place.
    #[instrument(
        name = "resource_registry_register",
        skip_all,
        fields(api = %api, model = %model)
    )]
    pub fn register(
        &mut self,
        api: Api,
        model: Model,
        registration: Registration<R>,
    ) -> Result<()> {
        let key = (api, model);
        if self.registrations.contains_key(&key) {
            return Err(ResourceFactoryError::duplicate_registration(&key.0, &key.1));
        }
        self.registrations.insert(key, registration);
        debug!("model registered");
        Ok(())
    }

    pub fn lookup(&self, api: &Api, model: &Model) -> Option<&Registration<R>> {
        self.registrations.get(&(api.clone(), model.clone()))
    }

    /// Registered API/model pairs
    pub fn models(&self) -> impl Iterator<Item = (&Api, &Model)> {
        self.registrations.keys().map(|(api, model)| (api, model))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
