//! Module lifecycle
//!
//! Owns the resources constructed from host configs and closes them on
//! removal, rebuild and shutdown.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use contracts::{Api, ContractError, Dependencies, Model, Resource, ResourceConfig, ResourceName};
use tracing::{error, info, instrument, warn};

use crate::error::{ResourceFactoryError, Result};
use crate::registry::{Registration, ResourceRegistry};

/// Served models and their live resources
pub struct Module<R: Resource> {
    registry: ResourceRegistry<R>,
    models: HashSet<(Api, Model)>,
    resources: HashMap<ResourceName, Arc<R>>,
}

impl<R: Resource + 'static> Module<R> {
    pub fn new(registry: ResourceRegistry<R>) -> Self {
        Self {
            registry,
            models: HashSet::new(),
            resources: HashMap::new(),
        }
    }

    /// Serve a registered model
    #[instrument(name = "module_add_model", skip_all, fields(api = %api, model = %model))]
    pub fn add_model(&mut self, api: Api, model: Model) -> Result<()> {
        if self.registry.lookup(&api, &model).is_none() {
            return Err(ResourceFactoryError::model_not_registered(&api, &model));
        }
        self.models.insert((api, model));
        info!("model added");
        Ok(())
    }

    /// Served API/model pairs
    pub fn models(&self) -> impl Iterator<Item = &(Api, Model)> {
        self.models.iter()
    }

    fn registration(&self, config: &ResourceConfig) -> Result<&Registration<R>> {
        let served = self
            .models
            .contains(&(config.api.clone(), config.model.clone()));
        match self.registry.lookup(&config.api, &config.model) {
            Some(registration) if served => Ok(registration),
            _ => Err(ResourceFactoryError::model_not_registered(
                &config.api,
                &config.model,
            )),
        }
    }

    /// Validate a config against its model, returning warnings
    pub fn validate(&self, config: &ResourceConfig) -> Result<Vec<String>> {
        if config.name.is_empty() {
            return Err(ContractError::config_validation("name", "must not be empty").into());
        }
        let warnings = self.registration(config)?.validate(config)?;
        Ok(warnings)
    }

    fn construct(&self, config: &ResourceConfig, deps: &Dependencies) -> Result<Arc<R>> {
        let warnings = self.validate(config)?;
        for warning in &warnings {
            warn!(resource = %config.name, warning = %warning, "config warning");
        }

        let resource = self
            .registration(config)?
            .construct(config, deps)
            .map_err(|source| ResourceFactoryError::Construction {
                name: config.name.clone(),
                source,
            })?;
        Ok(Arc::new(resource))
    }

    /// Validate and construct a resource
    ///
    /// A resource already holding the name is closed and replaced.
    #[instrument(name = "module_add_resource", skip_all, fields(resource = %config.name))]
    pub fn add_resource(&mut self, config: &ResourceConfig, deps: &Dependencies) -> Result<Arc<R>> {
        let resource = self.construct(config, deps)?;

        if let Some(previous) = self
            .resources
            .insert(config.resource_name(), Arc::clone(&resource))
        {
            warn!("replacing existing resource");
            close_safe(previous.as_ref());
        }

        info!(model = %config.model, "resource added");
        Ok(resource)
    }

    /// Apply a new config to an existing resource
    ///
    /// Resources that ask to be rebuilt get a new instance, and the old one is
    /// closed once the new one is in place. The others keep their instance.
    #[instrument(name = "module_reconfigure", skip_all, fields(resource = %config.name))]
    pub fn reconfigure(&mut self, config: &ResourceConfig, deps: &Dependencies) -> Result<Arc<R>> {
        let name = config.resource_name();
        let existing = self
            .resources
            .get(&name)
            .cloned()
            .ok_or_else(|| ResourceFactoryError::resource_not_found(&name))?;

        if !existing.rebuild_on_reconfigure() {
            self.validate(config)?;
            info!("resource kept across reconfigure");
            return Ok(existing);
        }

        // The old instance stays registered until its replacement exists
        let rebuilt = self.construct(config, deps)?;
        self.resources.insert(name, Arc::clone(&rebuilt));
        close_safe(existing.as_ref());
        info!("resource rebuilt");
        Ok(rebuilt)
    }

    /// Remove and close a resource
    #[instrument(name = "module_remove_resource", skip_all, fields(resource = %name))]
    pub fn remove_resource(&mut self, name: &ResourceName) -> Result<()> {
        let resource = self
            .resources
            .remove(name)
            .ok_or_else(|| ResourceFactoryError::resource_not_found(name))?;
        resource.close()?;
        info!("resource removed");
        Ok(())
    }

    pub fn resource(&self, name: &ResourceName) -> Result<Arc<R>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceFactoryError::resource_not_found(name))
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &ResourceName> {
        self.resources.keys()
    }

    /// Serve until `shutdown` resolves, then close every resource
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(resources = self.resources.len(), "module running");
        shutdown.await;
        info!("shutdown requested");
        self.close_all();
        Ok(())
    }

    /// Close every resource, logging failures
    pub fn close_all(&mut self) {
        for (_, resource) in std::mem::take(&mut self.resources) {
            close_safe(resource.as_ref());
        }
        info!("all resources closed");
    }
}

fn close_safe<R: Resource + ?Sized>(resource: &R) {
    if let Err(e) = resource.close() {
        error!(resource = %resource.name(), error = %e, "failed to close resource");
    }
}
