//! # Resource Factory
//!
//! Model registration and resource lifecycle for the camera module.
//!
//! Responsibilities:
//! - Map API/model pairs to typed constructors
//! - Validate resource configs before construction
//! - Rebuild resources on reconfigure, close them on removal and shutdown

pub mod error;
pub mod module;
pub mod registry;

pub use error::{ResourceFactoryError, Result};
pub use module::Module;
pub use registry::{Registration, ResourceRegistry};

use config_loader::CameraConfig;
use contracts::{Dependencies, ResourceName};
use fake_camera::{process_exit_hook, ExitHook, FakeCamera};
use tracing::instrument;

/// Registry holding the fake camera model
pub fn register_fake_camera() -> Result<ResourceRegistry<FakeCamera>> {
    register_fake_camera_with_exit_hook(process_exit_hook())
}

/// Registry holding the fake camera model, with a custom crash hook
#[instrument(name = "register_fake_camera", skip_all)]
pub fn register_fake_camera_with_exit_hook(
    exit_hook: ExitHook,
) -> Result<ResourceRegistry<FakeCamera>> {
    let mut registry = ResourceRegistry::new();
    registry.register(
        fake_camera::api(),
        fake_camera::model(),
        Registration::new(
            move |name: ResourceName, config: CameraConfig, _deps: &Dependencies| {
                Ok(FakeCamera::from_config(name, &config)?.with_exit_hook(exit_hook.clone()))
            },
        ),
    )?;
    Ok(registry)
}

/// Module serving the fake camera model
pub fn fake_camera_module(exit_hook: ExitHook) -> Result<Module<FakeCamera>> {
    let mut module = Module::new(register_fake_camera_with_exit_hook(exit_hook)?);
    module.add_model(fake_camera::api(), fake_camera::model())?;
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_holds_single_model() {
        let registry = register_fake_camera().unwrap();
        assert_eq!(registry.len(), 1);
        let (api, model) = registry.models().next().unwrap();
        assert_eq!(api.to_string(), "rdk:component:camera");
        assert_eq!(model.to_string(), "ncs:camera:nickcam");
    }

    #[test]
    fn test_module_serves_fake_camera() {
        let module = fake_camera_module(process_exit_hook()).unwrap();
        assert_eq!(module.models().count(), 1);
    }
}
