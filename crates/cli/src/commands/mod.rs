//! Command implementations.

mod capture;
mod info;
mod run;
mod validate;

pub use capture::run_capture;
pub use info::run_info;
pub use run::run_module;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, ResourceConfig};

use crate::error::CliError;

/// Load a resource config file, keeping validation warnings
fn load_config(path: &Path) -> Result<(ResourceConfig, Vec<String>)> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    let format = ConfigLoader::detect_format(path)
        .with_context(|| format!("Unsupported config file {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    ConfigLoader::load_with_warnings(&content, format)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
