//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{Camera, Dependencies, Resource};
use tracing::{error, info, warn};

use super::load_config;
use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_module(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let (config, warnings) = load_config(&args.config)?;
    for warning in &warnings {
        warn!(warning = %warning, "Configuration warning");
    }

    let mut module = resource_factory::fake_camera_module(fake_camera::process_exit_hook())
        .context("Failed to register camera model")?;
    let camera = module
        .add_resource(&config, &Dependencies::new())
        .with_context(|| format!("Failed to construct camera '{}'", config.name))?;

    let properties = camera.properties();
    info!(
        camera = %camera.name(),
        model = %config.model,
        supports_pcd = properties.supports_pcd,
        "Camera ready, waiting for shutdown signal"
    );

    module
        .run_until(shutdown_signal())
        .await
        .context("Module shutdown failed")?;

    info!("fakecam finished");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
///
/// A handler that cannot be installed never resolves, leaving the other one
/// in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
