//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::{CameraConfig, ResourceConfig};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    name: String,
    model: String,
    big: bool,
    color: String,
    image_type: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match check(args) {
        Ok((config, camera, warnings)) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: if warnings.is_empty() {
                None
            } else {
                Some(warnings)
            },
            summary: Some(ConfigSummary {
                name: config.name,
                model: config.model.to_string(),
                big: camera.big,
                color: camera.color,
                image_type: camera.image_type,
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("{e:#}")),
            warnings: None,
            summary: None,
        },
    }
}

/// Load the file, then check it against the registered model
fn check(args: &ValidateArgs) -> Result<(ResourceConfig, CameraConfig, Vec<String>)> {
    let (config, mut warnings) = load_config(&args.config)?;

    let module = resource_factory::fake_camera_module(fake_camera::process_exit_hook())?;
    warnings.extend(module.validate(&config)?);
    let camera = config.native_config::<CameraConfig>()?;

    Ok((config, camera, warnings))
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Name: {}", summary.name);
            println!("  Model: {}", summary.model);
            println!("  Big: {}", summary.big);
            println!("  Color: {}", summary.color);
            println!("  Image type: {}", summary.image_type);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args_for(content: &str, suffix: &str) -> (tempfile::NamedTempFile, ValidateArgs) {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        (file, args)
    }

    #[test]
    fn test_valid_config_has_summary() {
        let (_file, args) = args_for(
            r#"{"name": "clock", "model": "ncs:camera:nickcam",
                "attributes": {"big": true, "color": "blue", "image_type": "png"}}"#,
            ".json",
        );
        let result = validate_config(&args);
        assert!(result.valid, "{:?}", result.error);
        let summary = result.summary.unwrap();
        assert!(summary.big);
        assert_eq!(summary.color, "blue");
    }

    #[test]
    fn test_unserved_model_is_invalid() {
        let (_file, args) = args_for(
            r#"{"name": "clock", "model": "ncs:camera:other",
                "attributes": {"color": "blue", "image_type": "png"}}"#,
            ".json",
        );
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not registered"));
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let args = ValidateArgs {
            config: "/nonexistent/camera.toml".into(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not found"));
    }
}
