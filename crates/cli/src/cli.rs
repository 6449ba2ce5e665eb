//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fakecam - clock camera module for robotics hosts
#[derive(Parser, Debug)]
#[command(
    name = "fakecam",
    author,
    version,
    about = "Fake clock camera module",
    long_about = "A camera module that needs no hardware.\n\n\
                  Every image is a freshly drawn clock stamped with the capture time, \n\
                  and point clouds come from payloads bundled into the binary."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FAKECAM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FAKECAM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (disabled when unset)
    #[arg(long, global = true, env = "FAKECAM_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the configured camera until Ctrl+C / SIGTERM
    Run(RunArgs),

    /// Validate configuration file without constructing the camera
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Capture frames, a batch and optionally a point cloud to disk
    Capture(CaptureArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to resource configuration file (TOML or JSON)
    #[arg(short, long, default_value = "camera.toml", env = "FAKECAM_CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "camera.toml", env = "FAKECAM_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "camera.toml", env = "FAKECAM_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `capture` command
#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "camera.toml", env = "FAKECAM_CONFIG")]
    pub config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./capture")]
    pub output: PathBuf,

    /// Number of stream frames to write
    #[arg(long, default_value = "5")]
    pub frames: u32,

    /// Also write the point cloud payload
    #[arg(long)]
    pub point_cloud: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
