//! `capture` command implementation.
//!
//! Output layout:
//! - `stream/<n>.<ext>` for stream frames
//! - `images/<source_name>` for the batch
//! - `point_cloud/<payload>.pcd` when requested

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use config_loader::CameraConfig;
use contracts::{Camera, Dependencies, MediaStream};
use fake_camera::{FakeCamera, PointCloudAsset};
use observability::CaptureStats;
use tracing::{debug, info, instrument};

use super::load_config;
use crate::cli::CaptureArgs;
use crate::error::CliError;

/// Execute the `capture` command
pub async fn run_capture(args: &CaptureArgs) -> Result<()> {
    info!(
        config = %args.config.display(),
        output = %args.output.display(),
        "Starting capture"
    );

    let (config, _) = load_config(&args.config)?;
    let big = config.native_config::<CameraConfig>()?.big;

    let mut module = resource_factory::fake_camera_module(fake_camera::process_exit_hook())
        .context("Failed to register camera model")?;
    let camera = module
        .add_resource(&config, &Dependencies::new())
        .with_context(|| format!("Failed to construct camera '{}'", config.name))?;

    let plan = CapturePlan {
        output: args.output.clone(),
        frames: args.frames,
        point_cloud: args.point_cloud.then_some(PointCloudAsset::for_size(big)),
    };
    let stats = capture(&camera, &plan).await?;
    module.close_all();

    println!("{}", stats.summary());
    Ok(())
}

/// What to write where
#[derive(Debug)]
struct CapturePlan {
    output: PathBuf,
    frames: u32,
    point_cloud: Option<PointCloudAsset>,
}

#[instrument(name = "capture", skip_all, fields(output = %plan.output.display()))]
async fn capture(camera: &FakeCamera, plan: &CapturePlan) -> Result<CaptureStats> {
    if plan.output.exists() && !plan.output.is_dir() {
        return Err(CliError::output_not_directory(plan.output.display().to_string()).into());
    }

    let mut stats = CaptureStats::new();
    let ext = camera.extension().await;

    let stream_dir = create_dir(&plan.output, "stream")?;
    let mut stream = camera.stream().await?;
    for n in 0..plan.frames {
        let started = Instant::now();
        let frame = stream.next().await?;
        stats.push_image(frame.data.len(), elapsed_ms(started));
        write_file(&stream_dir.join(format!("{n}.{ext}")), &frame.data)?;
    }
    stream.close().await?;

    let images_dir = create_dir(&plan.output, "images")?;
    let started = Instant::now();
    let (images, metadata) = camera.images().await?;
    let per_image_ms = elapsed_ms(started) / images.len().max(1) as f64;
    for named in &images {
        stats.push_image(named.image.data.len(), per_image_ms);
        write_file(&images_dir.join(&named.source_name), &named.image.data)?;
    }
    debug!(captured_at = %metadata.captured_at, images = images.len(), "batch written");

    if let Some(asset) = plan.point_cloud {
        let cloud = camera.next_point_cloud().await?;
        let cloud_dir = create_dir(&plan.output, "point_cloud")?;
        write_file(&cloud_dir.join(asset.file_name()), asset.bytes())?;
        stats.push_point_cloud();
        debug!(points = cloud.len(), payload = asset.file_name(), "point cloud written");
    }

    info!(
        images = stats.images,
        point_clouds = stats.point_clouds,
        "Capture completed"
    );
    Ok(stats)
}

fn create_dir(base: &Path, name: &str) -> Result<PathBuf> {
    let dir = base.join(name);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
