//! `info` command implementation.

use anyhow::{Context, Result};
use clock_drawer::canvas_size;
use config_loader::{color_options, image_type_options, CameraConfig, ResourceConfig};
use fake_camera::PointCloudAsset;
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    name: String,
    api: String,
    model: String,
    image: ImageInfo,
    point_cloud: PointCloudInfo,
    valid_colors: Vec<&'static str>,
    valid_image_types: Vec<&'static str>,
}

#[derive(Serialize)]
struct ImageInfo {
    width: u32,
    height: u32,
    color: String,
    rgba: [u8; 4],
    image_type: String,
    mime_type: String,
}

#[derive(Serialize)]
struct PointCloudInfo {
    payload: String,
    points: usize,
    bytes: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let (config, _) = load_config(&args.config)?;
    let info = build_config_info(&config)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &ResourceConfig) -> Result<ConfigInfo> {
    let camera = config
        .native_config::<CameraConfig>()
        .context("Failed to read camera attributes")?;
    let encoding = camera.encoding()?;
    let (width, height) = canvas_size(camera.big);

    let asset = PointCloudAsset::for_size(camera.big);
    let cloud = asset.decode().context("Failed to decode bundled point cloud")?;

    Ok(ConfigInfo {
        name: config.name.clone(),
        api: config.api.to_string(),
        model: config.model.to_string(),
        image: ImageInfo {
            width,
            height,
            rgba: camera.rgba()?,
            color: camera.color,
            image_type: encoding.extension().to_string(),
            mime_type: encoding.mime_type().to_string(),
        },
        point_cloud: PointCloudInfo {
            payload: asset.file_name().to_string(),
            points: cloud.len(),
            bytes: asset.bytes().len(),
        },
        valid_colors: color_options(),
        valid_image_types: image_type_options(),
    })
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  fakecam Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📷 Camera");
    println!("   ├─ Name: {}", info.name);
    println!("   ├─ API: {}", info.api);
    println!("   └─ Model: {}", info.model);

    let image = &info.image;
    println!("\n🖼  Images");
    println!("   ├─ Size: {}x{}", image.width, image.height);
    println!("   ├─ Color: {} {:?}", image.color, image.rgba);
    println!("   └─ Encoding: {} ({})", image.image_type, image.mime_type);

    let cloud = &info.point_cloud;
    println!("\n☁  Point cloud");
    println!("   ├─ Payload: {}", cloud.payload);
    println!("   ├─ Points: {}", cloud.points);
    println!("   └─ Bytes: {}", cloud.bytes);

    println!("\n⚙️  Options");
    println!("   ├─ Colors: {}", info.valid_colors.join(", "));
    println!("   └─ Image types: {}", info.valid_image_types.join(", "));

    println!();
}
