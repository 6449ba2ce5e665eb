//! # Fake Camera
//!
//! A camera that needs no hardware: every image is a freshly drawn clock and
//! every point cloud is one of two payloads compiled into the binary.
//!
//! Configured by [`CameraConfig`](config_loader::CameraConfig) attributes:
//! - `big`: 1920x1080 images and the large point cloud
//! - `color`: foreground color
//! - `image_type`: `jpeg` or `png`

pub mod assets;
mod camera;
pub mod pcd;
mod stream;

pub use assets::{PointCloudAsset, LARGE_POINT_COUNT, SMALL_POINT_COUNT};
pub use camera::{
    process_exit_hook, ExitHook, FakeCamera, CRASH_COMMAND, CRASH_EXIT_CODE,
};
pub use pcd::read_pcd;
pub use stream::ClockStream;

use contracts::{Api, Model};

/// Model triple served by this crate
pub fn model() -> Model {
    Model::new("ncs", "camera", "nickcam")
}

/// API the model is registered under
pub fn api() -> Api {
    Api::camera()
}
