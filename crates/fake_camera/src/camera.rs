//! Fake clock camera
//!
//! Implements `Camera` on top of a [`ClockDrawer`] and the bundled point
//! clouds. One async mutex per camera serializes every call that renders or
//! reads state, stream frames included.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use clock_drawer::ClockDrawer;
use config_loader::CameraConfig;
use contracts::{
    Camera, CommandMap, ContractError, EncodedImage, NamedImage, PointCloud, Projector,
    Properties, Resource, ResourceName, ResponseMetadata,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::assets::PointCloudAsset;
use crate::stream::ClockStream;

/// Command key that terminates the process
pub const CRASH_COMMAND: &str = "boom";

/// Exit code used by the crash command
pub const CRASH_EXIT_CODE: i32 = 1;

/// Called with the exit code when the crash command arrives
///
/// The default hook exits the process. Tests install a hook that records the
/// call and returns.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Hook that terminates the process immediately, skipping cleanup
pub fn process_exit_hook() -> ExitHook {
    Arc::new(|code| std::process::exit(code))
}

/// Current time and its RFC 3339 nanosecond rendering
pub(crate) fn timestamp() -> (DateTime<Utc>, String) {
    let now = Utc::now();
    (now, format_timestamp(now))
}

pub(crate) fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// State guarded by the camera lock
#[derive(Debug)]
pub(crate) struct CameraState {
    pub(crate) drawer: ClockDrawer,
    pub(crate) big: bool,
    pub(crate) frames_served: u64,
}

impl CameraState {
    /// Render `text`, counting the frame and recording metrics
    pub(crate) fn render(&mut self, text: &str) -> Result<EncodedImage, ContractError> {
        let started = Instant::now();
        let image = self.drawer.image(text)?;
        self.frames_served += 1;
        observability::record_image_rendered(
            image.encoding.extension(),
            image.data.len(),
            started.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(image)
    }
}

/// Fake clock camera
pub struct FakeCamera {
    name: ResourceName,
    state: Arc<Mutex<CameraState>>,
    exit_hook: ExitHook,
}

impl FakeCamera {
    /// Build a camera from validated attributes
    ///
    /// The drawer label is the fully qualified resource name.
    #[instrument(name = "fake_camera_new", skip_all, fields(camera = %name))]
    pub fn from_config(name: ResourceName, config: &CameraConfig) -> Result<Self, ContractError> {
        let drawer = ClockDrawer::new(
            name.to_string(),
            config.rgba()?,
            config.encoding()?,
            config.big,
        );
        debug!(
            big = config.big,
            color = %config.color,
            image_type = %config.image_type,
            "fake camera constructed"
        );

        Ok(Self {
            name,
            state: Arc::new(Mutex::new(CameraState {
                drawer,
                big: config.big,
                frames_served: 0,
            })),
            exit_hook: process_exit_hook(),
        })
    }

    /// Replace the crash command's exit hook
    pub fn with_exit_hook(mut self, hook: ExitHook) -> Self {
        self.exit_hook = hook;
        self
    }

    /// Frames rendered so far, across direct calls and streams
    pub async fn frames_served(&self) -> u64 {
        self.state.lock().await.frames_served
    }

    /// File extension of the configured encoding
    pub async fn extension(&self) -> &'static str {
        self.state.lock().await.drawer.extension()
    }
}

impl Camera for FakeCamera {
    type Stream = ClockStream;

    async fn image(&self) -> Result<(EncodedImage, ResponseMetadata), ContractError> {
        let mut state = self.state.lock().await;
        debug!(camera = %self.name, "GetImage START");

        let (captured_at, now) = timestamp();
        let image = state.render(&format!("image time: {now}"))?;

        debug!(camera = %self.name, "GetImage END");
        Ok((image, ResponseMetadata { captured_at }))
    }

    async fn images(&self) -> Result<(Vec<NamedImage>, ResponseMetadata), ContractError> {
        let mut state = self.state.lock().await;
        debug!(camera = %self.name, "GetImages START");
        let ext = state.drawer.extension();

        let (ts1, name1) = timestamp();
        let first = state.render(&format!("images1 time: {name1}"))?;

        // Source names must differ even on a coarse clock
        let mut ts2 = Utc::now();
        if ts2 <= ts1 {
            ts2 = ts1 + TimeDelta::nanoseconds(1);
        }
        let name2 = format_timestamp(ts2);
        let second = state.render(&format!("images2 time: {name2}"))?;

        let captured_at = Utc::now().max(ts2);
        debug!(camera = %self.name, "GetImages END");

        Ok((
            vec![
                NamedImage {
                    image: first,
                    source_name: format!("{name1}.{ext}"),
                },
                NamedImage {
                    image: second,
                    source_name: format!("{name2}.{ext}"),
                },
            ],
            ResponseMetadata { captured_at },
        ))
    }

    async fn next_point_cloud(&self) -> Result<PointCloud, ContractError> {
        let state = self.state.lock().await;
        debug!(camera = %self.name, big = state.big, "NextPointCloud START");

        let cloud = PointCloudAsset::for_size(state.big).decode()?;
        observability::record_point_cloud_served(cloud.len());

        debug!(camera = %self.name, points = cloud.len(), "NextPointCloud END");
        Ok(cloud)
    }

    async fn projector(&self) -> Result<Projector, ContractError> {
        debug!(camera = %self.name, "Projector START");
        debug!(camera = %self.name, "Projector END");
        Err(ContractError::unimplemented("projector"))
    }

    fn properties(&self) -> Properties {
        debug!(camera = %self.name, "Properties");
        Properties { supports_pcd: true }
    }

    async fn stream(&self) -> Result<ClockStream, ContractError> {
        let _state = self.state.lock().await;
        debug!(camera = %self.name, "Stream START");

        let stream = ClockStream::new(self.name.clone(), Arc::clone(&self.state));
        observability::record_stream_opened();

        debug!(camera = %self.name, "Stream END");
        Ok(stream)
    }

    async fn do_command(&self, command: CommandMap) -> Result<CommandMap, ContractError> {
        let _state = self.state.lock().await;
        let crash = command.contains_key(CRASH_COMMAND);
        observability::record_command(crash);

        if crash {
            info!(camera = %self.name, "Boom");
            (self.exit_hook)(CRASH_EXIT_CODE);
            return Err(ContractError::DebugTrigger);
        }

        Ok(CommandMap::new())
    }
}

impl Resource for FakeCamera {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn close(&self) -> Result<(), ContractError> {
        debug!(camera = %self.name, "fake camera closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LARGE_POINT_COUNT, SMALL_POINT_COUNT};
    use contracts::{Api, ImageEncoding, MediaStream};
    use serde_json::json;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn camera(big: bool, color: &str, image_type: &str) -> FakeCamera {
        let name = ResourceName {
            api: Api::camera(),
            name: "clock".into(),
        };
        FakeCamera::from_config(name, &CameraConfig::new(big, color, image_type)).unwrap()
    }

    fn recording_hook() -> (ExitHook, Arc<AtomicI32>) {
        let code = Arc::new(AtomicI32::new(-1));
        let recorded = Arc::clone(&code);
        let hook: ExitHook = Arc::new(move |c| recorded.store(c, Ordering::SeqCst));
        (hook, code)
    }

    #[tokio::test]
    async fn test_green_jpeg_small_scenario() {
        let cam = camera(false, "green", "jpeg");

        assert_eq!(cam.properties(), Properties { supports_pcd: true });

        let (image, meta) = cam.image().await.unwrap();
        assert!(!image.data.is_empty());
        assert_eq!(image.encoding, ImageEncoding::Jpeg);
        assert_eq!(&image.data[..2], &[0xFF, 0xD8]);
        assert!(meta.captured_at <= Utc::now());

        let cloud = cam.next_point_cloud().await.unwrap();
        assert_eq!(cloud.len(), SMALL_POINT_COUNT);
    }

    #[tokio::test]
    async fn test_big_point_cloud() {
        let cam = camera(true, "white", "png");
        for _ in 0..2 {
            assert_eq!(cam.next_point_cloud().await.unwrap().len(), LARGE_POINT_COUNT);
        }
    }

    #[tokio::test]
    async fn test_images_names_distinct_with_extension() {
        for (image_type, ext) in [("jpeg", ".jpeg"), ("png", ".png")] {
            let cam = camera(false, "red", image_type);
            let (images, meta) = cam.images().await.unwrap();

            assert_eq!(images.len(), 2);
            assert_ne!(images[0].source_name, images[1].source_name);
            for named in &images {
                assert!(named.source_name.ends_with(ext), "got {}", named.source_name);
                assert!(!named.image.data.is_empty());
            }

            let first = images[0].source_name.trim_end_matches(ext);
            let first = DateTime::parse_from_rfc3339(first).unwrap();
            assert!(meta.captured_at > first);
        }
    }

    #[tokio::test]
    async fn test_projector_always_unimplemented() {
        for (big, color, image_type) in [(false, "blue", "png"), (true, "white", "jpeg")] {
            let cam = camera(big, color, image_type);
            let err = cam.projector().await.unwrap_err();
            assert!(matches!(err, ContractError::Unimplemented { .. }));
        }
    }

    #[tokio::test]
    async fn test_stream_renders_fresh_frames() {
        let cam = camera(false, "blue", "png");
        let mut stream = cam.stream().await.unwrap();

        let first = stream.next().await.unwrap();
        let second = stream.next().await.unwrap();
        assert_eq!((first.width, first.height), (second.width, second.height));
        assert_ne!(first.data, second.data);
        stream.close().await.unwrap();

        assert_eq!(cam.frames_served().await, 2);
    }

    #[tokio::test]
    async fn test_do_command_without_trigger() {
        let (hook, code) = recording_hook();
        let cam = camera(false, "green", "jpeg").with_exit_hook(hook);

        let mut command = CommandMap::new();
        command.insert("hello".into(), json!("world"));
        let result = cam.do_command(command).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(code.load(Ordering::SeqCst), -1);
    }

    #[tokio::test]
    async fn test_crash_command_invokes_exit_hook() {
        let (hook, code) = recording_hook();
        let cam = camera(false, "green", "jpeg").with_exit_hook(hook);

        let mut command = CommandMap::new();
        command.insert(CRASH_COMMAND.into(), json!(null));
        let err = cam.do_command(command).await.unwrap_err();

        assert!(matches!(err, ContractError::DebugTrigger));
        assert_eq!(code.load(Ordering::SeqCst), CRASH_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_lifecycle_hooks() {
        let cam = camera(false, "white", "png");
        assert!(cam.rebuild_on_reconfigure());
        assert!(cam.close().is_ok());
        assert_eq!(cam.name().to_string(), "rdk:component:camera/clock");
        assert_eq!(cam.extension().await, "png");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let name = ResourceName {
            api: Api::camera(),
            name: "clock".into(),
        };
        let result = FakeCamera::from_config(name, &CameraConfig::new(false, "pink", "png"));
        assert!(matches!(result, Err(ContractError::ConfigValidation { .. })));
    }
}
