//! # Integration Tests
//!
//! Cross-crate tests for the camera module.
//!
//! Covers:
//! - Contract snapshot checks
//! - Config file to module to camera, end to end
//! - Concurrent access through the camera lock

#[cfg(test)]
mod contract_tests {
    use contracts::{Api, ImageEncoding, Model};

    #[test]
    fn test_contracts_compile() {
        assert_eq!(Api::camera().to_string(), "rdk:component:camera");
        assert_eq!(fake_camera::model(), Model::new("ncs", "camera", "nickcam"));
        assert_eq!(ImageEncoding::Jpeg.extension(), "jpeg");
    }

    #[test]
    fn test_lookup_tables_are_sorted() {
        assert_eq!(
            config_loader::color_options(),
            vec!["blue", "green", "red", "white"]
        );
        assert_eq!(config_loader::image_type_options(), vec!["jpeg", "png"]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    use config_loader::{ConfigLoader, ResourceConfig};
    use contracts::{Camera, ContractError, Dependencies, ImageEncoding, MediaStream, Resource};
    use fake_camera::{ExitHook, FakeCamera, LARGE_POINT_COUNT, SMALL_POINT_COUNT};
    use resource_factory::{fake_camera_module, Module, ResourceFactoryError};
    use serde_json::json;

    const GREEN_JPEG_SMALL: &str = r#"
name = "clock"
model = "ncs:camera:nickcam"

[attributes]
big = false
color = "green"
image_type = "jpeg"
"#;

    fn recording_hook() -> (ExitHook, Arc<AtomicI32>) {
        let code = Arc::new(AtomicI32::new(0));
        let recorded = Arc::clone(&code);
        let hook: ExitHook = Arc::new(move |c| recorded.store(c, Ordering::SeqCst));
        (hook, code)
    }

    fn module() -> Module<FakeCamera> {
        let (hook, _) = recording_hook();
        fake_camera_module(hook).unwrap()
    }

    fn config(name: &str, big: bool, color: &str, image_type: &str) -> ResourceConfig {
        ResourceConfig {
            name: name.into(),
            api: fake_camera::api(),
            model: fake_camera::model(),
            attributes: json!({"big": big, "color": color, "image_type": image_type}),
        }
    }

    /// Config file -> ConfigLoader -> Module -> FakeCamera
    ///
    /// The green/jpeg/small scenario: properties, one jpeg, the small cloud.
    #[tokio::test]
    async fn test_e2e_config_file_to_camera() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(GREEN_JPEG_SMALL.as_bytes()).unwrap();
        let config = ConfigLoader::load_from_path(file.path()).unwrap();

        let mut module = module();
        let camera = module.add_resource(&config, &Dependencies::new()).unwrap();

        assert!(camera.properties().supports_pcd);

        let (image, _) = camera.image().await.unwrap();
        assert_eq!(image.encoding, ImageEncoding::Jpeg);
        assert_eq!((image.width, image.height), (640, 480));
        assert_eq!(
            image::guess_format(&image.data).unwrap(),
            image::ImageFormat::Jpeg
        );

        let cloud = camera.next_point_cloud().await.unwrap();
        assert_eq!(cloud.len(), SMALL_POINT_COUNT);

        module.run_until(async {}).await.unwrap();
    }

    #[test]
    fn test_every_valid_combination_validates() {
        let module = module();
        for big in [false, true] {
            for color in config_loader::color_options() {
                for image_type in config_loader::image_type_options() {
                    let config = config("cam", big, color, image_type);
                    assert!(ConfigLoader::validate(&config).is_ok());
                    assert!(module.validate(&config).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_invalid_values_list_sorted_options() {
        let module = module();

        let err = module
            .validate(&config("cam", false, "purple", "png"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("valid colors: blue, green, red, white"), "got: {err}");

        let err = module
            .validate(&config("cam", false, "red", "gif"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("valid image types: jpeg, png"), "got: {err}");
    }

    #[tokio::test]
    async fn test_big_camera_end_to_end() {
        let mut module = module();
        let camera = module
            .add_resource(&config("big", true, "white", "png"), &Dependencies::new())
            .unwrap();

        let (image, _) = camera.image().await.unwrap();
        assert_eq!((image.width, image.height), (1920, 1080));
        assert_eq!(camera.next_point_cloud().await.unwrap().len(), LARGE_POINT_COUNT);
    }

    #[tokio::test]
    async fn test_images_batch_through_module() {
        let mut module = module();
        let camera = module
            .add_resource(&config("batch", false, "red", "png"), &Dependencies::new())
            .unwrap();

        let (images, metadata) = camera.images().await.unwrap();
        assert_eq!(images.len(), 2);
        assert_ne!(images[0].source_name, images[1].source_name);
        assert!(images.iter().all(|i| i.source_name.ends_with(".png")));

        let first = images[0].source_name.trim_end_matches(".png");
        let first = chrono::DateTime::parse_from_rfc3339(first).unwrap();
        assert!(metadata.captured_at > first);
    }

    #[tokio::test]
    async fn test_projector_unimplemented_for_every_config() {
        let mut module = module();
        for (i, big) in [false, true].into_iter().enumerate() {
            let camera = module
                .add_resource(
                    &config(&format!("cam{i}"), big, "blue", "jpeg"),
                    &Dependencies::new(),
                )
                .unwrap();
            assert!(matches!(
                camera.projector().await.unwrap_err(),
                ContractError::Unimplemented { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_reconfigure_rebuilds_camera() {
        let mut module = module();
        let first = module
            .add_resource(&config("cam", false, "red", "png"), &Dependencies::new())
            .unwrap();
        let rebuilt = module
            .reconfigure(&config("cam", true, "red", "jpeg"), &Dependencies::new())
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &rebuilt));
        let (image, _) = rebuilt.image().await.unwrap();
        assert_eq!(image.encoding, ImageEncoding::Jpeg);
        assert_eq!((image.width, image.height), (1920, 1080));
    }

    #[tokio::test]
    async fn test_invalid_reconfigure_keeps_old_camera() {
        let mut module = module();
        let first = module
            .add_resource(&config("cam", false, "red", "png"), &Dependencies::new())
            .unwrap();

        let result = module.reconfigure(&config("cam", false, "teal", "png"), &Dependencies::new());
        assert!(matches!(result, Err(ResourceFactoryError::Contract(_))));

        let still = module.resource(first.name()).unwrap();
        assert!(Arc::ptr_eq(&first, &still));
    }

    #[tokio::test]
    async fn test_crash_command_through_module() {
        let (hook, code) = recording_hook();
        let mut module = fake_camera_module(hook).unwrap();
        let camera = module
            .add_resource(&config("cam", false, "green", "png"), &Dependencies::new())
            .unwrap();

        let mut command = serde_json::Map::new();
        command.insert(fake_camera::CRASH_COMMAND.into(), json!(true));
        assert!(matches!(
            camera.do_command(command).await,
            Err(ContractError::DebugTrigger)
        ));
        assert_eq!(code.load(Ordering::SeqCst), fake_camera::CRASH_EXIT_CODE);
    }

    /// Direct calls and stream reads serialize on one lock
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_capture_is_serialized() {
        let mut module = module();
        let camera = module
            .add_resource(&config("cam", false, "white", "png"), &Dependencies::new())
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let camera = Arc::clone(&camera);
            handles.push(tokio::spawn(async move {
                let mut stream = camera.stream().await.unwrap();
                stream.next().await.unwrap();
                camera.image().await.unwrap();
                camera.images().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(camera.frames_served().await, 16);
    }
}
