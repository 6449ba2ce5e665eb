//! Clock camera attributes and the lookup tables they are checked against

use std::collections::BTreeMap;
use std::sync::LazyLock;

use contracts::{AttributeConfig, ContractError, ImageEncoding};
use serde::{Deserialize, Serialize};

/// Color name -> RGBA. Ordered so option lists come out sorted.
static COLORS: LazyLock<BTreeMap<&'static str, [u8; 4]>> = LazyLock::new(|| {
    BTreeMap::from([
        ("white", [255, 255, 255, 255]),
        ("red", [255, 0, 0, 255]),
        ("green", [0, 255, 0, 255]),
        ("blue", [0, 0, 255, 255]),
    ])
});

static IMAGE_TYPES: LazyLock<BTreeMap<&'static str, ImageEncoding>> = LazyLock::new(|| {
    BTreeMap::from([("jpeg", ImageEncoding::Jpeg), ("png", ImageEncoding::Png)])
});

/// Look up a color by name
pub fn color_rgba(name: &str) -> Option<[u8; 4]> {
    COLORS.get(name).copied()
}

/// Look up an image type by name
pub fn image_encoding(name: &str) -> Option<ImageEncoding> {
    IMAGE_TYPES.get(name).copied()
}

/// Valid color names, sorted
pub fn color_options() -> Vec<&'static str> {
    COLORS.keys().copied().collect()
}

/// Valid image type names, sorted
pub fn image_type_options() -> Vec<&'static str> {
    IMAGE_TYPES.keys().copied().collect()
}

/// Attributes of the clock camera model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Large canvas and large point cloud
    #[serde(default)]
    pub big: bool,

    /// Foreground color name
    #[serde(default)]
    pub color: String,

    /// Output encoding name
    #[serde(default)]
    pub image_type: String,
}

impl CameraConfig {
    pub fn new(big: bool, color: impl Into<String>, image_type: impl Into<String>) -> Self {
        Self {
            big,
            color: color.into(),
            image_type: image_type.into(),
        }
    }

    /// RGBA of the configured color
    pub fn rgba(&self) -> Result<[u8; 4], ContractError> {
        color_rgba(&self.color).ok_or_else(|| {
            ContractError::config_validation(
                "color",
                format!(
                    "config color {} invalid, valid colors: {}",
                    self.color,
                    color_options().join(", ")
                ),
            )
        })
    }

    /// Encoding of the configured image type
    pub fn encoding(&self) -> Result<ImageEncoding, ContractError> {
        image_encoding(&self.image_type).ok_or_else(|| {
            ContractError::config_validation(
                "image_type",
                format!(
                    "config image_type {} invalid, valid image types: {}",
                    self.image_type,
                    image_type_options().join(", ")
                ),
            )
        })
    }
}

impl AttributeConfig for CameraConfig {
    fn validate(&self, path: &str) -> Result<Vec<String>, ContractError> {
        let prefix = |field: &str| {
            if path.is_empty() {
                field.to_string()
            } else {
                format!("{path}.{field}")
            }
        };

        // `big` accepts any value
        self.rgba().map_err(|e| match e {
            ContractError::ConfigValidation { message, .. } => {
                ContractError::config_validation(prefix("color"), message)
            }
            other => other,
        })?;
        self.encoding().map_err(|e| match e {
            ContractError::ConfigValidation { message, .. } => {
                ContractError::config_validation(prefix("image_type"), message)
            }
            other => other,
        })?;

        Ok(Vec::new())
    }
}
