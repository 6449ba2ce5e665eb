//! Camera payloads
//!
//! Encoded images and point clouds handed to the host.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Encoded image returned by a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Image width
    pub width: u32,

    /// Image height
    pub height: u32,

    /// Encoding of `data`
    pub encoding: ImageEncoding,

    /// Encoded bytes (zero-copy)
    pub data: Bytes,
}

/// Image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEncoding {
    Jpeg,
    Png,
}

impl ImageEncoding {
    /// File extension, also the config name of the encoding
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// MIME type
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Image tagged with the name of its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedImage {
    pub image: EncodedImage,

    /// `<timestamp>.<extension>`
    pub source_name: String,
}

/// Metadata attached to a camera response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Capture time
    pub captured_at: DateTime<Utc>,
}

/// Point cloud
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<Point>,
}

impl PointCloud {
    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Single point, with an optional RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Vector3,
    pub color: Option<[u8; 3]>,
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_names() {
        assert_eq!(ImageEncoding::Jpeg.extension(), "jpeg");
        assert_eq!(ImageEncoding::Png.mime_type(), "image/png");
        assert_eq!(ImageEncoding::Png.to_string(), "png");
    }

    #[test]
    fn test_encoding_serde_is_snake_case() {
        let json = serde_json::to_string(&ImageEncoding::Jpeg).unwrap();
        assert_eq!(json, "\"jpeg\"");
    }
}
