//! # Clock Drawer
//!
//! Renders a clock face and a caller supplied text line into an encoded image.
//!
//! The drawer never reads the clock itself: the caller embeds the time in the
//! text, and the hands follow the last RFC 3339 timestamp found there. Every
//! call allocates a fresh canvas.
//!
//! # Example
//!
//! ```no_run
//! use clock_drawer::ClockDrawer;
//! use contracts::ImageEncoding;
//!
//! let drawer = ClockDrawer::new("cam", [255, 0, 0, 255], ImageEncoding::Png, false);
//! let image = drawer.image("image time: 2024-01-01T12:00:00Z").unwrap();
//! assert_eq!((image.width, image.height), drawer.dimensions());
//! ```

mod dial;
mod glyphs;

pub use dial::{ClockHands, Dial};
pub use glyphs::{draw_text, text_width, GLYPH_SIZE};

use std::io::Cursor;

use bytes::Bytes;
use contracts::{ContractError, EncodedImage, ImageEncoding};
use image::{Rgb, RgbImage};
use tracing::trace;

/// Canvas size without the `big` flag
pub const SMALL_CANVAS: (u32, u32) = (640, 480);

/// Canvas size with the `big` flag
pub const BIG_CANVAS: (u32, u32) = (1920, 1080);

const BACKGROUND: Rgb<u8> = Rgb([16, 16, 16]);

/// Canvas size selected by the `big` flag
pub fn canvas_size(big: bool) -> (u32, u32) {
    if big {
        BIG_CANVAS
    } else {
        SMALL_CANVAS
    }
}

/// Clock image renderer
///
/// Immutable after construction; safe to share between callers.
#[derive(Debug, Clone)]
pub struct ClockDrawer {
    label: String,
    color: Rgb<u8>,
    encoding: ImageEncoding,
    big: bool,
}

impl ClockDrawer {
    /// Create a drawer
    ///
    /// `color` is RGBA; the canvas is opaque so alpha is ignored.
    pub fn new(
        label: impl Into<String>,
        color: [u8; 4],
        encoding: ImageEncoding,
        big: bool,
    ) -> Self {
        let [r, g, b, _] = color;
        Self {
            label: label.into(),
            color: Rgb([r, g, b]),
            encoding,
            big,
        }
    }

    /// Label drawn at the top of every image
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    /// File extension of the configured encoding
    pub fn extension(&self) -> &'static str {
        self.encoding.extension()
    }

    /// Canvas dimensions, fixed for the drawer's lifetime
    pub fn dimensions(&self) -> (u32, u32) {
        canvas_size(self.big)
    }

    fn scale(&self) -> u32 {
        if self.big {
            3
        } else {
            1
        }
    }

    /// Left edge of the label, centered when it fits between the margins
    fn label_x(&self, width: u32, margin: u32) -> u32 {
        let label_width = text_width(&self.label, self.scale());
        if label_width + 2 * margin > width {
            margin
        } else {
            (width - label_width) / 2
        }
    }

    /// Render one image with the label centered on top and `text` along the
    /// bottom edge
    pub fn image(&self, text: &str) -> Result<EncodedImage, ContractError> {
        let (width, height) = self.dimensions();
        let scale = self.scale();
        let margin = GLYPH_SIZE * scale;

        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

        Dial::fit(width, height, 2 * scale).draw(
            &mut canvas,
            ClockHands::from_text(text),
            self.color,
        );
        let label_x = self.label_x(width, margin);
        draw_text(&mut canvas, &self.label, label_x, margin, scale, self.color);
        draw_text(
            &mut canvas,
            text,
            margin,
            height - margin - GLYPH_SIZE * scale,
            scale,
            self.color,
        );

        let data = self.encode(&canvas)?;
        trace!(
            label = %self.label,
            encoding = %self.encoding,
            bytes = data.len(),
            "clock image rendered"
        );

        Ok(EncodedImage {
            width,
            height,
            encoding: self.encoding,
            data,
        })
    }

    fn encode(&self, canvas: &RgbImage) -> Result<Bytes, ContractError> {
        let format = match self.encoding {
            ImageEncoding::Jpeg => image::ImageFormat::Jpeg,
            ImageEncoding::Png => image::ImageFormat::Png,
        };
        let mut buffer = Cursor::new(Vec::new());
        canvas
            .write_to(&mut buffer, format)
            .map_err(|e| ContractError::encoding(self.encoding.to_string(), e.to_string()))?;
        Ok(Bytes::from(buffer.into_inner()))
    }
}
