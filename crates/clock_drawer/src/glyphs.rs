//! Bitmap text using the 8x8 basic Latin font

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

/// Glyph cell size before scaling
pub const GLYPH_SIZE: u32 = 8;

/// Width in pixels of `text` at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Draw `text` with its top-left corner at (`x`, `y`)
///
/// Characters outside the basic Latin block render as '?'. Pixels past the
/// canvas edge are dropped.
pub fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as u32 * GLYPH_SIZE * scale;
        if origin_x >= width {
            break;
        }
        let Some(rows) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as u32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let (cx, cy) = (px + sx, py + sy);
                        if cx < width && cy < height {
                            canvas.put_pixel(cx, cy, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(canvas: &RgbImage, color: Rgb<u8>) -> usize {
        canvas.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut canvas = RgbImage::new(16, 16);
        draw_text(&mut canvas, "  ", 0, 0, 1, Rgb([255, 255, 255]));
        assert_eq!(lit(&canvas, Rgb([255, 255, 255])), 0);
    }

    #[test]
    fn test_scale_multiplies_lit_pixels() {
        let color = Rgb([0, 255, 0]);
        let mut small = RgbImage::new(64, 64);
        let mut large = RgbImage::new(64, 64);
        draw_text(&mut small, "8", 0, 0, 1, color);
        draw_text(&mut large, "8", 0, 0, 3, color);
        assert!(lit(&small, color) > 0);
        assert_eq!(lit(&large, color), lit(&small, color) * 9);
    }

    #[test]
    fn test_text_is_clipped() {
        let mut canvas = RgbImage::new(10, 4);
        draw_text(&mut canvas, "HELLO WORLD", 0, 0, 2, Rgb([1, 2, 3]));
        assert_eq!(canvas.dimensions(), (10, 4));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("12:00", 1), 40);
        assert_eq!(text_width("12:00", 3), 120);
    }
}
