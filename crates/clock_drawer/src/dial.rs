//! Clock dial: ring, hour ticks and hands

use std::f64::consts::TAU;

use chrono::{DateTime, FixedOffset, Timelike};
use image::{Rgb, RgbImage};

/// Hand angles in radians, clockwise from twelve
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClockHands {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl ClockHands {
    /// Hands for the last RFC 3339 timestamp in `text`, or twelve o'clock
    pub fn from_text(text: &str) -> Self {
        text.split_whitespace()
            .rev()
            .find_map(|token| DateTime::parse_from_rfc3339(token).ok())
            .map(|time| Self::at(&time))
            .unwrap_or_default()
    }

    fn at(time: &DateTime<FixedOffset>) -> Self {
        let seconds = f64::from(time.second()) + f64::from(time.nanosecond()) / 1e9;
        let minutes = f64::from(time.minute()) + seconds / 60.0;
        let hours = f64::from(time.hour() % 12) + minutes / 60.0;
        Self {
            hour: hours / 12.0 * TAU,
            minute: minutes / 60.0 * TAU,
            second: seconds / 60.0 * TAU,
        }
    }
}

/// Dial geometry on a canvas
#[derive(Debug, Clone, Copy)]
pub struct Dial {
    pub center: (f64, f64),
    pub radius: f64,
    pub stroke: u32,
}

impl Dial {
    /// Dial centered on the canvas, leaving room for a text line above and below
    pub fn fit(width: u32, height: u32, stroke: u32) -> Self {
        let radius = f64::from(width.min(height)) * 0.35;
        Self {
            center: (f64::from(width) / 2.0, f64::from(height) / 2.0),
            radius,
            stroke,
        }
    }

    pub fn draw(&self, canvas: &mut RgbImage, hands: ClockHands, color: Rgb<u8>) {
        self.draw_ring(canvas, color);

        for hour in 0..12 {
            let angle = f64::from(hour) / 12.0 * TAU;
            let from = self.polar(angle, self.radius * 0.85);
            let to = self.polar(angle, self.radius);
            draw_line(canvas, from, to, self.stroke, color);
        }

        let center = self.center;
        draw_line(
            canvas,
            center,
            self.polar(hands.hour, self.radius * 0.5),
            self.stroke * 2,
            color,
        );
        draw_line(
            canvas,
            center,
            self.polar(hands.minute, self.radius * 0.75),
            self.stroke,
            color,
        );
        draw_line(
            canvas,
            center,
            self.polar(hands.second, self.radius * 0.9),
            (self.stroke / 2).max(1),
            color,
        );
    }

    fn polar(&self, angle: f64, length: f64) -> (f64, f64) {
        (
            self.center.0 + length * angle.sin(),
            self.center.1 - length * angle.cos(),
        )
    }

    fn draw_ring(&self, canvas: &mut RgbImage, color: Rgb<u8>) {
        let (cx, cy) = self.center;
        let outer = self.radius;
        let inner = (self.radius - f64::from(self.stroke)).max(0.0);
        let (width, height) = canvas.dimensions();

        let x_min = (cx - outer).floor().max(0.0) as u32;
        let y_min = (cy - outer).floor().max(0.0) as u32;
        let x_max = ((cx + outer).ceil() as u32).min(width);
        let y_max = ((cy + outer).ceil() as u32).min(height);

        for y in y_min..y_max {
            for x in x_min..x_max {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance >= inner && distance <= outer {
                    canvas.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Thick line by stamping squares along the segment; clipped to the canvas
fn draw_line(
    canvas: &mut RgbImage,
    from: (f64, f64),
    to: (f64, f64),
    thickness: u32,
    color: Rgb<u8>,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    let half = f64::from(thickness) / 2.0;

    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let x = from.0 + dx * t - half;
        let y = from.1 + dy * t - half;
        fill_square(canvas, x, y, thickness, color);
    }
}

fn fill_square(canvas: &mut RgbImage, x: f64, y: f64, size: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let x0 = x.round();
    let y0 = y.round();
    for oy in 0..size {
        for ox in 0..size {
            let px = x0 + f64::from(ox);
            let py = y0 + f64::from(oy);
            if px >= 0.0 && py >= 0.0 && (px as u32) < width && (py as u32) < height {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_hands_without_timestamp_point_at_twelve() {
        assert_eq!(ClockHands::from_text("no time here"), ClockHands::default());
    }

    #[test]
    fn test_hands_follow_last_timestamp() {
        let hands = ClockHands::from_text(
            "image time: 2024-01-01T00:00:00Z 2024-01-01T03:15:30.5+00:00",
        );
        assert!((hands.second - (30.5 / 60.0) * TAU).abs() < EPS);
        assert!((hands.minute - ((15.0 + 30.5 / 60.0) / 60.0) * TAU).abs() < EPS);
        assert!(hands.hour > TAU / 4.0 && hands.hour < TAU / 3.0);
    }

    #[test]
    fn test_afternoon_wraps_to_twelve_hours() {
        let morning = ClockHands::from_text("2024-01-01T03:00:00Z");
        let afternoon = ClockHands::from_text("2024-01-01T15:00:00Z");
        assert!((morning.hour - afternoon.hour).abs() < EPS);
    }

    #[test]
    fn test_dial_draws_inside_canvas() {
        let mut canvas = RgbImage::new(64, 48);
        let color = Rgb([255, 0, 0]);
        Dial::fit(64, 48, 2).draw(&mut canvas, ClockHands::default(), color);
        assert!(canvas.pixels().any(|p| *p == color));
        // Twelve o'clock hand runs straight up from the center
        assert_eq!(*canvas.get_pixel(32, 20), color);
    }
}
