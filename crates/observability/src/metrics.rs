//! Camera metrics
//!
//! Prometheus counters for every capability call, plus an in-memory
//! aggregator used to summarize capture runs.

use metrics::{counter, gauge, histogram};

/// Record one rendered image
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_image_rendered;
///
/// let started = std::time::Instant::now();
/// let image = drawer.image(&label)?;
/// record_image_rendered("jpeg", image.data.len(), started.elapsed().as_secs_f64() * 1000.0);
/// ```
pub fn record_image_rendered(encoding: &str, bytes: usize, render_ms: f64) {
    counter!(
        "fakecam_images_rendered_total",
        "encoding" => encoding.to_string()
    )
    .increment(1);

    histogram!("fakecam_image_bytes", "encoding" => encoding.to_string()).record(bytes as f64);
    histogram!("fakecam_render_latency_ms").record(render_ms);
}

/// Record a served point cloud
pub fn record_point_cloud_served(points: usize) {
    counter!("fakecam_point_clouds_served_total").increment(1);
    gauge!("fakecam_last_point_cloud_points").set(points as f64);
}

/// Record a generic command
pub fn record_command(crash_trigger: bool) {
    let kind = if crash_trigger { "crash" } else { "noop" };
    counter!("fakecam_commands_total", "kind" => kind.to_string()).increment(1);
}

/// Record an opened stream
pub fn record_stream_opened() {
    counter!("fakecam_streams_opened_total").increment(1);
}

/// Capture run aggregator
///
/// Aggregates in memory so a summary can be printed at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Images written
    pub images: u64,

    /// Point clouds written
    pub point_clouds: u64,

    /// Encoded size statistics (bytes)
    pub image_bytes: RunningStats,

    /// Render latency statistics (ms)
    pub render_ms: RunningStats,
}

impl CaptureStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one rendered image
    pub fn push_image(&mut self, bytes: usize, render_ms: f64) {
        self.images += 1;
        self.image_bytes.push(bytes as f64);
        self.render_ms.push(render_ms);
    }

    pub fn push_point_cloud(&mut self) {
        self.point_clouds += 1;
    }

    /// Summary report
    pub fn summary(&self) -> CaptureSummary {
        CaptureSummary {
            images: self.images,
            point_clouds: self.point_clouds,
            image_bytes: StatsSummary::from(&self.image_bytes),
            render_ms: StatsSummary::from(&self.render_ms),
        }
    }
}

/// Capture summary
#[derive(Debug, Clone, Default)]
pub struct CaptureSummary {
    pub images: u64,
    pub point_clouds: u64,
    pub image_bytes: StatsSummary,
    pub render_ms: StatsSummary,
}

impl std::fmt::Display for CaptureSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capture Summary ===")?;
        writeln!(f, "Images: {}", self.images)?;
        writeln!(f, "Point clouds: {}", self.point_clouds)?;
        writeln!(f, "Image size (bytes): {}", self.image_bytes)?;
        writeln!(f, "Render latency (ms): {}", self.render_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_capture_stats() {
        let mut stats = CaptureStats::new();
        stats.push_image(1000, 2.0);
        stats.push_image(3000, 4.0);
        stats.push_point_cloud();

        let summary = stats.summary();
        assert_eq!(summary.images, 2);
        assert_eq!(summary.point_clouds, 1);
        assert!((summary.image_bytes.mean - 2000.0).abs() < 1e-10);
        assert!((summary.render_ms.max - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let summary = CaptureSummary {
            images: 10,
            point_clouds: 1,
            image_bytes: StatsSummary {
                count: 10,
                min: 900.0,
                max: 1100.0,
                mean: 1000.0,
                std_dev: 50.0,
            },
            render_ms: StatsSummary::default(),
        };

        let output = format!("{}", summary);
        assert!(output.contains("Images: 10"));
        assert!(output.contains("mean=1000.000"));
        assert!(output.contains("Render latency (ms): N/A"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_image_rendered("png", 10, 1.0);
        record_point_cloud_served(125);
        record_command(false);
        record_stream_opened();
    }
}
