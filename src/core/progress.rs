//! Progress tracking for downloads

use std::fmt;
use std::time::{Duration, Instant};

/// Bytes per second in one megabit per second
const BYTES_PER_MEGABIT: f64 = 125_000.0;

/// Bytes in one (decimal) megabyte
const BYTES_PER_MB: f64 = 1_000_000.0;

/// Progress of one file transfer
#[derive(Debug, Clone)]
pub struct ProgressState {
    /// Number of bytes written to the sink so far
    pub bytes_written: u64,
    /// Content length announced by the server, if any
    pub total_bytes: Option<u64>,
    /// Time when the transfer started
    pub start_time: Instant,
    /// 1-based position of this transfer in its batch
    pub item_index: usize,
    /// Size of the batch
    pub item_count: usize,
    /// Name shown next to the bar
    pub label: String,
}

impl ProgressState {
    /// Create a new progress tracker starting now
    pub fn new(
        total_bytes: Option<u64>,
        label: impl Into<String>,
        item_index: usize,
        item_count: usize,
    ) -> Self {
        Self {
            bytes_written: 0,
            total_bytes,
            start_time: Instant::now(),
            item_index,
            item_count,
            label: label.into(),
        }
    }

    /// Time since the transfer started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Completion in percent, clamped to `0..=100`.
    ///
    /// `None` when the total is unknown or zero.
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                Some((self.bytes_written as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
            }
            _ => None,
        }
    }

    /// Average speed in megabits per second; 0 before any time has elapsed
    pub fn speed_mbps(&self) -> f64 {
        speed_mbps(self.bytes_written, self.elapsed())
    }

    /// Bytes written in MB
    pub fn written_mb(&self) -> f64 {
        self.bytes_written as f64 / BYTES_PER_MB
    }

    /// Total size in MB, if known
    pub fn total_mb(&self) -> Option<f64> {
        self.total_bytes.map(|total| total as f64 / BYTES_PER_MB)
    }

    /// Fixed-width text bar of `#` and `-`
    pub fn render_bar(&self, length: usize) -> String {
        let filled = self
            .percent()
            .map(|p| ((length as f64) * p / 100.0) as usize)
            .unwrap_or(0)
            .min(length);
        format!("{}{}", "#".repeat(filled), "-".repeat(length - filled))
    }

    /// Byte counts and speed, e.g. `[12MB/40MB] (35 Mb/s)`
    pub fn stats_string(&self) -> String {
        let total = self
            .total_mb()
            .map(|mb| format!("{:.0}MB", mb))
            .unwrap_or_else(|| "?".to_string());
        format!(
            "[{:.0}MB/{}] ({:.0} Mb/s)",
            self.written_mb(),
            total,
            self.speed_mbps()
        )
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] Downloading: {} [{}] {}",
            self.item_index,
            self.item_count,
            self.label,
            self.render_bar(20),
            self.stats_string()
        )
    }
}

/// Speed of `bytes` transferred in `elapsed`, in megabits per second
pub fn speed_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / secs / BYTES_PER_MEGABIT
    } else {
        0.0
    }
}

/// Shorten `label` to at most `max` characters, marking the cut with `...`
pub fn truncate_label(label: &str, max: usize) -> String {
    const SUFFIX: &str = "...";

    if label.chars().count() <= max {
        return label.to_string();
    }
    let keep = max.saturating_sub(SUFFIX.len());
    let mut short: String = label.chars().take(keep).collect();
    short.push_str(SUFFIX);
    short
}

/// Consumer of progress updates
pub trait ProgressRenderer {
    /// Show the current state of a transfer
    fn render(&self, state: &ProgressState);

    /// The transfer ended, successfully or not
    fn finish(&self) {}
}

/// Renderer that drops every update
pub struct NoProgress;

impl ProgressRenderer for NoProgress {
    fn render(&self, _state: &ProgressState) {}
}
