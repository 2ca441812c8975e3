//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::channel::ChannelReport;
use crate::core::progress::{truncate_label, ProgressRenderer, ProgressState};
use crate::core::reporter::Reporter;
use crate::core::video_info::Video;
use colored::Colorize;
use dialoguer::console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Preferred width of the progress bar
const BAR_LENGTH: usize = 50;

/// Columns taken by everything on the progress line except bar and label
const LINE_OVERHEAD: usize = 30;

/// Output formatter for tubedl
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    show_progress: bool,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_progress: true,
            progress_bar: Mutex::new(None),
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_enabled(&self) -> bool {
        self.show_progress && self.verbosity != VerbosityLevel::Quiet
    }

    fn is_quiet(&self) -> bool {
        self.verbosity == VerbosityLevel::Quiet
    }

    /// Create a progress bar for one transfer
    fn create_progress_bar(&self, state: &ProgressState) -> ProgressBar {
        let (bar_length, label_length) = line_layout(terminal_width());
        let prefix = format!(
            "[{}/{}] Downloading: {}",
            state.item_index,
            state.item_count,
            truncate_label(&state.label, label_length)
        );

        let progress_bar = match state.total_bytes.filter(|&total| total > 0) {
            Some(total) => {
                let template = format!("{{prefix}} [{{bar:{}}}] {{msg}}", bar_length);
                let progress_bar = ProgressBar::new(total);
                match ProgressStyle::with_template(&template) {
                    Ok(style) => progress_bar.set_style(style.progress_chars("#-")),
                    Err(e) => debug!("Invalid progress template: {}", e),
                }
                progress_bar
            }
            None => {
                let progress_bar = ProgressBar::new_spinner();
                match ProgressStyle::with_template("{prefix} {spinner:.green} {msg}") {
                    Ok(style) => progress_bar.set_style(style),
                    Err(e) => debug!("Invalid spinner template: {}", e),
                }
                progress_bar.enable_steady_tick(Duration::from_millis(120));
                progress_bar
            }
        };

        progress_bar.set_prefix(prefix);
        progress_bar
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if !self.is_quiet() {
            println!("{}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if !self.is_quiet() {
            println!("{}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("{}", message.yellow());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    /// Print the numbered video list shown before a channel selection
    pub fn print_video_list(&self, videos: &[Video]) {
        println!("\nAvailable videos:");
        for (i, video) in videos.iter().enumerate() {
            println!("{}. {}", i + 1, video.title);
        }
        println!("\nSelect videos to download:");
        println!("Examples: '1-12', '1,3,5', '1 3 5', or press Enter for all");
    }

    /// Print download complete message
    pub fn print_download_complete(&self, output_path: &Path, duration: Duration) {
        self.success(&format!(
            "Downloaded {} in {}",
            output_path.display(),
            format_duration(duration)
        ));
    }

    /// Print a failed item of a batch
    pub fn print_item_failed(&self, title: &str, error: &(dyn std::error::Error + 'static)) {
        eprintln!("\n{} {} - {}", "Failed:".red(), title, error_chain(error));
    }

    /// Print the outcome of a channel download
    pub fn print_channel_summary(&self, report: &ChannelReport) {
        if self.is_quiet() && report.failed.is_empty() {
            return;
        }

        let line = format!(
            "\nDownload complete! {}/{} videos successful",
            report.successful(),
            report.selected
        );
        if report.failed.is_empty() {
            println!("{}", line.green());
        } else {
            println!("{}", line.yellow());
            println!("Failed downloads:");
            for title in &report.failed {
                println!("  - {}", title);
            }
        }
    }
}

impl ProgressRenderer for OutputFormatter {
    fn render(&self, state: &ProgressState) {
        if !self.progress_enabled() {
            return;
        }

        let mut slot = match self.progress_bar.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        let progress_bar = slot.get_or_insert_with(|| self.create_progress_bar(state));

        if let Some(total) = state.total_bytes.filter(|&total| total > 0) {
            progress_bar.set_length(total);
        }
        progress_bar.set_position(state.bytes_written);
        progress_bar.set_message(state.stats_string());
    }

    fn finish(&self) {
        let mut slot = match self.progress_bar.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(progress_bar) = slot.take() {
            progress_bar.finish();
        }
    }
}

impl Reporter for OutputFormatter {
    fn notice(&self, message: &str) {
        self.info(message);
    }

    fn video_list(&self, videos: &[Video]) {
        self.print_video_list(videos);
    }

    fn download_complete(&self, path: &Path, elapsed: Duration) {
        self.print_download_complete(path, elapsed);
    }

    fn item_failed(&self, title: &str, error: &(dyn std::error::Error + 'static)) {
        self.print_item_failed(title, error);
    }

    fn channel_summary(&self, report: &ChannelReport) {
        self.print_channel_summary(report);
    }
}

/// Bar length and label width for a terminal `width` columns wide
fn line_layout(width: usize) -> (usize, usize) {
    let bar_length = BAR_LENGTH.min(width.saturating_sub(LINE_OVERHEAD)).max(10);
    let label_length = width
        .saturating_sub(bar_length + LINE_OVERHEAD)
        .max(10);
    (bar_length, label_length)
}

fn terminal_width() -> usize {
    let (_rows, cols) = Term::stdout().size();
    usize::from(cols)
}

/// `error` followed by each of its causes, separated by `: `
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Format duration as human-readable string
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, seconds)
        }
    } else {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, DownloadError};

    #[test]
    fn test_output_formatter_creation() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert_eq!(formatter.verbosity, VerbosityLevel::Normal);
        assert!(formatter.progress_enabled());
        assert!(formatter.progress_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_progress_disabled() {
        assert!(!OutputFormatter::new(VerbosityLevel::Quiet).progress_enabled());
        assert!(!OutputFormatter::new(VerbosityLevel::Normal)
            .with_progress(false)
            .progress_enabled());
    }

    #[test]
    fn test_quiet_render_creates_no_bar() {
        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        let mut state = ProgressState::new(Some(100), "clip.mp4", 1, 1);
        state.bytes_written = 50;

        formatter.render(&state);
        assert!(formatter.progress_bar.lock().unwrap().is_none());
        formatter.finish();
    }

    #[test]
    fn test_render_then_finish_clears_bar() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        let mut state = ProgressState::new(None, "clip.mp4", 2, 3);
        state.bytes_written = 4096;

        formatter.render(&state);
        assert!(formatter.progress_bar.lock().unwrap().is_some());
        formatter.finish();
        assert!(formatter.progress_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_line_layout() {
        assert_eq!(line_layout(200), (50, 120));
        assert_eq!(line_layout(60), (30, 10));
        assert_eq!(line_layout(20), (10, 10));
        assert_eq!(line_layout(0), (10, 10));
    }

    #[test]
    fn test_error_chain() {
        let error = DownloadError::GetVideoVariants(ApiError::NoVariantsFound);
        assert_eq!(
            error_chain(&error),
            "failed to get video variants: no video variants found"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1h 1m");
    }
}
