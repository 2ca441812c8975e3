//! User-facing download events

use crate::core::channel::ChannelReport;
use crate::core::progress::{NoProgress, ProgressRenderer};
use crate::core::video_info::Video;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

/// Receiver of the messages a download shows the user.
///
/// Every event defaults to doing nothing.
pub trait Reporter: ProgressRenderer {
    /// Status line, e.g. the number of videos found
    fn notice(&self, _message: &str) {}

    /// Numbered list of the videos a channel selection picks from
    fn video_list(&self, _videos: &[Video]) {}

    fn download_complete(&self, _path: &Path, _elapsed: Duration) {}

    /// A video of a batch failed; the batch continues
    fn item_failed(&self, _title: &str, _error: &(dyn Error + 'static)) {}

    fn channel_summary(&self, _report: &ChannelReport) {}
}

impl Reporter for NoProgress {}
