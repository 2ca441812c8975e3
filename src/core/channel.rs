//! Channel downloads

use crate::core::downloader::{DownloadConfig, Downloader};
use crate::core::selection::{parse_selection, select_all};
use crate::core::video_info::{Video, VideoVariant};
use crate::error::DownloadError;
use crate::utils::filename::{compute_filename, folder_name, unique_path};
use crate::utils::fs::{check_existing, create_channel_folder};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of a channel batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelReport {
    /// Number of videos the user selected
    pub selected: usize,
    /// Selected videos left alone because their file already existed
    pub skipped: usize,
    /// Titles of the videos that could not be downloaded
    pub failed: Vec<String>,
}

impl ChannelReport {
    pub fn successful(&self) -> usize {
        self.selected.saturating_sub(self.failed.len())
    }
}

/// A selected video whose destination has been settled
struct PlannedVideo<'a> {
    video: &'a Video,
    variant: VideoVariant,
    path: PathBuf,
    /// An existing file at `path` was already cleared for replacement
    replaces: bool,
}

impl Downloader {
    /// Download the videos of a channel the user selects.
    ///
    /// Failures of individual videos are collected in the report; only
    /// failures before the first video is attempted are returned as errors.
    pub async fn download_channel(
        &self,
        channel_id: &str,
        config: &DownloadConfig,
    ) -> Result<ChannelReport, DownloadError> {
        info!("Downloading channel {}", channel_id);

        let channel = self
            .client
            .get_channel_info(channel_id)
            .await
            .map_err(DownloadError::GetChannelInfo)?;
        let videos = self
            .client
            .get_channel_videos(channel_id)
            .await
            .map_err(DownloadError::GetChannelVideos)?;

        let mut report = ChannelReport::default();
        if videos.is_empty() {
            self.output.notice("No videos found in this channel");
            return Ok(report);
        }
        self.output
            .notice(&format!("Found {} videos in channel", videos.len()));

        let selected = self.select_videos(&videos, config.download_all)?;
        if selected.is_empty() {
            self.output.notice("No videos selected for download");
            return Ok(report);
        }

        let folder = create_channel_folder(&folder_name(&channel.name, &config.output_dir))
            .await
            .map_err(DownloadError::CreateChannelFolder)?;
        self.output
            .notice(&format!("Downloading to folder: {}", folder.display()));
        let config = config.clone().with_output_dir(folder);
        report.selected = selected.len();

        // Settle every destination and overwrite question before the first
        // transfer starts. Each planned path is claimed by exactly one video.
        let mut claimed = HashSet::new();
        let mut work = Vec::with_capacity(selected.len());
        for video in selected.iter().map(|&i| &videos[i]) {
            match self.plan(video, &config, &claimed).await {
                Ok(planned) => {
                    claimed.insert(planned.path.clone());
                    work.push(planned);
                }
                Err(e) if e.is_user_declined() => {
                    debug!("Skipping {}: {}", video.title, e);
                    report.skipped += 1;
                }
                Err(e) => {
                    self.output.item_failed(&video.title, &e);
                    report.failed.push(video.title.clone());
                }
            }
        }

        for (i, planned) in work.iter().enumerate() {
            match self.download_planned(planned, i + 1, work.len(), &config).await {
                Ok(_) => {}
                Err(e) if e.is_user_declined() => {
                    debug!("Skipping {}: {}", planned.video.title, e);
                    report.skipped += 1;
                }
                Err(e) => {
                    self.output.item_failed(&planned.video.title, &e);
                    report.failed.push(planned.video.title.clone());
                }
            }
        }

        self.output.channel_summary(&report);
        Ok(report)
    }

    /// Indices of the videos to download, asking the user unless `all` is set
    fn select_videos(&self, videos: &[Video], all: bool) -> Result<Vec<usize>, DownloadError> {
        if all {
            return Ok(select_all(videos.len()));
        }

        self.output.video_list(videos);
        let input = self
            .prompt
            .input("Selection")
            .map_err(DownloadError::ReadSelection)?;
        if input.trim().is_empty() {
            return Ok(select_all(videos.len()));
        }
        parse_selection(&input, videos.len()).map_err(DownloadError::SelectVideos)
    }

    /// Pick the variant and destination of `video` and apply the existence
    /// policy. A destination another video of the batch claimed gets a
    /// numbered name instead.
    async fn plan<'a>(
        &self,
        video: &'a Video,
        config: &DownloadConfig,
        claimed: &HashSet<PathBuf>,
    ) -> Result<PlannedVideo<'a>, DownloadError> {
        let variant = self.first_variant(&video.id).await?;

        let path = unique_path(
            &compute_filename(
                &video.title,
                &variant.media_type,
                video.episode_label(),
                config.use_episode_prefix,
                &config.output_dir,
            ),
            claimed,
        );
        let replaces = tokio::fs::try_exists(&path).await.unwrap_or(false);
        check_existing(&path, config, self.prompt.as_ref())
            .await
            .map_err(DownloadError::CreateVideoFile)?;

        Ok(PlannedVideo {
            video,
            variant,
            path,
            replaces,
        })
    }

    /// Download a planned video to its settled destination.
    ///
    /// A file that appeared since planning goes through the existence
    /// policy again; one the user already agreed to replace does not.
    async fn download_planned(
        &self,
        planned: &PlannedVideo<'_>,
        item_index: usize,
        item_count: usize,
        config: &DownloadConfig,
    ) -> Result<PathBuf, DownloadError> {
        if !planned.replaces {
            check_existing(&planned.path, config, self.prompt.as_ref())
                .await
                .map_err(DownloadError::CreateVideoFile)?;
        }

        self.save_variant(
            &planned.video.id,
            &planned.variant,
            &planned.path,
            item_index,
            item_count,
        )
        .await
    }
}
