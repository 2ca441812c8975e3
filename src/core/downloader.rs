//! Main downloader implementation

use crate::core::channel::ChannelReport;
use crate::core::prompt::Prompt;
use crate::core::reporter::Reporter;
use crate::core::video_info::VideoVariant;
use crate::download::{fetch_variant, TransferLabel};
use crate::error::{ApiError, DownloadError, TransferError, TubeError};
use crate::platform::TubeClient;
use crate::utils::fs::{check_existing, create_video_file, part_path};
use crate::utils::{classify, compute_filename, is_video_mime, MediaKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-run download configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Video or channel ID, or its URL
    pub media_ref: String,
    /// Prefix filenames with the episode label
    pub use_episode_prefix: bool,
    /// Treat an existing destination as done
    pub skip_existing: bool,
    /// Overwrite existing destinations without asking
    pub force_overwrite: bool,
    /// Select every video of a channel without asking
    pub download_all: bool,
    /// Directory files are written into; empty means the working directory
    pub output_dir: PathBuf,
}

impl DownloadConfig {
    /// Create a configuration for `media_ref` with every option off
    pub fn new(media_ref: impl Into<String>) -> Self {
        Self {
            media_ref: media_ref.into(),
            ..Default::default()
        }
    }

    pub fn with_episode_prefix(mut self, enabled: bool) -> Self {
        self.use_episode_prefix = enabled;
        self
    }

    pub fn with_skip_existing(mut self, enabled: bool) -> Self {
        self.skip_existing = enabled;
        self
    }

    pub fn with_force_overwrite(mut self, enabled: bool) -> Self {
        self.force_overwrite = enabled;
        self
    }

    pub fn with_download_all(mut self, enabled: bool) -> Self {
        self.download_all = enabled;
        self
    }

    /// Set output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// What a top-level download produced
#[derive(Debug)]
pub enum Outcome {
    /// Path of the downloaded video
    Video(PathBuf),
    /// Result of a channel batch
    Channel(ChannelReport),
}

/// Main downloader struct
pub struct Downloader {
    pub(crate) client: TubeClient,
    pub(crate) output: Arc<dyn Reporter>,
    pub(crate) prompt: Arc<dyn Prompt>,
}

impl Downloader {
    /// Create a new downloader
    pub fn new(client: TubeClient, output: Arc<dyn Reporter>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            client,
            output,
            prompt,
        }
    }

    /// Download whatever `config.media_ref` points to.
    ///
    /// A bare ID is first tried as a video and then as a channel. The
    /// channel attempt is skipped when the video attempt failed on the
    /// local filesystem, since the ID evidently named a video.
    pub async fn download(&self, config: &DownloadConfig) -> Result<Outcome, TubeError> {
        let (id, kind) = classify(&config.media_ref, &self.client.config().base_url)?;
        debug!("Classified {} as {:?} {}", config.media_ref, kind, id);

        match kind {
            MediaKind::Video => self
                .download_single(&id, config)
                .await
                .map(Outcome::Video)
                .map_err(TubeError::Video),
            MediaKind::Channel => self
                .download_channel(&id, config)
                .await
                .map(Outcome::Channel)
                .map_err(TubeError::Channel),
            MediaKind::Unknown => match self.download_single(&id, config).await {
                Ok(path) => Ok(Outcome::Video(path)),
                Err(e) if e.is_local_file_error() => Err(TubeError::Video(e)),
                Err(e) => {
                    debug!("{} is not a downloadable video ({}), trying channel", id, e);
                    self.download_channel(&id, config)
                        .await
                        .map(Outcome::Channel)
                        .map_err(TubeError::Channel)
                }
            },
        }
    }

    /// Download one video outside of a batch
    async fn download_single(
        &self,
        video_id: &str,
        config: &DownloadConfig,
    ) -> Result<PathBuf, DownloadError> {
        let started = Instant::now();
        let path = self.download_video(video_id, 1, 1, config).await?;
        self.output.download_complete(&path, started.elapsed());
        Ok(path)
    }

    /// Download a single video into `config.output_dir`.
    ///
    /// The existence policy of `config` is applied to the destination
    /// before any media bytes are requested.
    pub async fn download_video(
        &self,
        video_id: &str,
        item_index: usize,
        item_count: usize,
        config: &DownloadConfig,
    ) -> Result<PathBuf, DownloadError> {
        info!("Downloading video {} ({}/{})", video_id, item_index, item_count);

        let video = self
            .client
            .get_video_metadata(video_id)
            .await
            .map_err(DownloadError::GetVideoInfo)?;

        let variant = self.first_variant(video_id).await?;

        let path = compute_filename(
            &video.title,
            &variant.media_type,
            video.episode_label(),
            config.use_episode_prefix,
            &config.output_dir,
        );
        check_existing(&path, config, self.prompt.as_ref())
            .await
            .map_err(DownloadError::CreateVideoFile)?;

        self.save_variant(video_id, &variant, &path, item_index, item_count)
            .await
    }

    /// Variant a video is downloaded from
    pub(crate) async fn first_variant(&self, video_id: &str) -> Result<VideoVariant, DownloadError> {
        let variant = self
            .client
            .get_video_variants(video_id)
            .await
            .map_err(DownloadError::GetVideoVariants)?
            .into_iter()
            .next()
            .ok_or(DownloadError::GetVideoVariants(ApiError::NoVariantsFound))?;

        if !is_video_mime(&variant.media_type) {
            warn!(
                "Variant of {} has non-video media type {:?}",
                video_id, variant.media_type
            );
        }
        Ok(variant)
    }

    /// Stream `variant` to `path`, which the caller has cleared for writing.
    ///
    /// The bytes go to a `.part` file that is renamed into place once the
    /// transfer succeeded and removed otherwise.
    pub(crate) async fn save_variant(
        &self,
        video_id: &str,
        variant: &VideoVariant,
        path: &Path,
        item_index: usize,
        item_count: usize,
    ) -> Result<PathBuf, DownloadError> {
        let tmp_path = part_path(path);
        let mut file = create_video_file(&tmp_path)
            .await
            .map_err(DownloadError::CreateVideoFile)?;

        let label = TransferLabel::new(display_name(path), item_index, item_count);
        let result = fetch_variant(
            &self.client,
            &variant.path,
            &mut file,
            &label,
            self.output.as_ref(),
        )
        .await;
        drop(file);

        let finalized = match result {
            Ok(_) => tokio::fs::rename(&tmp_path, path)
                .await
                .map_err(TransferError::Finalize),
            Err(e) => Err(e),
        };

        match finalized {
            Ok(()) => {
                info!("Saved {}", path.display());
                Ok(path.to_path_buf())
            }
            Err(e) => {
                warn!("Download of {} failed: {}, cleaning up temp file", video_id, e);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(DownloadError::Transfer(e))
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::core::prompt::testing::ScriptedPrompt;
    use crate::error::FileError;
    use tempfile::tempdir;

    #[test]
    fn test_download_config_builders() {
        let config = DownloadConfig::new("abc")
            .with_episode_prefix(true)
            .with_skip_existing(true)
            .with_force_overwrite(true)
            .with_download_all(true)
            .with_output_dir("out");

        assert_eq!(config.media_ref, "abc");
        assert!(config.use_episode_prefix);
        assert!(config.skip_existing);
        assert!(config.force_overwrite);
        assert!(config.download_all);
        assert_eq!(config.output_dir, PathBuf::from("out"));

        let default = DownloadConfig::new("abc");
        assert!(!default.force_overwrite && !default.skip_existing);
    }

    #[tokio::test]
    async fn test_download_video_success() {
        let mut server = mockito::Server::new_async().await;
        mock_video(&mut server, "v1", "My Lecture", b"video bytes").await;
        let dir = tempdir().unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new("v1").with_output_dir(dir.path());

        let path = downloader.download_video("v1", 1, 1, &config).await.unwrap();

        assert_eq!(path, dir.path().join("My_Lecture.mp4"));
        assert_eq!(std::fs::read(&path).unwrap(), b"video bytes");
        assert!(!part_path(&path).exists());
    }

    #[tokio::test]
    async fn test_download_video_without_variants() {
        let mut server = mockito::Server::new_async().await;
        mock_metadata(&mut server, "v1", "Empty").await;
        server
            .mock("GET", "/api/v1/browse/videos/v1/video_variants")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new("v1").with_output_dir(dir.path());

        let result = downloader.download_video("v1", 1, 1, &config).await;

        assert!(matches!(
            result,
            Err(DownloadError::GetVideoVariants(ApiError::NoVariantsFound))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_video_skips_existing() {
        let mut server = mockito::Server::new_async().await;
        mock_metadata(&mut server, "v1", "Clip").await;
        mock_variants(&mut server, "v1").await;
        let media = server
            .mock("GET", "/media/v1.mp4")
            .expect(0)
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Clip.mp4"), b"old").unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new("v1")
            .with_output_dir(dir.path())
            .with_skip_existing(true);

        let result = downloader.download_video("v1", 1, 1, &config).await;

        assert!(matches!(
            result,
            Err(DownloadError::CreateVideoFile(FileError::Exists(_)))
        ));
        assert_eq!(std::fs::read(dir.path().join("Clip.mp4")).unwrap(), b"old");
        media.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_video_overwrite_after_confirm() {
        let mut server = mockito::Server::new_async().await;
        mock_video(&mut server, "v1", "Clip", b"new").await;
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Clip.mp4"), b"old").unwrap();
        let prompt = Arc::new(ScriptedPrompt::new().with_confirm(true));
        let downloader = downloader(&server, prompt.clone());
        let config = DownloadConfig::new("v1").with_output_dir(dir.path());

        let path = downloader.download_video("v1", 1, 1, &config).await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"new");
        assert_eq!(prompt.asked.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_transfer_removes_part_file() {
        let mut server = mockito::Server::new_async().await;
        mock_metadata(&mut server, "v1", "Clip").await;
        mock_variants(&mut server, "v1").await;
        server
            .mock("GET", "/media/v1.mp4")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new("v1").with_output_dir(dir.path());

        let result = downloader.download_video("v1", 1, 1, &config).await;

        assert!(matches!(
            result,
            Err(DownloadError::Transfer(TransferError::Fetch(ApiError::HttpNotOk(_))))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_video_url() {
        let mut server = mockito::Server::new_async().await;
        mock_video(&mut server, "v1", "Clip", b"bytes").await;
        let dir = tempdir().unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new(format!("{}/videos/v1", server.url()))
            .with_output_dir(dir.path());

        let outcome = downloader.download(&config).await.unwrap();

        assert!(matches!(outcome, Outcome::Video(path) if path.ends_with("Clip.mp4")));
    }

    #[tokio::test]
    async fn test_dispatch_invalid_url() {
        let server = mockito::Server::new_async().await;
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));
        let config = DownloadConfig::new(format!("{}/playlists/p1", server.url()));

        let result = downloader.download(&config).await;

        assert!(matches!(result, Err(TubeError::InvalidUrl(rest)) if rest == "playlists/p1"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_falls_back_to_channel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/browse/videos/c1")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/browse/channels/c1")
            .with_status(200)
            .with_body(r#"{"name":"Course"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/browse/channels/c1/videos")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));

        let outcome = downloader.download(&DownloadConfig::new("c1")).await.unwrap();

        assert!(matches!(outcome, Outcome::Channel(report) if report.selected == 0));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_does_not_fall_back_on_local_error() {
        let mut server = mockito::Server::new_async().await;
        mock_metadata(&mut server, "v1", "Clip").await;
        mock_variants(&mut server, "v1").await;
        let channel = server
            .mock("GET", "/api/v1/browse/channels/v1")
            .expect(0)
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Clip.mp4"), b"old").unwrap();
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new().with_confirm(false)));
        let config = DownloadConfig::new("v1").with_output_dir(dir.path());

        let result = downloader.download(&config).await;

        assert!(matches!(&result, Err(e) if e.is_user_declined()));
        channel.assert_async().await;
    }

    #[tokio::test]
    async fn test_dispatch_unknown_reports_channel_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let downloader = downloader(&server, Arc::new(ScriptedPrompt::new()));

        let result = downloader.download(&DownloadConfig::new("nope")).await;

        assert!(matches!(
            result,
            Err(TubeError::Channel(DownloadError::GetChannelInfo(ApiError::HttpNotOk(_))))
        ));
    }
}
