//! Browse API endpoints

use crate::core::video_info::{ChannelInfo, Video, VideoVariant};
use crate::error::ApiError;
use crate::platform::client::TubeClient;
use tracing::debug;

const VIDEOS_API: &str = "api/v1/browse/videos";
const CHANNELS_API: &str = "api/v1/browse/channels";

impl TubeClient {
    /// Fetch a video's metadata
    pub async fn get_video_metadata(&self, video_id: &str) -> Result<Video, ApiError> {
        self.get_json(&format!("{}/{}", VIDEOS_API, video_id)).await
    }

    /// Fetch the downloadable variants of a video; never returns an empty list
    pub async fn get_video_variants(&self, video_id: &str) -> Result<Vec<VideoVariant>, ApiError> {
        let variants: Vec<VideoVariant> = self
            .get_json(&format!("{}/{}/video_variants", VIDEOS_API, video_id))
            .await?;

        if variants.is_empty() {
            return Err(ApiError::NoVariantsFound);
        }
        debug!("Video {} has {} variant(s)", video_id, variants.len());
        Ok(variants)
    }

    /// Fetch a channel's metadata
    pub async fn get_channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ApiError> {
        self.get_json(&format!("{}/{}", CHANNELS_API, channel_id)).await
    }

    /// List the videos of a channel
    pub async fn get_channel_videos(&self, channel_id: &str) -> Result<Vec<Video>, ApiError> {
        self.get_json(&format!("{}/{}/videos", CHANNELS_API, channel_id))
            .await
    }
}
