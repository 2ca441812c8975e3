//! API data structures

use serde::{Deserialize, Serialize};

/// A single video as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Opaque video identifier
    pub id: String,
    /// Human-readable title
    #[serde(default)]
    pub title: String,
    /// Episode label, absent for most videos
    #[serde(default)]
    pub episode: Option<String>,
}

impl Video {
    /// Create a new Video
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            episode: None,
        }
    }

    /// Set the episode label
    pub fn with_episode(mut self, episode: impl Into<String>) -> Self {
        self.episode = Some(episode.into());
        self
    }

    /// Episode label when present and non-empty
    pub fn episode_label(&self) -> Option<&str> {
        self.episode.as_deref().filter(|e| !e.is_empty())
    }
}

/// One downloadable rendition of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    /// Download path relative to the API base URL
    pub path: String,
    /// MIME type, e.g. `video/mp4`
    #[serde(rename = "mediaType", alias = "media_type", default)]
    pub media_type: String,
}

impl VideoVariant {
    pub fn new(path: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }
}

/// Channel metadata; only the name is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
}
