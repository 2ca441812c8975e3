//! URL utilities for classifying media references

use crate::error::TubeError;

/// Public SwitchTube instance
pub const BASE_URL: &str = "https://tube.switch.ch/";

/// Path segment of video pages
pub const VIDEO_PREFIX: &str = "videos/";

/// Path segment of channel pages
pub const CHANNEL_PREFIX: &str = "channels/";

/// What a media reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Channel,
    /// Bare ID: the API has no endpoint telling videos and channels apart
    Unknown,
}

/// Split a media reference into its ID and kind.
///
/// Anything that does not start with `base_url` is returned as-is with
/// [`MediaKind::Unknown`]. A reference on the right host but with an
/// unrecognized path is an error carrying the remainder.
pub fn classify(input: &str, base_url: &str) -> Result<(String, MediaKind), TubeError> {
    let input = input.trim();

    let Some(rest) = input.strip_prefix(base_url) else {
        return Ok((input.to_string(), MediaKind::Unknown));
    };

    if let Some(id) = rest.strip_prefix(VIDEO_PREFIX) {
        Ok((id.to_string(), MediaKind::Video))
    } else if let Some(id) = rest.strip_prefix(CHANNEL_PREFIX) {
        Ok((id.to_string(), MediaKind::Channel))
    } else {
        Err(TubeError::InvalidUrl(rest.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video_url() {
        let (id, kind) = classify("https://tube.switch.ch/videos/123", BASE_URL).unwrap();
        assert_eq!(id, "123");
        assert_eq!(kind, MediaKind::Video);
    }

    #[test]
    fn test_classify_channel_url() {
        let (id, kind) = classify("https://tube.switch.ch/channels/abc", BASE_URL).unwrap();
        assert_eq!(id, "abc");
        assert_eq!(kind, MediaKind::Channel);
    }

    #[test]
    fn test_classify_bare_id() {
        let (id, kind) = classify("123", BASE_URL).unwrap();
        assert_eq!(id, "123");
        assert_eq!(kind, MediaKind::Unknown);
    }

    #[test]
    fn test_classify_trims_whitespace() {
        let (id, kind) = classify("  https://tube.switch.ch/videos/123  ", BASE_URL).unwrap();
        assert_eq!(id, "123");
        assert_eq!(kind, MediaKind::Video);
    }

    #[test]
    fn test_classify_unknown_path_is_error() {
        match classify("https://tube.switch.ch/nonsense/123", BASE_URL) {
            Err(TubeError::InvalidUrl(rest)) => assert_eq!(rest, "nonsense/123"),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_other_host_is_unknown() {
        let (id, kind) = classify("https://example.com/videos/1", BASE_URL).unwrap();
        assert_eq!(id, "https://example.com/videos/1");
        assert_eq!(kind, MediaKind::Unknown);
    }

    #[test]
    fn test_classify_custom_base() {
        let (id, kind) = classify("http://127.0.0.1:8080/channels/x", "http://127.0.0.1:8080/").unwrap();
        assert_eq!(id, "x");
        assert_eq!(kind, MediaKind::Channel);
    }
}
