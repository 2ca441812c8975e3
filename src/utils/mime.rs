//! MIME type utilities for determining file extensions

/// Extension used when the media type carries no usable subtype
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Get file extension from a variant's media type.
///
/// Well-known container types map to their usual extension; any other
/// `type/subtype` falls back to the subtype itself.
pub fn ext_from_media_type(media_type: &str) -> String {
    // drop parameters such as `; codecs="avc1"`
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let known = match essence.as_str() {
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/3gpp" => Some("3gp"),
        "video/quicktime" => Some("mov"),
        "video/x-msvideo" => Some("avi"),
        "video/x-matroska" => Some("mkv"),
        "video/mp2t" => Some("ts"),
        "video/ogg" => Some("ogv"),
        "audio/mp4" => Some("m4a"),
        "audio/mpeg" => Some("mp3"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_string();
    }

    match essence.split_once('/') {
        Some((_, subtype)) if is_plain_extension(subtype) => subtype.to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

fn is_plain_extension(subtype: &str) -> bool {
    !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '.')
}

/// Check if MIME type is a video format
pub fn is_video_mime(media_type: &str) -> bool {
    media_type.trim().starts_with("video/")
}
