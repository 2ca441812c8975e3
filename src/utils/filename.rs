//! Safe filename generation utilities

use crate::utils::mime::ext_from_media_type;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DASH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:|]"#).expect("static pattern"));

static DROPPED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[*?"<>\x00-\x1f]"#).expect("static pattern"));

static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("static pattern"));

/// Replace or drop characters that are invalid in filenames.
///
/// Path separators, `:` and `|` become `-`; `* ? " < >` and control
/// characters are removed. Runs of dashes collapse to one.
pub fn sanitize_filename(name: &str) -> String {
    let dashed = DASH_CHARS.replace_all(name, "-");
    let cleaned = DROPPED_CHARS.replace_all(&dashed, "");
    DASH_RUNS.replace_all(cleaned.trim(), "-").into_owned()
}

/// Destination path of a video inside `output_dir`
pub fn compute_filename(
    title: &str,
    media_type: &str,
    episode: Option<&str>,
    use_episode: bool,
    output_dir: &Path,
) -> PathBuf {
    let extension = ext_from_media_type(media_type);

    let mut stem = sanitize_filename(title).replace(' ', "_");
    if stem.is_empty() {
        stem = "video".to_string();
    }

    let filename = match episode.map(str::trim).filter(|e| !e.is_empty()) {
        Some(episode) if use_episode => {
            format!("{}_{}.{}", sanitize_filename(episode).replace(' ', "_"), stem, extension)
        }
        _ => format!("{}.{}", stem, extension),
    };

    output_dir.join(filename)
}

/// Folder a channel is downloaded into
pub fn folder_name(channel_name: &str, output_dir: &Path) -> PathBuf {
    let mut name = sanitize_filename(&channel_name.replace('/', " - "));
    if name.is_empty() || name == "." || name == ".." {
        name = "channel".to_string();
    }
    output_dir.join(name)
}

/// `path` itself, or the first `stem_N.ext` (N = 2, 3, ...) not in `taken`
pub fn unique_path(path: &Path, taken: &HashSet<PathBuf>) -> PathBuf {
    if !taken.contains(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (2usize..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| path.to_path_buf())
}
