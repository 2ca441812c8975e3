//! Destination file and folder handling

use crate::core::prompt::Prompt;
use crate::core::DownloadConfig;
use crate::error::FileError;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tracing::{debug, info};

/// Decide whether `path` may be (over)written.
///
/// Returns `Exists` when skip-existing is configured and `Aborted` when the
/// user declines the overwrite prompt. Force short-circuits both.
pub async fn check_existing(
    path: &Path,
    config: &DownloadConfig,
    prompt: &dyn Prompt,
) -> Result<(), FileError> {
    if config.force_overwrite {
        return Ok(());
    }

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }

    if config.skip_existing {
        info!("Skipping existing file {}", path.display());
        return Err(FileError::Exists(path.to_path_buf()));
    }

    let question = format!("File {} already exists. Overwrite?", path.display());
    if prompt.confirm(&question) {
        Ok(())
    } else {
        Err(FileError::Aborted(path.to_path_buf()))
    }
}

/// Partial file a transfer writes into before it is renamed into place
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Create `path`, and its parent folders, truncating any previous content
pub async fn create_video_file(path: &Path) -> Result<File, FileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(FileError::CreateFolder)?;
    }

    debug!("Creating file {}", path.display());
    File::create(path).await.map_err(FileError::CreateFile)
}

/// Create the folder a channel is downloaded into
pub async fn create_channel_folder(folder: &Path) -> Result<PathBuf, FileError> {
    fs::create_dir_all(folder)
        .await
        .map_err(FileError::CreateFolder)?;
    Ok(folder.to_path_buf())
}
