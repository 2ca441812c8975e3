//! Error types for tubedl

use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the channel selection grammar
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid range format: {0}")]
    InvalidRangeFormat(String),

    #[error("invalid start number: {0}")]
    InvalidStartNumber(String),

    #[error("invalid end number: {0}")]
    InvalidEndNumber(String),

    #[error("number out of range: {number} (must be 1-{max})")]
    NumberOutOfRange { number: i64, max: usize },

    #[error("invalid range: {start}-{end} (must be 1-{max})")]
    InvalidRange { start: i64, end: i64, max: usize },

    #[error("no valid selections found")]
    NoValidSelections,
}

/// Errors from the access token store
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token cannot be empty")]
    Empty,

    #[error("no token found in keyring - run 'token set' first")]
    NotFound,

    #[error("failed to read token")]
    ReadInput(#[source] io::Error),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Errors from the metadata client and HTTP transport
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to get token")]
    Token(#[source] TokenError),

    #[error("failed to construct URL")]
    ConstructUrl(#[from] url::ParseError),

    #[error("failed to send request")]
    Request(#[source] reqwest::Error),

    #[error("HTTP request failed with non-OK status: {0}")]
    HttpNotOk(StatusCode),

    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),

    #[error("no video variants found")]
    NoVariantsFound,

    #[error("request cancelled")]
    Cancelled,
}

/// Errors from the byte-stream copy loop
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read data")]
    ReadData(#[source] io::Error),

    #[error("failed to write to file")]
    WriteToFile(#[source] io::Error),

    #[error("transfer cancelled")]
    Cancelled,
}

/// Errors from local file and folder handling
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to create folder")]
    CreateFolder(#[source] io::Error),

    #[error("failed to create file")]
    CreateFile(#[source] io::Error),

    #[error("file {} already exists, skipping", .0.display())]
    Exists(PathBuf),

    #[error("file creation aborted")]
    Aborted(PathBuf),
}

/// Errors from moving the video bytes to disk
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to fetch video stream")]
    Fetch(#[source] ApiError),

    #[error("failed to copy video data")]
    Copy(#[source] StreamError),

    #[error("failed to finalize video file")]
    Finalize(#[source] io::Error),
}

/// Step-level errors of the video and channel orchestrators
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to get video information")]
    GetVideoInfo(#[source] ApiError),

    #[error("failed to get video variants")]
    GetVideoVariants(#[source] ApiError),

    #[error("failed to create video file")]
    CreateVideoFile(#[source] FileError),

    #[error("failed to transfer video")]
    Transfer(#[source] TransferError),

    #[error("failed to get channel information")]
    GetChannelInfo(#[source] ApiError),

    #[error("failed to get channel videos")]
    GetChannelVideos(#[source] ApiError),

    #[error("failed to read video selection")]
    ReadSelection(#[source] io::Error),

    #[error("failed to select videos")]
    SelectVideos(#[source] SelectionError),

    #[error("failed to create channel folder")]
    CreateChannelFolder(#[source] FileError),
}

impl DownloadError {
    /// Check if the user chose not to (re)write the destination file
    pub fn is_user_declined(&self) -> bool {
        matches!(
            self,
            DownloadError::CreateVideoFile(FileError::Exists(_) | FileError::Aborted(_))
        )
    }

    /// Check if the failure happened on the local filesystem rather than the API
    pub fn is_local_file_error(&self) -> bool {
        matches!(self, DownloadError::CreateVideoFile(_))
    }
}

/// Main error type for tubedl operations
#[derive(Debug, Error)]
pub enum TubeError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to download video")]
    Video(#[source] DownloadError),

    #[error("failed to download channel")]
    Channel(#[source] DownloadError),

    #[error("token error")]
    Token(#[from] TokenError),
}

impl TubeError {
    /// Check if error is a declined overwrite or a skipped existing file
    pub fn is_user_declined(&self) -> bool {
        match self {
            TubeError::Video(e) | TubeError::Channel(e) => e.is_user_declined(),
            _ => false,
        }
    }
}
