//! # tubedl - SwitchTube downloader
//!
//! Downloads single videos or whole channels from SwitchTube.
//!
//! ## Features
//!
//! - Video and channel URLs or bare IDs
//! - Channel subset selection (`1-3, 7 9`)
//! - Streamed downloads with progress bars
//! - Access token kept in the system keyring
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubedl::auth::StaticToken;
//! use tubedl::cli::{OutputFormatter, TerminalPrompt, VerbosityLevel};
//! use tubedl::platform::{ClientConfig, TubeClient};
//! use tubedl::{DownloadConfig, Downloader};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TubeClient::new(ClientConfig::default(), Arc::new(StaticToken::new("TOKEN")))?;
//!     let output = Arc::new(OutputFormatter::new(VerbosityLevel::Normal));
//!     let downloader = Downloader::new(client, output, Arc::new(TerminalPrompt::new()));
//!
//!     let config = DownloadConfig::new("https://tube.switch.ch/videos/VIDEO_ID")
//!         .with_output_dir("./downloads");
//!     downloader.download(&config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{ChannelReport, DownloadConfig, Downloader, Outcome, Video, VideoVariant};
pub use error::TubeError;

/// Result type alias for tubedl operations
pub type Result<T> = std::result::Result<T, TubeError>;
