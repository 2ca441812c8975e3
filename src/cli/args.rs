//! Command line argument parsing

use crate::core::DownloadConfig;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Download videos and whole channels from SwitchTube
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Download a video or a channel
    Download(DownloadArgs),

    /// Manage the access token stored in the system keyring
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    /// Print the stored access token
    Get,
    /// Create and store a new access token
    Set,
    /// Delete the stored access token
    Delete,
}

/// Options of the `download` command
#[derive(ClapArgs, Debug, PartialEq)]
pub struct DownloadArgs {
    /// Video or channel ID, or its URL
    pub media: String,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub force: bool,

    /// Download every video of a channel without asking
    #[arg(short, long)]
    pub all: bool,

    /// Prefix filenames with the episode number
    #[arg(short, long)]
    pub episode: bool,

    /// Skip videos whose file already exists
    #[arg(short, long)]
    pub skip: bool,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,
}

impl Default for DownloadArgs {
    fn default() -> Self {
        Self {
            media: String::new(),
            force: false,
            all: false,
            episode: false,
            skip: false,
            output: None,
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            no_progress: false,
        }
    }
}

impl DownloadArgs {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Build the download configuration these flags describe
    pub fn to_config(&self) -> DownloadConfig {
        DownloadConfig::new(self.media.clone())
            .with_force_overwrite(self.force)
            .with_skip_existing(self.skip)
            .with_download_all(self.all)
            .with_episode_prefix(self.episode)
            .with_output_dir(self.output.clone().unwrap_or_default())
    }
}

impl Args {
    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}
