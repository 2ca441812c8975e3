//! Main entry point for tubedl CLI

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubedl::auth::{SetOutcome, StaticToken, TokenProvider, TokenStore};
use tubedl::cli::{Args, Command, DownloadArgs, OutputFormatter, TerminalPrompt, TokenAction};
use tubedl::platform::{ClientConfig, TubeClient};
use tubedl::{Downloader, Outcome, TubeError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }
    debug!("Starting tubedl with args: {:?}", args);

    let formatter = OutputFormatter::new(args.verbosity_level());
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            formatter.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let verbosity = args.verbosity_level();
    match args.command {
        Command::Download(download) => {
            let formatter =
                Arc::new(OutputFormatter::new(verbosity).with_progress(!download.no_progress));
            handle_download(download, formatter).await
        }
        Command::Token { action } => handle_token(action, &OutputFormatter::new(verbosity)),
    }
}

/// Handle the download command
async fn handle_download(
    args: DownloadArgs,
    formatter: Arc<OutputFormatter>,
) -> anyhow::Result<()> {
    let tokens: Arc<dyn TokenProvider> = match StaticToken::from_env() {
        Some(token) => {
            debug!("Using access token from the environment");
            Arc::new(token)
        }
        None => Arc::new(TokenStore::keyring()),
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling download");
            on_interrupt.cancel();
        }
    });

    let client_config = ClientConfig::new()
        .with_env_overrides()
        .with_timeout(args.timeout_duration());
    let client = TubeClient::new(client_config, tokens)
        .context("failed to create HTTP client")?
        .with_cancellation(cancel);

    let downloader = Downloader::new(client, formatter, Arc::new(TerminalPrompt::new()));
    finish_download(downloader.download(&args.to_config()).await)
}

/// Map the result of a download to the process result.
///
/// A skipped or declined single video is a failure; failed items of a
/// channel batch are listed in its summary and are not.
fn finish_download(result: Result<Outcome, TubeError>) -> anyhow::Result<()> {
    match result? {
        Outcome::Video(path) => info!("Video saved to {}", path.display()),
        Outcome::Channel(report) => info!(
            "Channel finished: {} selected, {} skipped, {} failed",
            report.selected,
            report.skipped,
            report.failed.len()
        ),
    }
    Ok(())
}

/// Handle the token subcommands
fn handle_token(action: TokenAction, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let store = TokenStore::keyring();

    match action {
        TokenAction::Get => {
            let token = store.get().context("failed to get token")?;
            println!("Token: {}", token);
        }
        TokenAction::Set => match store
            .set(&TerminalPrompt::new())
            .context("failed to set token")?
        {
            SetOutcome::Stored => formatter.success("Token successfully stored"),
            SetOutcome::Kept => formatter.info("Operation cancelled"),
        },
        TokenAction::Delete => {
            store.delete().context("failed to delete token")?;
            formatter.success("Token successfully deleted");
        }
    }

    Ok(())
}

/// Initialize logging system
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "tubedl=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tubedl::error::{DownloadError, FileError};
    use tubedl::ChannelReport;

    #[test]
    fn test_declined_video_is_a_failure() {
        for file_error in [
            FileError::Aborted(PathBuf::from("Clip.mp4")),
            FileError::Exists(PathBuf::from("Clip.mp4")),
        ] {
            let result = Err(TubeError::Video(DownloadError::CreateVideoFile(file_error)));
            let err = finish_download(result).unwrap_err();
            assert!(format!("{:#}", err).starts_with("failed to download video"));
        }
    }

    #[test]
    fn test_finished_downloads_succeed() {
        assert!(finish_download(Ok(Outcome::Video(PathBuf::from("Clip.mp4")))).is_ok());

        let report = ChannelReport {
            selected: 3,
            skipped: 0,
            failed: vec!["Two".to_string()],
        };
        assert!(finish_download(Ok(Outcome::Channel(report))).is_ok());
    }
}
