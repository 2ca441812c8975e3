//! Command line interface for tubedl

pub mod args;
pub mod output;
pub mod prompt;

pub use args::{Args, Command, DownloadArgs, TokenAction, VerbosityLevel};
pub use output::OutputFormatter;
pub use prompt::TerminalPrompt;
