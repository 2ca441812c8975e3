//! Core functionality for tubedl

pub mod channel;
pub mod downloader;
pub mod progress;
pub mod prompt;
pub mod reporter;
pub mod selection;
pub mod video_info;

pub use channel::*;
pub use downloader::*;
pub use progress::*;
pub use prompt::*;
pub use reporter::*;
pub use selection::*;
pub use video_info::*;
