//! Download system for tubedl

pub mod downloader;

pub use downloader::*;
