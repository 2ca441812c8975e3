//! Video platform API access

pub mod api;
pub mod client;

pub use client::*;
