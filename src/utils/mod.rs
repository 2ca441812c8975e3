//! Utility functions for tubedl

pub mod filename;
pub mod fs;
pub mod mime;
pub mod url;

pub use filename::*;
pub use mime::*;
pub use url::*;
