//! Authentication for tubedl

pub mod token;

pub use token::*;
