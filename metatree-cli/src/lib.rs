//! Library exports for metatree-cli.
//!
//! The CLI structure is exported for the build script and for tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
