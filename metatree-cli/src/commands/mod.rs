//! CLI command implementations.
//!
//! - `read`: print the value or children at a metapath
//! - `write`: store a value at a metapath
//! - `remove`: trash an entry
//! - `history`: list an entry's imprints
//! - `restore`: roll an entry back to an imprint
//! - `ls`: print the hierarchy below a metapath
//! - `locations`: list directories hosting metadata
//! - `config`: print the effective configuration
//! - `completions`: generate shell completion scripts

pub mod completions;
pub mod config;
pub mod history;
pub mod locations;
pub mod ls;
pub mod read;
pub mod remove;
pub mod restore;
pub mod write;

pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use history::HistoryCommand;
pub use locations::LocationsCommand;
pub use ls::LsCommand;
pub use read::ReadCommand;
pub use remove::RemoveCommand;
pub use restore::RestoreCommand;
pub use write::WriteCommand;
