//! CLI structure and command definitions.

use crate::commands::{
    CompletionsCommand, ConfigCommand, HistoryCommand, LocationsCommand, LsCommand,
    ReadCommand, RemoveCommand, RestoreCommand, WriteCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for typed metadata stored alongside directories.
#[derive(Parser)]
#[command(name = "metatree")]
#[command(version, about = "Read and write directory-hosted metadata", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Directory whose metadata is addressed (default: current directory)
    #[arg(long, value_name = "PATH", global = true, env = "METATREE_ROOT")]
    pub root: Option<PathBuf>,

    /// Override the user configuration directory (default: ~/.metatree)
    #[arg(long, value_name = "PATH", global = true, env = "METATREE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the value or children at a metapath
    Read(ReadCommand),

    /// Store a value at a metapath
    Write(WriteCommand),

    /// Move the entry at a metapath to the trash
    Remove(RemoveCommand),

    /// List overwritten values of an entry, newest first
    History(HistoryCommand),

    /// Restore an entry from its history
    Restore(RestoreCommand),

    /// Print the hierarchy below a metapath
    Ls(LsCommand),

    /// List directories hosting metadata above the root
    Locations(LocationsCommand),

    /// Print the effective configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
