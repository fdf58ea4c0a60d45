//! Main entry point for the metatree CLI.
//!
//! Reads and writes typed metadata stored in `.meta` containers:
//! - `read` / `write`: get or set a value at a metapath
//! - `remove`: move an entry to the trash
//! - `history` / `restore`: inspect and roll back overwritten values
//! - `ls` / `locations`: browse the hierarchy

use clap::Parser;
use metatree_cli::cli::{Cli, Command};
use metatree_cli::utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        root: cli.root,
        config_dir: cli.config_dir,
    };

    let result = match cli.command {
        Command::Read(cmd) => cmd.execute(&global),
        Command::Write(cmd) => cmd.execute(&global),
        Command::Remove(cmd) => cmd.execute(&global),
        Command::History(cmd) => cmd.execute(&global),
        Command::Restore(cmd) => cmd.execute(&global),
        Command::Ls(cmd) => cmd.execute(&global),
        Command::Locations(cmd) => cmd.execute(&global),
        Command::Config(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            if !global.quiet || !e.is_absent() {
                eprintln!("Error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
