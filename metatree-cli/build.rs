//! Build script for metatree-cli.
//!
//! Generates a man page at build time using clap_mangen. The page is placed
//! in OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared here as well.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("metatree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read and write directory-hosted metadata")
        .long_about(
            "Command-line tool for typed metadata stored in .meta containers alongside directories",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .help("Directory whose metadata is addressed (default: current directory)")
                .value_name("PATH")
                .global(true)
                .env("METATREE_ROOT"),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .help("Override the user configuration directory (default: ~/.metatree)")
                .value_name("PATH")
                .global(true)
                .env("METATREE_CONFIG_DIR"),
        )
        .subcommands(vec![
            Command::new("read")
                .about("Print the value or children at a metapath")
                .long_about("Print a leaf value, or the names of a collection's children"),
            Command::new("write")
                .about("Store a value at a metapath")
                .long_about("Store a JSON value (or a plain string) at a metapath"),
            Command::new("remove")
                .about("Move the entry at a metapath to the trash")
                .long_about("Move an entry to the trash, or delete it with --permanent"),
            Command::new("history")
                .about("List overwritten values of an entry, newest first")
                .long_about("List the history imprints recorded when an entry was overwritten"),
            Command::new("restore")
                .about("Restore an entry from its history")
                .long_about("Write an imprint's value back to its entry"),
            Command::new("ls")
                .about("Print the hierarchy below a metapath")
                .long_about("Print an indented listing of the entries below a metapath"),
            Command::new("locations")
                .about("List directories hosting metadata above the root")
                .long_about("List the root and each ancestor directory with a .meta container"),
            Command::new("config")
                .about("Print the effective configuration")
                .long_about("Print the merged configuration as YAML"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").map_err(std::io::Error::other)?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("metatree.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
