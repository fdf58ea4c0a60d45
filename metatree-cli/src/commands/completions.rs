//! `metatree completions`

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Print a shell completion script to stdout
#[derive(Args)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Write the script for `self.shell`; hints go to stderr.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            let hint = match self.shell {
                Shell::Bash => "source <(metatree completions bash)",
                Shell::Zsh => "metatree completions zsh > \"${fpath[1]}/_metatree\"",
                Shell::Fish => "metatree completions fish > ~/.config/fish/completions/metatree.fish",
                _ => "redirect this output into your shell's completion directory",
            };
            eprintln!("# {hint}");
        }

        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, bin_name, &mut io::stdout());
        Ok(())
    }
}
