//! Ls command implementation.

use crate::error::CliError;
use crate::utils::{parse_metapath, GlobalOptions, Session};
use clap::Args;
use metatree::Tree;

/// Print the hierarchy below a metapath.
#[derive(Args)]
pub struct LsCommand {
    /// Metapath to list (default: the whole location)
    #[arg(default_value = "/")]
    pub metapath: String,

    /// Levels to load
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub depth: usize,
}

impl LsCommand {
    /// Execute the ls command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        let session = Session::open(global)?;
        let mut tree = Tree::new();
        let node = session.locate(&mut tree, &metapath, self.depth)?;
        print!("{}", tree.ls(node));
        Ok(())
    }
}
