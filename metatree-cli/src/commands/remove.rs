//! Remove command implementation.

use crate::error::CliError;
use crate::utils::{absent, parse_metapath, GlobalOptions, Session};
use clap::Args;
use metatree::Tree;

/// Move the entry at a metapath to the trash.
///
/// `/` removes the root's whole metadata container.
#[derive(Args)]
pub struct RemoveCommand {
    /// Metapath to remove
    pub metapath: String,

    /// Delete instead of moving to the trash
    #[arg(long)]
    pub permanent: bool,
}

impl RemoveCommand {
    /// Execute the remove command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        let session = Session::open(global)?;

        let removed = if metapath.is_root() {
            session.store.clear(&session.root, self.permanent)?
        } else {
            let mut tree = Tree::new();
            let node = session.locate(&mut tree, &metapath, 1)?;
            session.store.remove(&mut tree, node, self.permanent)?
        };

        if removed {
            Ok(())
        } else {
            Err(absent(&metapath))
        }
    }
}
