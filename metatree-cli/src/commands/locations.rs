//! Locations command implementation.

use crate::error::CliError;
use crate::utils::{GlobalOptions, Session};
use clap::Args;

/// List the root and each ancestor directory that hosts metadata, nearest
/// first.
#[derive(Args)]
pub struct LocationsCommand {}

impl LocationsCommand {
    /// Execute the locations command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let session = Session::open(global)?;
        for location in session.store.locations(&session.root) {
            println!("{location}");
        }
        Ok(())
    }
}
