//! Restore command implementation.

use crate::commands::history::imprints_of;
use crate::error::CliError;
use crate::utils::{parse_metapath, GlobalOptions, Session};
use chrono::NaiveDateTime;
use clap::Args;
use metatree::kind::TIMESTAMP_FORMAT;

/// Restore an entry from its history.
///
/// Imprints at least as new as the restored one are deleted unless
/// `--keep-history` is given.
#[derive(Args)]
pub struct RestoreCommand {
    /// Metapath of the entry
    pub metapath: String,

    /// Timestamp of the imprint, as printed by `history` (YYYYMMDD-HHMMSS)
    pub timestamp: String,

    /// Keep newer imprints
    #[arg(long)]
    pub keep_history: bool,
}

impl RestoreCommand {
    /// Execute the restore command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        let timestamp = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| {
                CliError::Usage(format!(
                    "invalid timestamp '{}': {e} (expected YYYYMMDD-HHMMSS)",
                    self.timestamp
                ))
            })?;

        let session = Session::open(global)?;
        let imprint = imprints_of(&session, &metapath)?
            .into_iter()
            .find(|i| i.timestamp == timestamp)
            .ok_or_else(|| {
                CliError::Absent(format!(
                    "no imprint of {metapath} at {}",
                    self.timestamp
                ))
            })?;

        let restored = session.store.restore(&imprint, self.keep_history)?;
        if !global.quiet {
            eprintln!("Restored {restored}");
        }
        Ok(())
    }
}
