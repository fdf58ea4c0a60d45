//! History command implementation.

use crate::error::CliError;
use crate::utils::{parse_metapath, GlobalOptions, Session};
use clap::Args;
use metatree::kind::TIMESTAMP_FORMAT;
use metatree::{Imprint, MetaPath, Tree};
use serde::Serialize;

/// List overwritten values of an entry, newest first.
///
/// Each line shows the imprint's timestamp (usable with `restore`), the
/// user who overwrote the value, and the value itself.
#[derive(Args)]
pub struct HistoryCommand {
    /// Metapath of the entry
    pub metapath: String,

    /// Print the imprints as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ImprintRecord<'a> {
    timestamp: String,
    user: &'a str,
    suffix: Option<&'a str>,
    value: &'a serde_json::Value,
}

impl HistoryCommand {
    /// Execute the history command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        let session = Session::open(global)?;
        let imprints = imprints_of(&session, &metapath)?;

        if self.json {
            let records: Vec<ImprintRecord> = imprints
                .iter()
                .map(|i| ImprintRecord {
                    timestamp: i.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    user: &i.user,
                    suffix: i.suffix.as_deref(),
                    value: &i.value,
                })
                .collect();
            let text = serde_json::to_string_pretty(&records)
                .map_err(|e| CliError::Usage(e.to_string()))?;
            println!("{text}");
            return Ok(());
        }

        for imprint in &imprints {
            println!(
                "{}  {}  {}",
                imprint.timestamp.format(TIMESTAMP_FORMAT),
                imprint.user,
                session.format_value(&imprint.value)?
            );
        }
        Ok(())
    }
}

/// Imprints recorded for the entry at `metapath`, newest first.
///
/// The entry itself need not exist anymore; its parent must.
pub(crate) fn imprints_of(session: &Session, metapath: &MetaPath) -> Result<Vec<Imprint>, CliError> {
    let (parent, last) = metapath.split_last().ok_or_else(|| {
        CliError::Usage("history is kept per entry, not per location".to_string())
    })?;
    let mut tree = Tree::new();
    let parent_node = session.locate(&mut tree, &parent, 1)?;
    let target = tree.path(parent_node).child(last);
    Ok(session.store.history_of(&target)?)
}
