//! Write command implementation.

use crate::error::CliError;
use crate::utils::{parse_metapath, parse_value, GlobalOptions, Session};
use clap::Args;
use serde_json::Value;

/// Store a value at a metapath.
///
/// Missing intermediate collections are created. A value that parses as
/// JSON is stored with its JSON type; anything else is stored as a string.
#[derive(Args)]
pub struct WriteCommand {
    /// Metapath to write, e.g. `/address/city`
    pub metapath: String,

    /// Value to store
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Store the value as a string even if it parses as JSON
    #[arg(long)]
    pub string: bool,
}

impl WriteCommand {
    /// Execute the write command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        if metapath.is_root() {
            return Err(CliError::Usage(
                "a value needs a metapath below the location".to_string(),
            ));
        }

        let value = if self.string {
            Value::String(self.value)
        } else {
            parse_value(&self.value)
        };

        let session = Session::open(global)?;
        session.store.write(&session.root, &metapath, value)?;
        Ok(())
    }
}
