//! Config command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, resolve_root, GlobalOptions};
use clap::Args;
use metatree::Config;

/// Print the effective configuration as YAML, defaults filled in.
#[derive(Args)]
pub struct ConfigCommand {}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let root = resolve_root(global.root.as_deref())?;
        let config = load_configuration(global, &root)?;
        let options = config.store_options();
        let effective = Config {
            user: Some(options.user),
            ignore_case: Some(options.ignore_case),
            track_history: Some(options.track_history),
            codec: Some(config.codec_format()),
        };
        let text =
            serde_yaml::to_string(&effective).map_err(|e| CliError::Config(e.to_string()))?;
        print!("{text}");
        Ok(())
    }
}
