//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::codec::CodecFormat;
use crate::fs::OsFs;
use crate::logging::Logger;
use crate::store::{current_user, Store, StoreOptions};

/// Complete configuration structure.
///
/// Every field is optional so that partial files can be layered; unset
/// fields fall back to the built-in defaults when the configuration is
/// turned into [`StoreOptions`].
///
/// # Examples
///
/// ```
/// use metatree::config::Config;
///
/// let config: Config = serde_yaml::from_str("ignore_case: false\ncodec: yaml\n").unwrap();
/// assert_eq!(config.ignore_case, Some(false));
/// assert!(!config.store_options().ignore_case);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// User recorded in history imprints.
    pub user: Option<String>,

    /// Whether logical names are compared case-insensitively.
    pub ignore_case: Option<bool>,

    /// Whether overwriting a leaf records a history imprint.
    pub track_history: Option<bool>,

    /// Encoding used for leaf contents.
    pub codec: Option<CodecFormat>,
}

impl Config {
    /// Engine options with defaults filled in for unset fields.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            user: self.user.clone().unwrap_or_else(current_user),
            ignore_case: self.ignore_case.unwrap_or(true),
            track_history: self.track_history.unwrap_or(true),
        }
    }

    /// The configured codec, JSON unless set.
    #[must_use]
    pub fn codec_format(&self) -> CodecFormat {
        self.codec.unwrap_or_default()
    }

    /// A store on `fs` configured from this configuration.
    #[must_use]
    pub fn store_with<F: OsFs>(&self, fs: F, logger: Logger) -> Store<F> {
        Store::with_fs(fs)
            .with_codec(self.codec_format().codec())
            .with_logger(logger)
            .with_options(self.store_options())
    }
}
