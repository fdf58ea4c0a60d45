//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use metatree::config::{Config, ConfigMerger};
///
/// let low = Config { user: Some("low".to_string()), ..Default::default() };
/// let high = Config { user: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.user, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into the final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge `source` into `target`; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.user.is_some() {
            target.user.clone_from(&source.user);
        }

        if source.ignore_case.is_some() {
            target.ignore_case = source.ignore_case;
        }

        if source.track_history.is_some() {
            target.track_history = source.track_history;
        }

        if source.codec.is_some() {
            target.codec = source.codec;
        }
    }
}
