//! Environment variable handling for configuration overrides.
//!
//! `METATREE_*` variables override configuration file values.

use std::env;

use crate::codec::CodecFormat;
use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Overrides the user recorded in history.
pub const USER_ENV: &str = "METATREE_USER";
/// Overrides case-insensitive name matching.
pub const IGNORE_CASE_ENV: &str = "METATREE_IGNORE_CASE";
/// Overrides history tracking.
pub const TRACK_HISTORY_ENV: &str = "METATREE_TRACK_HISTORY";
/// Overrides the codec.
pub const CODEC_ENV: &str = "METATREE_CODEC";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use metatree::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a variable holds an invalid boolean
    /// or an unknown codec name.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(user) = env::var(USER_ENV) {
            config.user = Some(user);
        }

        if let Ok(val) = env::var(IGNORE_CASE_ENV) {
            config.ignore_case = Some(Self::parse_bool(IGNORE_CASE_ENV, &val)?);
        }

        if let Ok(val) = env::var(TRACK_HISTORY_ENV) {
            config.track_history = Some(Self::parse_bool(TRACK_HISTORY_ENV, &val)?);
        }

        if let Ok(val) = env::var(CODEC_ENV) {
            let codec = val.parse::<CodecFormat>().map_err(|_| Error::Validation {
                field: CODEC_ENV.into(),
                message: format!("Unknown codec: '{val}' (expected json or yaml)"),
            })?;
            config.codec = Some(codec);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
