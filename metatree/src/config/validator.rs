//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

const MAX_USER_LEN: usize = 255;

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use metatree::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let blank = Config { user: Some("  ".to_string()), ..Default::default() };
/// assert!(ConfigValidator::validate(&blank).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref user) = config.user {
            Self::validate_user(user)?;
        }
        Ok(())
    }

    /// The user ends up as the content of a `user.string` file in every
    /// imprint, so it must be a single non-blank line.
    fn validate_user(user: &str) -> Result<()> {
        let trimmed = user.trim();

        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: "user".into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }

        if trimmed.contains(['\0', '\n', '\r']) {
            return Err(Error::Validation {
                field: "user".into(),
                message: "Cannot contain null bytes or line breaks".into(),
            });
        }

        if trimmed.len() > MAX_USER_LEN {
            return Err(Error::Validation {
                field: "user".into(),
                message: format!("Cannot exceed {MAX_USER_LEN} characters"),
            });
        }

        Ok(())
    }
}
