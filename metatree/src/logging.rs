//! User-facing diagnostics.
//!
//! A [`Logger`] is an explicit handle: the [`Store`](crate::Store) receives
//! one at construction and reports skipped files, missing resources and
//! trash moves through it. Every message is also forwarded to the `log`
//! facade under the `metatree` target, so an application that installs a
//! `log` backend sees them regardless of the logger's own level.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_ENV: &str = "METATREE_LOG_MODE";

const LOG_TARGET: &str = "metatree";

/// How much the logger prints to stderr.
///
/// # Examples
///
/// ```
/// use metatree::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert_eq!("VERBOSE".parse::<LogLevel>(), Ok(LogLevel::Verbose));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Nothing at all.
    Quiet,
    /// Errors and warnings, such as files that failed to decode.
    #[default]
    Normal,
    /// Also every write, removal and restore.
    Verbose,
}

impl LogLevel {
    /// Lowercase name, as accepted by [`LOG_MODE_ENV`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Quiet, Self::Normal, Self::Verbose]
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown log mode '{s}'"))
    }
}

/// Stderr reporter handed to a [`Store`](crate::Store).
///
/// # Examples
///
/// ```
/// use metatree::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("age.int holds an unreadable value");
/// logger.info("printed only when verbose");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// A logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// A logger that prints nothing to stderr.
    #[must_use]
    pub const fn silent() -> Self {
        Self::new(LogLevel::Quiet)
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether messages needing `level` reach stderr.
    #[must_use]
    pub fn prints(&self, level: LogLevel) -> bool {
        level != LogLevel::Quiet && self.level >= level
    }

    /// Report a failure the caller recovers from.
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Normal, log::Level::Error, message);
    }

    /// Report something skipped or missing.
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Normal, log::Level::Warn, message);
    }

    /// Report a change made on disk.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Verbose, log::Level::Info, message);
    }

    fn emit(&self, needs: LogLevel, facade: log::Level, message: &str) {
        log::log!(target: LOG_TARGET, facade, "{message}");
        if self.prints(needs) {
            eprintln!("{}: {message}", facade.as_str().to_lowercase());
        }
    }
}

/// Pick a logger from command-line flags, then [`LOG_MODE_ENV`].
///
/// `verbose` wins over `quiet`; an unparsable environment value is ignored.
///
/// ```
/// use metatree::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = match (verbose, quiet) {
        (true, _) => LogLevel::Verbose,
        (false, true) => LogLevel::Quiet,
        (false, false) => env::var(LOG_MODE_ENV)
            .ok()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or_default(),
    };
    Logger::new(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_log_level() {
        assert_eq!("quiet".parse::<LogLevel>(), Ok(LogLevel::Quiet));
        assert_eq!(" Normal ".parse::<LogLevel>(), Ok(LogLevel::Normal));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Verbose.to_string(), "verbose");
    }

    #[test]
    fn test_prints_by_level() {
        let normal = Logger::default();
        assert!(normal.prints(LogLevel::Normal));
        assert!(!normal.prints(LogLevel::Verbose));
        assert!(!Logger::silent().prints(LogLevel::Normal));
        assert!(!Logger::new(LogLevel::Verbose).prints(LogLevel::Quiet));
    }

    #[test]
    fn test_init_logger_flags() {
        assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
        assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
    }

    #[test]
    #[serial]
    fn test_init_logger_from_env() {
        let saved = env::var(LOG_MODE_ENV).ok();

        env::set_var(LOG_MODE_ENV, "quiet");
        assert_eq!(init_logger(false, false).level(), LogLevel::Quiet);
        assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);

        env::set_var(LOG_MODE_ENV, "chatty");
        assert_eq!(init_logger(false, false).level(), LogLevel::Normal);

        match saved {
            Some(value) => env::set_var(LOG_MODE_ENV, value),
            None => env::remove_var(LOG_MODE_ENV),
        }
    }
}
