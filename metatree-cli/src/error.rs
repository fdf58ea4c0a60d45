//! Errors surfaced by the `metatree` binary and their process exit codes.
//!
//! | code | meaning                                         |
//! |------|-------------------------------------------------|
//! | 1    | nothing stored at the requested metapath        |
//! | 2    | rejected by the argument parser (set by clap)   |
//! | 3    | a directory or file does not exist              |
//! | 4    | malformed metapath, value or argument           |
//! | 5    | the filesystem refused an operation             |
//! | 6    | any other library failure                       |
//! | 7    | configuration could not be loaded or validated  |

use metatree::Error as LibError;
use std::fmt;

/// A failed command.
#[derive(Debug)]
pub enum CliError {
    /// Propagated from the store.
    Library(LibError),
    /// Arguments parsed but make no sense together.
    Usage(String),
    /// Writing output failed.
    Io(std::io::Error),
    /// Configuration files or environment could not be used.
    Config(String),
    /// The metapath holds nothing. Not printed under `--quiet`.
    Absent(String),
}

fn library_exit_code(err: &LibError) -> i32 {
    match err {
        LibError::NotFound { .. } => 3,
        LibError::InvalidPath { .. }
        | LibError::InvalidValue { .. }
        | LibError::RelativePathExpected { .. }
        | LibError::AbsolutePathExpected { .. } => 4,
        LibError::Storage { .. } => 5,
        LibError::Configuration(_) | LibError::Validation { .. } => 7,
        _ => 6,
    }
}

impl CliError {
    /// Process exit code; see the module table.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Absent(_) => 1,
            CliError::Library(err) => library_exit_code(err),
            CliError::Usage(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }

    /// Whether the error only reports missing data.
    pub fn is_absent(&self) -> bool {
        matches!(self, CliError::Absent(_))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => e.fmt(f),
            CliError::Usage(msg) => write!(f, "invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "cannot write output: {e}"),
            CliError::Config(msg) => write!(f, "configuration error: {msg}"),
            CliError::Absent(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Usage(_) | CliError::Config(_) | CliError::Absent(_) => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
