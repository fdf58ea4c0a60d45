//! Error types for the metatree library.
//!
//! This module provides the error hierarchy shared by every layer of the
//! library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::DecodeError;

/// Result type alias for operations that may fail with a metatree error.
///
/// # Examples
///
/// ```
/// use metatree::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(27)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the metatree library.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested on-disk path (or logical name, after suffix recovery)
    /// does not exist.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// An entry was constructed with an absolute path.
    #[error("entry path must be relative: {path}")]
    RelativePathExpected {
        /// The offending path.
        path: String,
    },

    /// A location was constructed with a relative path.
    #[error("location path must be absolute: {path}")]
    AbsolutePathExpected {
        /// The offending path.
        path: String,
    },

    /// More than one on-disk entry shares a logical name under one parent.
    #[error(
        "ambiguous name '{name}' in {}: {}",
        parent.display(),
        candidates.join(", ")
    )]
    AmbiguousName {
        /// The directory that was searched.
        parent: PathBuf,
        /// The logical name that was looked up.
        name: String,
        /// Every basename that matched.
        candidates: Vec<String>,
    },

    /// Leaf content could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A value could not be encoded.
    #[error("encode error: {message}")]
    Encode {
        /// A description of the failure.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path string could not be parsed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: String,
        /// The reason the path is invalid.
        reason: String,
    },

    /// An operation that requires a collection was applied to a leaf.
    #[error("not a collection: {path}")]
    NotACollection {
        /// The path of the leaf.
        path: String,
    },

    /// A value cannot be stored where it was assigned.
    #[error("invalid value: {reason}")]
    InvalidValue {
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested feature exists as an interface only.
    #[error("not implemented: {feature}")]
    NotImplemented {
        /// Name of the feature.
        feature: &'static str,
    },
}

impl Error {
    /// Wrap an I/O error raised while accessing `path`.
    ///
    /// `NotFound` is surfaced as [`Error::NotFound`]; every other kind
    /// becomes [`Error::Storage`].
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Storage { path, source }
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::NotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is permission-related.
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::Error;
    /// use std::io;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::Storage {
    ///     path: PathBuf::from("/restricted"),
    ///     source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    /// };
    /// assert!(err.is_permission_denied());
    /// ```
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Storage { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_error() {
        let err = Error::NotFound {
            path: PathBuf::from("/root/.meta/age.int"),
        };
        let display = format!("{err}");
        assert!(display.contains("not found"));
        assert!(display.contains("age.int"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_relative_and_absolute_expected() {
        let err = Error::RelativePathExpected {
            path: "/abs/age".to_string(),
        };
        assert!(format!("{err}").contains("must be relative"));

        let err = Error::AbsolutePathExpected {
            path: "rel/dir".to_string(),
        };
        assert!(format!("{err}").contains("must be absolute"));
    }

    #[test]
    fn test_ambiguous_name_lists_candidates() {
        let err = Error::AmbiguousName {
            parent: PathBuf::from("/root/.meta"),
            name: "age".to_string(),
            candidates: vec!["age.int".to_string(), "age.float".to_string()],
        };
        let display = format!("{err}");
        assert!(display.contains("ambiguous name 'age'"));
        assert!(display.contains("age.int, age.float"));
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::from_io("/missing", io_err);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_keeps_other_kinds_as_storage() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from_io("/restricted", io_err);
        assert!(err.is_permission_denied());
        assert!(!err.is_not_found());
        let display = format!("{err}");
        assert!(display.contains("storage error"));
        assert!(display.contains("/restricted"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "user".to_string(),
            message: "must be non-empty".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("user"));
    }

    #[test]
    fn test_not_implemented_error() {
        let err = Error::NotImplemented { feature: "versions" };
        assert_eq!(format!("{err}"), "not implemented: versions");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u16> {
            Err(Error::InvalidValue {
                reason: "test".to_string(),
            })
        }

        assert!(returns_result().is_err());
    }
}
