//! Filesystem capability.
//!
//! The store never touches `std::fs` directly; every disk access goes
//! through an [`OsFs`] implementation. [`LocalFs`] is the production
//! backend and [`MemoryFs`] keeps a whole hierarchy in memory for tests.

mod local;
mod memory;

use std::path::Path;

use crate::Result;

pub use local::LocalFs;
pub use memory::MemoryFs;

/// Filesystem primitives the store depends on.
///
/// Implementations report a missing path as
/// [`Error::NotFound`](crate::Error::NotFound) and every other failure as
/// [`Error::Storage`](crate::Error::Storage).
///
/// # Examples
///
/// ```
/// use metatree::fs::{MemoryFs, OsFs};
/// use std::path::Path;
///
/// let fs = MemoryFs::new();
/// fs.write(Path::new("/root/.meta/age.int"), b"27").unwrap();
/// assert!(fs.is_dir(Path::new("/root/.meta")));
///
/// let (dirs, files) = fs.list(Path::new("/root/.meta")).unwrap();
/// assert!(dirs.is_empty());
/// assert_eq!(files, vec!["age.int".to_string()]);
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait OsFs: Send + Sync {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Basenames of the directories and files directly under `path`, each
    /// sorted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `path` does not exist.
    fn list(&self, path: &Path) -> Result<(Vec<String>, Vec<String>)>;

    /// Read a file's bytes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Storage` on failure.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on failure.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Create a directory and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on failure.
    fn mkdir_all(&self, path: &Path) -> Result<()>;

    /// Move a file or directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `src` is missing, `Storage` otherwise.
    fn rename(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Delete a file or a directory with its contents.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `path` is missing, `Storage` otherwise.
    fn remove_all(&self, path: &Path) -> Result<()>;
}
