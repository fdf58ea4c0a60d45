//! The store: synchronizes resource trees with the filesystem.
//!
//! A [`Store`] bundles the capabilities every disk-touching operation
//! needs: an [`OsFs`] backend, a [`Codec`], a [`Logger`], the operating
//! user, and a clock. Trees are passed in explicitly, so one store serves
//! any number of trees.
//!
//! # Examples
//!
//! ```
//! use metatree::{MetaPath, ResourcePath, Store, Reading};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let root = ResourcePath::from_path(dir.path()).unwrap();
//! let store = Store::new();
//!
//! store.write(&root, &MetaPath::parse("address/city"), json!("London")).unwrap();
//! let reading = store.read(&root, &MetaPath::parse("address/city")).unwrap();
//! assert_eq!(reading, Some(Reading::Value(json!("London"))));
//! ```

mod convenience;
mod flush;
mod history;
mod inherit;
mod pull;
mod trash;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::env;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::codec::{Codec, CodecFormat};
use crate::fs::{LocalFs, OsFs};
use crate::logging::Logger;
use crate::path::{split_basename, ResourcePath};
use crate::{Error, Result};

pub use convenience::Reading;
pub use history::Imprint;
pub use inherit::InheritOptions;
pub use pull::PullOptions;

/// Fallback when the operating user cannot be determined.
pub const UNKNOWN_USER: &str = "unknown";

/// The operating user, from `USER` or `USERNAME`.
#[must_use]
pub fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Behavioural switches of a [`Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// User recorded in history imprints.
    pub user: String,
    /// Whether name lookups ignore case.
    pub ignore_case: bool,
    /// Whether overwriting a leaf records a history imprint.
    pub track_history: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            user: current_user(),
            ignore_case: true,
            track_history: true,
        }
    }
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Filesystem-backed metadata store.
pub struct Store<F: OsFs = LocalFs> {
    fs: F,
    codec: Box<dyn Codec + Send + Sync>,
    logger: Logger,
    options: StoreOptions,
    clock: Clock,
}

impl Store<LocalFs> {
    /// A store on the local filesystem with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fs(LocalFs)
    }
}

impl Default for Store<LocalFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: OsFs> Store<F> {
    /// A store on `fs` with the JSON codec, a normal logger and default
    /// options.
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            codec: CodecFormat::default().codec(),
            logger: Logger::default(),
            options: StoreOptions::default(),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Box<dyn Codec + Send + Sync>) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the clock used for history timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The filesystem backend.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// The logger.
    pub fn logger(&self) -> Logger {
        self.logger
    }

    /// The options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub(crate) fn names_match(&self, a: &str, b: &str) -> bool {
        if self.options.ignore_case {
            a == b || a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }

    /// Every basename in `dir` whose key matches `query`, sorted.
    ///
    /// If `query` carries a suffix, candidates must carry the same suffix.
    /// A missing directory has no matches.
    ///
    /// # Errors
    ///
    /// Returns a storage error if `dir` exists but cannot be listed.
    pub fn find_all(&self, dir: &ResourcePath, query: &str) -> Result<Vec<String>> {
        let dir_path = dir.to_path_buf();
        if !self.fs.is_dir(&dir_path) {
            return Ok(Vec::new());
        }

        let (query_key, query_suffix) = split_basename(query);
        let (dirs, files) = self.fs.list(&dir_path)?;
        let mut matches: Vec<String> = dirs
            .into_iter()
            .chain(files)
            .filter(|basename| {
                let (key, suffix) = split_basename(basename);
                self.names_match(key, query_key)
                    && query_suffix.map_or(true, |wanted| suffix == Some(wanted))
            })
            .collect();
        matches.sort();
        Ok(matches)
    }

    /// The single basename in `dir` matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousName`] if more than one entry matches.
    pub fn find(&self, dir: &ResourcePath, query: &str) -> Result<Option<String>> {
        let mut matches = self.find_all(dir, query)?;
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            _ => Err(Error::AmbiguousName {
                parent: dir.to_path_buf(),
                name: query.to_string(),
                candidates: matches,
            }),
        }
    }

    /// Fail if two of `basenames`, listed from `dir`, share a logical name.
    pub(crate) fn ensure_unique_names(
        &self,
        dir: &ResourcePath,
        basenames: &[&String],
    ) -> Result<()> {
        for (i, basename) in basenames.iter().enumerate() {
            let key = split_basename(basename).0;
            let mut candidates: Vec<String> = basenames[i..]
                .iter()
                .filter(|other| self.names_match(split_basename(other).0, key))
                .map(|other| other.to_string())
                .collect();
            if candidates.len() > 1 {
                candidates.sort();
                return Err(Error::AmbiguousName {
                    parent: dir.to_path_buf(),
                    name: key.to_string(),
                    candidates,
                });
            }
        }
        Ok(())
    }

    /// The on-disk path of `path`, recovering a differing suffix.
    pub(crate) fn resolve(&self, path: &ResourcePath) -> Result<Option<ResourcePath>> {
        if self.fs.exists(&path.to_path_buf()) {
            return Ok(Some(path.clone()));
        }
        let Some(parent) = path.parent() else {
            return Ok(None);
        };
        Ok(self
            .find(&parent, path.key())?
            .map(|basename| parent.child(&basename)))
    }
}

impl<F: OsFs + fmt::Debug> fmt::Debug for Store<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("fs", &self.fs)
            .field("logger", &self.logger)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
