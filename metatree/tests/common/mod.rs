//! Common test utilities for integration tests.
//!
//! Each fixture owns a temporary directory that is removed when the
//! fixture is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use metatree::{Logger, NodeId, ResourcePath, Store, StoreOptions, Tree};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// User recorded in history by fixture stores.
pub const TEST_USER: &str = "tester";

/// A temporary root directory plus a store with a controllable clock.
pub struct Fixture {
    dir: TempDir,
    seconds: Arc<AtomicI64>,
    store: Store,
}

#[allow(dead_code)]
impl Fixture {
    /// Creates a fixture with an empty root and the clock at 2024-01-02 03:04:00.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let seconds = Arc::new(AtomicI64::new(0));
        let clock = seconds.clone();
        let store = Store::new()
            .with_logger(Logger::silent())
            .with_options(StoreOptions {
                user: TEST_USER.to_string(),
                ..StoreOptions::default()
            })
            .with_clock(move || {
                let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap();
                base + chrono::Duration::seconds(clock.load(Ordering::SeqCst))
            });
        Self {
            dir,
            seconds,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Moves the store's clock forward.
    pub fn tick(&self, seconds: i64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The root, or a subdirectory of it, created if needed.
    pub fn dir(&self, relative: &str) -> ResourcePath {
        let path = if relative.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(relative)
        };
        fs::create_dir_all(&path).unwrap();
        ResourcePath::from_path(&path).unwrap()
    }

    /// Absolute on-disk path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Names in a directory under the root, sorted.
    pub fn names(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Builds `location/entry` in `tree`, sets `value` and flushes it.
    pub fn write_entry(&self, tree: &mut Tree, dir: &str, name: &str, value: Value) -> NodeId {
        let location = tree.add_location(&self.dir(dir)).unwrap();
        let entry = tree.add_entry(name, Some(location)).unwrap();
        tree.set_value(entry, value).unwrap();
        self.store.flush(tree, entry).unwrap();
        entry
    }

    /// A fresh tree holding an unhydrated `location/entry`.
    pub fn bare_entry(&self, dir: &str, name: &str) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let location = tree.add_location(&self.dir(dir)).unwrap();
        let entry = tree.add_entry(name, Some(location)).unwrap();
        (tree, entry)
    }
}
