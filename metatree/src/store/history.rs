use chrono::NaiveDateTime;
use serde_json::{json, Value};

use crate::fs::OsFs;
use crate::kind::TIMESTAMP_FORMAT;
use crate::path::{ResourcePath, HISTORY, OPTION_SEPARATOR};
use crate::store::{PullOptions, Store};
use crate::tree::{NodeId, Tree};
use crate::{Error, Result};

/// One history snapshot of a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Imprint {
    /// On-disk path of the imprint directory.
    pub path: ResourcePath,
    /// Name of the resource the snapshot was taken from.
    pub name: String,
    /// When the snapshot was taken (one-second resolution, UTC).
    pub timestamp: NaiveDateTime,
    /// Who overwrote the value.
    pub user: String,
    /// Suffix of the captured value.
    pub suffix: Option<String>,
    /// The captured value.
    pub value: Value,
}

impl Imprint {
    /// Directory holding the resource the snapshot belongs to.
    #[must_use]
    pub fn target_dir(&self) -> Option<ResourcePath> {
        self.path.parent().and_then(|history| history.parent())
    }

    /// Basename the restored resource is written under.
    #[must_use]
    pub fn target_basename(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}.{suffix}", self.name),
            None => self.name.clone(),
        }
    }
}

impl<F: OsFs> Store<F> {
    /// Snapshot the leaf at `target` into its parent's `.history`.
    ///
    /// Does nothing if `target` does not exist or is a directory. Snapshots
    /// taken within the same second share a name; the later one wins.
    pub(crate) fn make_history(&self, target: &ResourcePath) -> Result<()> {
        let fs_path = target.to_path_buf();
        if !self.fs.exists(&fs_path) || self.fs.is_dir(&fs_path) {
            return Ok(());
        }
        let Some(parent_dir) = target.parent() else {
            return Ok(());
        };

        let mut scratch = Tree::new();
        let anchor = scratch.add_anchor(&parent_dir)?;
        let snapshot = scratch.add_entry(target.basename(), Some(anchor))?;
        self.pull(
            &mut scratch,
            snapshot,
            PullOptions {
                lazy: true,
                ..PullOptions::default()
            },
        )?;
        let captured = scratch.value(snapshot);

        let timestamp = self.now().format(TIMESTAMP_FORMAT);
        let history = scratch.add_entry(HISTORY, Some(anchor))?;
        let imprint = scratch.add_entry(
            &format!("{}{OPTION_SEPARATOR}{timestamp}.dict", target.key()),
            Some(history),
        )?;

        let user = scratch.add_entry("user", Some(imprint))?;
        scratch.set_value(user, json!(self.options.user))?;

        let value_name = match target.suffix() {
            Some(suffix) => format!("value.{suffix}"),
            None => "value".to_string(),
        };
        let value = scratch.add_entry(&value_name, Some(imprint))?;
        scratch.set_scalar(value, captured, true);

        self.flush_with(&mut scratch, imprint, false)?;
        log::debug!("history: recorded {}", scratch.path(imprint));
        Ok(())
    }

    /// Imprints recorded for `id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors from reading the history directory.
    pub fn history(&self, tree: &Tree, id: NodeId) -> Result<Vec<Imprint>> {
        self.history_of(&tree.path(id))
    }

    /// Imprints recorded for the resource at `target`, newest first.
    ///
    /// Only the name of `target` matters; its suffix is ignored.
    ///
    /// # Errors
    ///
    /// Returns storage errors from reading the history directory.
    pub fn history_of(&self, target: &ResourcePath) -> Result<Vec<Imprint>> {
        let Some(parent_dir) = target.parent() else {
            return Ok(Vec::new());
        };
        let history_dir = parent_dir.child(HISTORY);
        if !self.fs.is_dir(&history_dir.to_path_buf()) {
            return Ok(Vec::new());
        }

        let (dirs, _) = self.fs.list(&history_dir.to_path_buf())?;
        let mut imprints = Vec::new();
        for basename in dirs {
            let candidate = history_dir.child(&basename);
            if !self.names_match(candidate.name(), target.name()) {
                continue;
            }
            let Some(option) = candidate.option() else {
                continue;
            };
            let Ok(timestamp) = NaiveDateTime::parse_from_str(option, TIMESTAMP_FORMAT) else {
                log::debug!("history: skipping {candidate}, unreadable timestamp");
                continue;
            };

            let mut scratch = Tree::new();
            let anchor = scratch.add_anchor(&history_dir)?;
            let node = scratch.add_entry(&basename, Some(anchor))?;
            self.pull(&mut scratch, node, PullOptions::depth(2))?;

            let user = scratch
                .child(node, "user")
                .and_then(|u| scratch.value(u).as_str().map(str::to_string))
                .unwrap_or_default();
            let (suffix, value) = match scratch.child(node, "value") {
                Some(v) => (scratch.suffix(v).map(str::to_string), scratch.value(v)),
                None => (None, Value::Null),
            };

            imprints.push(Imprint {
                name: candidate.name().to_string(),
                path: candidate,
                timestamp,
                user,
                suffix,
                value,
            });
        }

        imprints.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(imprints)
    }

    /// Write an imprint's captured value back to its resource, without
    /// recording new history.
    ///
    /// Unless `keep_history`, every imprint of that resource at least as
    /// new as `imprint` is deleted permanently. Returns the restored path.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if the imprint is not inside a history
    ///   directory
    /// - flush and storage errors
    pub fn restore(&self, imprint: &Imprint, keep_history: bool) -> Result<ResourcePath> {
        let target_dir = imprint.target_dir().ok_or_else(|| Error::InvalidPath {
            path: imprint.path.to_string(),
            reason: "imprint is not inside a history directory".to_string(),
        })?;

        let mut scratch = Tree::new();
        let anchor = scratch.add_anchor(&target_dir)?;
        let entry = scratch.add_entry(&imprint.target_basename(), Some(anchor))?;
        scratch.set_scalar(entry, imprint.value.clone(), true);
        self.flush_with(&mut scratch, entry, false)?;
        let restored = scratch.path(entry);

        if !keep_history {
            for newer in self.history_of(&restored)? {
                if newer.timestamp >= imprint.timestamp {
                    self.recycle_path(&newer.path, true)?;
                }
            }
        }

        self.logger
            .info(&format!("restored {restored} from {}", imprint.timestamp));
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::logging::Logger;
    use crate::store::StoreOptions;
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::Path;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    fn store(seconds: Arc<AtomicI64>) -> Store<MemoryFs> {
        let fs = MemoryFs::new();
        fs.mkdir_all(Path::new("/r")).unwrap();
        Store::with_fs(fs)
            .with_logger(Logger::silent())
            .with_options(StoreOptions {
                user: "marcus".to_string(),
                ..StoreOptions::default()
            })
            .with_clock(move || {
                let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap();
                base + chrono::Duration::seconds(seconds.load(Ordering::SeqCst))
            })
    }

    fn write(store: &Store<MemoryFs>, value: Value) {
        let mut tree = Tree::new();
        let loc = tree.add_location(&ResourcePath::parse("/r").unwrap()).unwrap();
        let age = tree.add_entry("age", Some(loc)).unwrap();
        tree.set_value(age, value).unwrap();
        store.flush(&mut tree, age).unwrap();
    }

    fn target() -> ResourcePath {
        ResourcePath::parse("/r/.meta/age").unwrap()
    }

    #[test]
    fn test_make_history_ignores_missing_target() {
        let store = store(Arc::new(AtomicI64::new(0)));
        store.make_history(&target()).unwrap();
        assert!(!store.fs().exists(Path::new("/r/.meta/.history")));
    }

    #[test]
    fn test_history_lists_newest_first() {
        let clock = Arc::new(AtomicI64::new(0));
        let store = store(clock.clone());
        write(&store, json!(1));
        clock.store(1, Ordering::SeqCst);
        write(&store, json!(2));
        clock.store(2, Ordering::SeqCst);
        write(&store, json!(3));

        let imprints = store.history_of(&target()).unwrap();
        assert_eq!(imprints.len(), 2);
        assert_eq!(imprints[0].value, json!(2));
        assert_eq!(imprints[1].value, json!(1));
        assert_eq!(imprints[0].user, "marcus");
        assert_eq!(imprints[0].suffix.as_deref(), Some("int"));
        assert!(imprints[0].timestamp > imprints[1].timestamp);
    }

    #[test]
    fn test_same_second_collapses() {
        let store = store(Arc::new(AtomicI64::new(0)));
        write(&store, json!(1));
        write(&store, json!(2));
        write(&store, json!(3));
        let imprints = store.history_of(&target()).unwrap();
        assert_eq!(imprints.len(), 1);
        assert_eq!(imprints[0].value, json!(2));
    }

    #[test]
    fn test_restore_drops_newer_imprints() {
        let clock = Arc::new(AtomicI64::new(0));
        let store = store(clock.clone());
        write(&store, json!(1));
        clock.store(1, Ordering::SeqCst);
        write(&store, json!(2.5));
        clock.store(2, Ordering::SeqCst);
        write(&store, json!("three"));

        let imprints = store.history_of(&target()).unwrap();
        let oldest = imprints.last().unwrap().clone();
        assert_eq!(oldest.value, json!(1));

        let restored = store.restore(&oldest, false).unwrap();
        assert_eq!(restored.as_str(), "/r/.meta/age.int");
        assert_eq!(store.fs().read(Path::new("/r/.meta/age.int")).unwrap(), b"1");
        assert!(!store.fs().exists(Path::new("/r/.meta/age.string")));
        assert!(store.history_of(&target()).unwrap().is_empty());
    }

    #[test]
    fn test_restore_keep_history() {
        let clock = Arc::new(AtomicI64::new(0));
        let store = store(clock.clone());
        write(&store, json!(1));
        clock.store(1, Ordering::SeqCst);
        write(&store, json!(2));

        let imprint = store.history_of(&target()).unwrap().remove(0);
        store.restore(&imprint, true).unwrap();
        assert_eq!(store.history_of(&target()).unwrap().len(), 1);
        assert_eq!(store.fs().read(Path::new("/r/.meta/age.int")).unwrap(), b"1");
    }
}
