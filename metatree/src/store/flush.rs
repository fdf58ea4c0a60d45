use crate::fs::OsFs;
use crate::store::Store;
use crate::tree::{NodeId, NodeKind, Tree};
use crate::{Error, Result};

impl<F: OsFs> Store<F> {
    /// Persist `id` and its subtree, recording history for overwritten
    /// leaves when the store tracks history.
    ///
    /// # Errors
    ///
    /// See [`Store::flush_with`].
    pub fn flush(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        self.flush_with(tree, id, self.options.track_history)
    }

    /// Persist `id` and its subtree.
    ///
    /// For every entry, an existing on-disk sibling sharing its name (under
    /// any suffix) is first snapshotted into history if it is a leaf and
    /// `track_history` is set, then recycled to the trash if its path
    /// differs. Collections become directories; leaves are encoded and
    /// written. A leaf with neither a known suffix nor a value is skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if a location's directory does not exist
    /// - [`Error::AmbiguousName`] if several siblings share the name; nothing
    ///   is written for that entry
    /// - [`Error::AbsolutePathExpected`] if an entry is not attached to a
    ///   location or anchor
    /// - encode and storage errors
    pub fn flush_with(&self, tree: &mut Tree, id: NodeId, track_history: bool) -> Result<()> {
        match tree.kind(id) {
            NodeKind::Location | NodeKind::Anchor => {
                let path = tree.path(id);
                if tree.kind(id) == NodeKind::Location {
                    let dir = tree.own_path(id).to_path_buf();
                    if !self.fs.is_dir(&dir) {
                        return Err(Error::NotFound { path: dir });
                    }
                }
                self.fs.mkdir_all(&path.to_path_buf())?;
                for child in tree.children(id) {
                    self.flush_with(tree, child, track_history)?;
                }
            }
            NodeKind::Entry => self.flush_entry(tree, id, track_history)?,
        }

        tree.set_dirty(id, false);
        Ok(())
    }

    fn flush_entry(&self, tree: &mut Tree, id: NodeId, track_history: bool) -> Result<()> {
        let path = tree.path(id);
        let Some(parent_dir) = path.parent().filter(|_| path.is_absolute()) else {
            return Err(Error::AbsolutePathExpected {
                path: path.to_string(),
            });
        };

        let is_collection = tree.is_collection(id);
        let encoded = if is_collection {
            None
        } else {
            if tree.value_kind(id).is_none() && !tree.has_value(id) {
                self.logger
                    .warn(&format!("cannot flush {path}, it has no value"));
                return Ok(());
            }
            Some(self.codec.encode(&tree.value(id))?)
        };

        if let Some(existing) = self.find(&parent_dir, path.key())? {
            let existing_path = parent_dir.child(&existing);
            let existing_fs = existing_path.to_path_buf();
            let existing_is_dir = self.fs.is_dir(&existing_fs);
            let same_path = existing == path.basename() && existing_is_dir == is_collection;

            let unchanged = same_path
                && encoded.as_ref().is_some_and(|text| {
                    self.fs
                        .read(&existing_fs)
                        .is_ok_and(|bytes| bytes == text.as_bytes())
                });
            if unchanged {
                log::debug!("flush: {path} is unchanged");
                return Ok(());
            }

            if track_history && !existing_is_dir {
                self.make_history(&existing_path)?;
            }
            if !same_path {
                log::debug!("flush: replacing {existing_path} with {path}");
                self.recycle_path(&existing_path, false)?;
            }
        }

        let fs_path = path.to_path_buf();
        match encoded {
            None => {
                self.fs.mkdir_all(&fs_path)?;
                for child in tree.children(id) {
                    self.flush_with(tree, child, track_history)?;
                }
            }
            Some(text) => {
                self.fs.write(&fs_path, text.as_bytes())?;
                log::debug!("flush: wrote {path}");
            }
        }
        Ok(())
    }
}
