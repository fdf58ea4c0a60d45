use crate::fs::OsFs;
use crate::path::{ResourcePath, TRASH};
use crate::store::Store;
use crate::tree::{NodeId, Tree};
use crate::{Error, Result};

impl<F: OsFs> Store<F> {
    /// Remove the resource `id` from disk and detach it from its parent.
    ///
    /// Without `permanent` the resource is moved into its parent's `.trash`,
    /// replacing any earlier trashed resource of the same name. Returns
    /// `false` (with a warning) if nothing exists on disk under its name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousName`] or storage errors.
    ///
    /// # Panics
    ///
    /// Panics if the trash destination still exists after the earlier
    /// trashed copy was deleted.
    pub fn remove(&self, tree: &mut Tree, id: NodeId, permanent: bool) -> Result<bool> {
        let path = tree.path(id);
        let Some(target) = self.resolve(&path)? else {
            self.logger.warn(&format!("{path} does not exist"));
            return Ok(false);
        };

        self.recycle_path(&target, permanent)?;
        tree.detach(id);
        Ok(true)
    }

    /// Move `target` into the trash, or delete it when `permanent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for a root path, or storage errors.
    ///
    /// # Panics
    ///
    /// Panics if the trash destination still exists after the earlier
    /// trashed copy was deleted.
    pub fn recycle_path(&self, target: &ResourcePath, permanent: bool) -> Result<()> {
        let fs_path = target.to_path_buf();
        if permanent {
            self.fs.remove_all(&fs_path)?;
            self.logger.info(&format!("permanently removed {target}"));
            return Ok(());
        }

        let parent = target.parent().ok_or_else(|| Error::InvalidPath {
            path: target.to_string(),
            reason: "a root cannot be moved to the trash".to_string(),
        })?;
        let trash = parent.child(TRASH);

        for stale in self.find_all(&trash, target.key())? {
            log::debug!("trash: dropping earlier {stale}");
            self.fs.remove_all(&trash.child(&stale).to_path_buf())?;
        }

        let destination = trash.child(target.basename());
        let destination_fs = destination.to_path_buf();
        assert!(
            !self.fs.exists(&destination_fs),
            "trash destination {destination} exists after cleanup"
        );

        self.fs.mkdir_all(&trash.to_path_buf())?;
        self.fs.rename(&fs_path, &destination_fs)?;
        self.logger.info(&format!("moved {target} to the trash"));
        Ok(())
    }
}
