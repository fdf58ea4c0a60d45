use crate::fs::OsFs;
use crate::store::Store;
use crate::tree::{NodeId, Tree};
use crate::{Error, Result};

/// Options for [`Store::inherit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InheritOptions {
    /// Number of ancestor directories to consult above the resource's own
    /// location; 0 walks up to the filesystem root.
    pub depth: usize,
    /// Keep the resource's current content and layer inherited values on
    /// top of it.
    pub merge: bool,
    /// Skip if the resource already holds a value.
    pub lazy: bool,
}

impl<F: OsFs> Store<F> {
    /// Replace `id` with the override-resolved view of its metapath across
    /// its location and every ancestor directory.
    ///
    /// Levels are applied from the farthest ancestor to the resource's own
    /// location. A collection level adds its children one by one, replacing
    /// same-named children from farther levels; a scalar level replaces the
    /// value outright. Levels where the metapath is absent contribute
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if `id` is not inside a metadata container
    /// - storage errors other than missing paths
    pub fn inherit(&self, tree: &mut Tree, id: NodeId, options: InheritOptions) -> Result<()> {
        if options.lazy && tree.has_value(id) {
            return Ok(());
        }

        let path = tree.path(id);
        let metapath = path.meta().ok_or_else(|| Error::InvalidPath {
            path: path.to_string(),
            reason: "not inside a metadata container".to_string(),
        })?;

        let mut levels = Vec::new();
        let mut dir = Some(path.location());
        let mut visited = 0;
        while let Some(current) = dir {
            if options.depth > 0 && visited > options.depth {
                break;
            }
            let mut scratch = Tree::new();
            match self.read_into(&mut scratch, &current, &metapath, usize::MAX) {
                Ok(Some(found)) => {
                    log::debug!("inherit: {metapath} found under {current}");
                    levels.push((scratch, found));
                }
                Ok(None) => {}
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
            visited += 1;
            dir = current.parent();
        }

        if !options.merge {
            tree.clear(id);
        }

        for (scratch, found) in levels.iter().rev() {
            if scratch.is_collection(*found) {
                for child in scratch.children(*found) {
                    if scratch.own_path(child).is_hidden() {
                        continue;
                    }
                    tree.graft(id, scratch, child)?;
                }
            } else {
                let value = scratch.value(*found);
                if let Some(suffix) = scratch.suffix(*found) {
                    if !tree.own_path(id).is_hidden() {
                        let own = tree.own_path(id).with_suffix(suffix);
                        tree.set_own_path(id, own)?;
                    }
                }
                tree.set_scalar(id, value, false);
            }
        }
        Ok(())
    }
}
