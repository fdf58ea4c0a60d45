use serde_json::Value;

use crate::fs::OsFs;
use crate::path::{split_basename, MetaPath, ResourcePath, CONTAINER};
use crate::store::{PullOptions, Store};
use crate::tree::{NodeId, Tree};
use crate::{Error, Result};

/// What [`Store::read`] found at a metapath.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// A leaf's value.
    Value(Value),
    /// The names of a collection's visible children.
    Children(Vec<String>),
}

impl Reading {
    /// Summarize a node: its value if it is a leaf, its child names
    /// otherwise.
    #[must_use]
    pub fn from_node(tree: &Tree, node: NodeId) -> Self {
        if tree.is_collection(node) {
            Self::Children(
                tree.children(node)
                    .into_iter()
                    .filter(|c| !tree.own_path(*c).is_hidden())
                    .map(|c| tree.own_path(c).name().to_string())
                    .collect(),
            )
        } else {
            Self::Value(tree.value(node))
        }
    }
}

fn location_dir(dir: &ResourcePath) -> ResourcePath {
    if dir.basename() == CONTAINER {
        dir.parent().unwrap_or_else(|| dir.clone())
    } else {
        dir.clone()
    }
}

impl<F: OsFs> Store<F> {
    /// Load the resource at `metapath` under the location `dir` into `tree`,
    /// pulling `depth` levels of it.
    ///
    /// `dir` may name the container itself. Segments of `metapath` may carry
    /// a suffix, which must then match. Returns `None` if the location has
    /// no container or the metapath is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousName`] or storage errors.
    pub fn read_into(
        &self,
        tree: &mut Tree,
        dir: &ResourcePath,
        metapath: &MetaPath,
        depth: usize,
    ) -> Result<Option<NodeId>> {
        let location = tree.add_location(&location_dir(dir))?;
        if !self.fs.is_dir(&tree.path(location).to_path_buf()) {
            return Ok(None);
        }

        let mut current = location;
        for part in metapath.parts() {
            self.pull(tree, current, PullOptions::default())?;
            let (key, suffix) = split_basename(part);
            let Some(found) = tree
                .children(current)
                .into_iter()
                .find(|child| self.names_match(tree.key(*child), key))
            else {
                return Ok(None);
            };
            if suffix.is_some() && tree.suffix(found) != suffix {
                return Ok(None);
            }
            current = found;
        }

        self.pull(tree, current, PullOptions::depth(depth.max(1)))?;
        Ok(Some(current))
    }

    /// Read the value or child names at `metapath` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousName`] or storage errors.
    pub fn read(&self, dir: &ResourcePath, metapath: &MetaPath) -> Result<Option<Reading>> {
        let mut tree = Tree::new();
        let Some(node) = self.read_into(&mut tree, dir, metapath, 1)? else {
            return Ok(None);
        };
        Ok(Some(Reading::from_node(&tree, node)))
    }

    /// Write `value` at `metapath` under the existing directory `dir`.
    ///
    /// Missing intermediate collections are created; existing ones are
    /// reused, and an intermediate that exists as a leaf is replaced
    /// (recorded in history and moved to the trash).
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `dir` does not exist
    /// - [`Error::InvalidValue`] if `metapath` is empty
    /// - flush errors
    pub fn write(&self, dir: &ResourcePath, metapath: &MetaPath, value: Value) -> Result<()> {
        let dir = location_dir(dir);
        if !self.fs.is_dir(&dir.to_path_buf()) {
            return Err(Error::NotFound {
                path: dir.to_path_buf(),
            });
        }
        let Some((last, intermediates)) = metapath.parts().split_last() else {
            return Err(Error::InvalidValue {
                reason: "cannot assign a value to a location itself".to_string(),
            });
        };

        let mut tree = Tree::new();
        let location = tree.add_location(&dir)?;
        let mut current = location;
        let mut top = None;

        for part in intermediates {
            let parent_path = tree.path(current);
            let existing = self
                .find(&parent_path, split_basename(part).0)?
                .filter(|b| self.fs.is_dir(&parent_path.child(b).to_path_buf()));
            let child = match existing {
                Some(basename) => tree.add_entry(&basename, Some(current))?,
                None => tree.add_entry(part, Some(current))?,
            };
            top.get_or_insert(child);
            current = child;
        }

        let leaf = tree.add_entry(last, Some(current))?;
        tree.set_value(leaf, value)?;
        let top = top.unwrap_or(leaf);

        self.flush(&mut tree, top)?;
        self.logger
            .info(&format!("wrote {}", tree.path(leaf)));
        Ok(())
    }

    /// Remove the whole metadata container of `dir`.
    ///
    /// Returns `false` if `dir` has no container.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    pub fn clear(&self, dir: &ResourcePath, permanent: bool) -> Result<bool> {
        let mut tree = Tree::new();
        let location = tree.add_location(&location_dir(dir))?;
        self.remove(&mut tree, location, permanent)
    }

    /// `dir` and each of its ancestors that hosts a container, nearest
    /// first.
    #[must_use]
    pub fn locations(&self, dir: &ResourcePath) -> Vec<ResourcePath> {
        std::iter::successors(Some(location_dir(dir)), ResourcePath::parent)
            .filter(|d| self.fs.is_dir(&d.child(CONTAINER).to_path_buf()))
            .collect()
    }

    /// Whether `id` exists on disk under any suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousName`] or storage errors.
    pub fn exists(&self, tree: &Tree, id: NodeId) -> Result<bool> {
        Ok(self.resolve(&tree.path(id))?.is_some())
    }

    /// Save the current state of a location as a new version.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn save(&self, _tree: &Tree, _id: NodeId) -> Result<()> {
        Err(Error::NotImplemented { feature: "versions" })
    }

    /// Retrieve a saved version of a location.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn version(&self, _tree: &mut Tree, _id: NodeId, _version: &str) -> Result<()> {
        Err(Error::NotImplemented { feature: "versions" })
    }

    /// List saved versions of a location.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn versions(&self, _tree: &Tree, _id: NodeId) -> Result<Vec<String>> {
        Err(Error::NotImplemented { feature: "versions" })
    }
}
