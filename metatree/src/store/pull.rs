use crate::fs::OsFs;
use crate::path::split_basename;
use crate::store::Store;
use crate::tree::{Layout, NodeId, NodeKind, Tree};
use crate::{Error, Result};

/// How far and how destructively [`Store::pull`] hydrates a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullOptions {
    /// Skip the pull if the node already holds a value.
    pub lazy: bool,
    /// Levels to hydrate: 1 reads the node itself (listing children without
    /// reading them), each extra level reads one more generation.
    pub depth: usize,
    /// Keep existing children and only add those missing.
    pub merge: bool,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            lazy: false,
            depth: 1,
            merge: false,
        }
    }
}

impl PullOptions {
    /// Pull the whole subtree.
    #[must_use]
    pub fn recursive() -> Self {
        Self {
            depth: usize::MAX,
            ..Self::default()
        }
    }

    /// Pull `depth` levels.
    #[must_use]
    pub fn depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

impl<F: OsFs> Store<F> {
    /// Hydrate `id` from disk.
    ///
    /// If the node's exact path is missing, a sibling sharing its name
    /// under another suffix is adopted instead. Empty files leave the value
    /// unset; undecodable files are logged and leave it unset too.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if nothing on disk matches the node's name
    /// - [`Error::AmbiguousName`] if several siblings match
    /// - storage errors from the filesystem
    pub fn pull(&self, tree: &mut Tree, id: NodeId, options: PullOptions) -> Result<()> {
        let mut path = tree.path(id);
        if !self.fs.exists(&path.to_path_buf()) {
            let recovered = match (tree.kind(id), path.parent()) {
                (NodeKind::Entry, Some(parent)) => self.find(&parent, path.key())?,
                _ => None,
            };
            let Some(basename) = recovered else {
                return Err(Error::NotFound {
                    path: path.to_path_buf(),
                });
            };
            log::debug!("pull: {path} resolved to {basename}");
            let own = tree.own_path(id).with_basename(&basename);
            tree.set_own_path(id, own)?;
            path = tree.path(id);
        }

        if options.lazy && tree.has_value(id) {
            return Ok(());
        }
        if !options.merge {
            tree.clear(id);
        }

        let fs_path = path.to_path_buf();
        if self.fs.is_dir(&fs_path) {
            tree.set_layout(id, Layout::Directory);
            tree.set_collection(id);

            let (dirs, files) = self.fs.list(&fs_path)?;
            let basenames: Vec<&String> = dirs.iter().chain(files.iter()).collect();
            self.ensure_unique_names(&path, &basenames)?;

            let mut listed = Vec::with_capacity(dirs.len() + files.len());
            for (basename, layout) in dirs
                .iter()
                .map(|d| (d, Layout::Directory))
                .chain(files.iter().map(|f| (f, Layout::File)))
            {
                if options.merge {
                    if let Some(existing) = tree.child(id, split_basename(basename).0) {
                        listed.push(existing);
                        continue;
                    }
                }
                let child = tree.add_entry(basename, Some(id))?;
                tree.set_layout(child, layout);
                tree.set_dirty(child, false);
                listed.push(child);
            }

            if options.depth > 1 {
                let child_options = PullOptions {
                    depth: options.depth - 1,
                    ..options
                };
                for child in listed {
                    self.pull(tree, child, child_options)?;
                }
            }
        } else {
            if tree.kind(id) != NodeKind::Entry {
                return Err(Error::NotACollection {
                    path: path.to_string(),
                });
            }
            tree.set_layout(id, Layout::File);

            let bytes = self.fs.read(&fs_path)?;
            let decoded = match String::from_utf8(bytes) {
                Ok(text) if text.trim().is_empty() => {
                    log::debug!("pull: {path} is empty");
                    None
                }
                Ok(text) => Some(self.codec.decode(&text).map_err(|e| e.to_string())),
                Err(err) => Some(Err(format!("not UTF-8 ({err})"))),
            };
            match decoded {
                Some(Ok(value)) => {
                    tree.set_scalar(id, value, false);
                }
                Some(Err(reason)) => {
                    self.logger
                        .warn(&format!("{path} contains invalid value: {reason}"));
                }
                None => {}
            }
        }

        tree.set_dirty(id, false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::logging::Logger;
    use crate::path::ResourcePath;
    use serde_json::json;
    use std::path::Path;

    fn store(files: &[(&str, &str)]) -> Store<MemoryFs> {
        let fs = MemoryFs::new();
        fs.mkdir_all(Path::new("/r/.meta")).unwrap();
        for (file, content) in files {
            fs.write(Path::new(file), content.as_bytes()).unwrap();
        }
        Store::with_fs(fs).with_logger(Logger::silent())
    }

    fn location(tree: &mut Tree) -> NodeId {
        tree.add_location(&ResourcePath::parse("/r").unwrap()).unwrap()
    }

    #[test]
    fn test_pull_leaf() {
        let store = store(&[("/r/.meta/age.int", "27")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age.int", Some(loc)).unwrap();
        store.pull(&mut tree, age, PullOptions::default()).unwrap();
        assert_eq!(tree.value(age), json!(27));
        assert_eq!(tree.layout(age), Layout::File);
        assert!(!tree.is_dirty(age));
    }

    #[test]
    fn test_pull_recovers_suffix() {
        let store = store(&[("/r/.meta/age.float", "28.5")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age", Some(loc)).unwrap();
        store.pull(&mut tree, age, PullOptions::default()).unwrap();
        assert_eq!(tree.suffix(age), Some("float"));
        assert_eq!(tree.value(age), json!(28.5));
    }

    #[test]
    fn test_pull_missing_is_not_found() {
        let store = store(&[]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age", Some(loc)).unwrap();
        let err = store.pull(&mut tree, age, PullOptions::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pull_missing_location_is_not_found() {
        let store = store(&[]);
        let mut tree = Tree::new();
        let loc = tree
            .add_location(&ResourcePath::parse("/elsewhere").unwrap())
            .unwrap();
        assert!(store
            .pull(&mut tree, loc, PullOptions::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_pull_empty_file_reads_default() {
        let store = store(&[("/r/.meta/name.string", ""), ("/r/.meta/flag.bool", "")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let name = tree.add_entry("name", Some(loc)).unwrap();
        let flag = tree.add_entry("flag", Some(loc)).unwrap();
        store.pull(&mut tree, name, PullOptions::default()).unwrap();
        store.pull(&mut tree, flag, PullOptions::default()).unwrap();
        assert!(!tree.has_value(name));
        assert_eq!(tree.value(name), json!(""));
        assert_eq!(tree.value(flag), json!(false));
    }

    #[test]
    fn test_pull_invalid_content_is_unset() {
        let store = store(&[("/r/.meta/age.int", "{broken")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age", Some(loc)).unwrap();
        store.pull(&mut tree, age, PullOptions::default()).unwrap();
        assert!(!tree.has_value(age));
        assert_eq!(tree.value(age), json!(0));
    }

    #[test]
    fn test_pull_invalid_utf8_is_unset() {
        let store = store(&[]);
        store
            .fs()
            .write(Path::new("/r/.meta/name.string"), &[b'"', 0xff, 0xfe, b'"'])
            .unwrap();
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let name = tree.add_entry("name", Some(loc)).unwrap();
        store.pull(&mut tree, name, PullOptions::default()).unwrap();
        assert!(!tree.has_value(name));
        assert_eq!(tree.value(name), json!(""));
    }

    #[test]
    fn test_pull_keeps_float_suffix_for_integral_content() {
        let store = store(&[("/r/.meta/ratio.float", "2")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let ratio = tree.add_entry("ratio", Some(loc)).unwrap();
        store.pull(&mut tree, ratio, PullOptions::default()).unwrap();
        assert_eq!(tree.suffix(ratio), Some("float"));
        assert_eq!(tree.value(ratio), json!(2.0));
    }

    #[test]
    fn test_pull_directory_lists_children_unresolved() {
        let store = store(&[
            ("/r/.meta/group.dict/a.int", "1"),
            ("/r/.meta/group.dict/b.bool", "true"),
        ]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let group = tree.add_entry("group", Some(loc)).unwrap();
        store.pull(&mut tree, group, PullOptions::default()).unwrap();

        let a = tree.child(group, "a").unwrap();
        assert_eq!(tree.suffix(a), Some("int"));
        assert!(!tree.has_value(a));
        assert_eq!(tree.layout(a), Layout::File);
    }

    #[test]
    fn test_pull_depth_two_reads_children() {
        let store = store(&[
            ("/r/.meta/group.dict/a.int", "1"),
            ("/r/.meta/group.dict/b.bool", "true"),
        ]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let group = tree.add_entry("group", Some(loc)).unwrap();
        store.pull(&mut tree, group, PullOptions::depth(2)).unwrap();
        assert_eq!(tree.value(group), json!({"a": 1, "b": true}));
    }

    #[test]
    fn test_pull_untyped_directory_is_collection() {
        let store = store(&[("/r/.meta/group/a.int", "1")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let group = tree.add_entry("group", Some(loc)).unwrap();
        store.pull(&mut tree, group, PullOptions::depth(2)).unwrap();
        assert_eq!(tree.suffix(group), None);
        assert!(tree.is_collection(group));
        assert_eq!(tree.value(group), json!({"a": 1}));
    }

    #[test]
    fn test_pull_lazy_skips_existing_value() {
        let store = store(&[("/r/.meta/age.int", "27")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age", Some(loc)).unwrap();
        tree.set_value(age, json!(99)).unwrap();
        let options = PullOptions {
            lazy: true,
            ..PullOptions::default()
        };
        store.pull(&mut tree, age, options).unwrap();
        assert_eq!(tree.value(age), json!(99));
    }

    #[test]
    fn test_pull_merge_keeps_existing_children() {
        let store = store(&[("/r/.meta/age.int", "27")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let pending = tree.add_entry("pending", Some(loc)).unwrap();
        tree.set_value(pending, json!("not flushed")).unwrap();

        let options = PullOptions {
            merge: true,
            ..PullOptions::default()
        };
        store.pull(&mut tree, loc, options).unwrap();
        assert_eq!(tree.child(loc, "pending"), Some(pending));
        assert!(tree.child(loc, "age").is_some());

        store.pull(&mut tree, loc, PullOptions::default()).unwrap();
        assert_eq!(tree.child(loc, "pending"), None);
    }

    #[test]
    fn test_pull_ambiguous_name() {
        let store = store(&[("/r/.meta/age.int", "1"), ("/r/.meta/age.float", "1.5")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        let age = tree.add_entry("age", Some(loc)).unwrap();
        let err = store.pull(&mut tree, age, PullOptions::default()).unwrap_err();
        assert!(matches!(err, Error::AmbiguousName { .. }));
    }

    #[test]
    fn test_pull_directory_with_clashing_names() {
        let store = store(&[("/r/.meta/age.int", "27"), ("/r/.meta/age.float", "28.5")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        match store.pull(&mut tree, loc, PullOptions::default()).unwrap_err() {
            Error::AmbiguousName { name, candidates, .. } => {
                assert_eq!(name, "age");
                assert_eq!(candidates, vec!["age.float", "age.int"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pull_directory_clash_ignores_case_by_default() {
        let store = store(&[("/r/.meta/Age.int", "1"), ("/r/.meta/age.int", "2")]);
        let mut tree = Tree::new();
        let loc = location(&mut tree);
        assert!(matches!(
            store.pull(&mut tree, loc, PullOptions::default()),
            Err(Error::AmbiguousName { .. })
        ));
    }
}
