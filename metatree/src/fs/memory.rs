use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fs::OsFs;
use crate::{Error, Result};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory [`OsFs`].
///
/// Paths are compared component-wise; the root `/` always exists.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl MemoryFs {
    /// An empty filesystem holding only `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: Mutex::new(nodes),
        }
    }

    /// Every path currently stored, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_dirs(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) -> Result<()> {
        for ancestor in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            match nodes.get(ancestor) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => {
                    return Err(Error::Storage {
                        path: ancestor.to_path_buf(),
                        source: io::Error::new(io::ErrorKind::Other, "not a directory"),
                    })
                }
                None => {
                    nodes.insert(ancestor.to_path_buf(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn subtree(nodes: &BTreeMap<PathBuf, Node>, root: &Path) -> Vec<PathBuf> {
        nodes
            .keys()
            .filter(|k| k.starts_with(root))
            .cloned()
            .collect()
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> Error {
    Error::NotFound {
        path: path.to_path_buf(),
    }
}

impl OsFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(Node::Dir))
    }

    fn list(&self, path: &Path) -> Result<(Vec<String>, Vec<String>)> {
        let nodes = self.lock();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(Error::Storage {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, "not a directory"),
                })
            }
            None => return Err(not_found(path)),
        }

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for (key, node) in nodes.iter() {
            if key.parent() != Some(path) {
                continue;
            }
            let Some(name) = key.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match node {
                Node::Dir => dirs.push(name.to_string()),
                Node::File(_) => files.push(name.to_string()),
            }
        }
        Ok((dirs, files))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match self.lock().get(path) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            Some(Node::Dir) => Err(Error::Storage {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            }),
            None => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut nodes = self.lock();
        if let Some(parent) = path.parent() {
            Self::insert_dirs(&mut nodes, parent)?;
        }
        if matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(Error::Storage {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            });
        }
        nodes.insert(path.to_path_buf(), Node::File(contents.to_vec()));
        Ok(())
    }

    fn mkdir_all(&self, path: &Path) -> Result<()> {
        Self::insert_dirs(&mut self.lock(), path)
    }

    fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        let mut nodes = self.lock();
        if !nodes.contains_key(src) {
            return Err(not_found(src));
        }
        if let Some(parent) = dst.parent() {
            if !matches!(nodes.get(parent), Some(Node::Dir)) {
                return Err(not_found(parent));
            }
        }

        for stale in Self::subtree(&nodes, dst) {
            nodes.remove(&stale);
        }
        for old in Self::subtree(&nodes, src) {
            if let Some(node) = nodes.remove(&old) {
                let relative = old.strip_prefix(src).unwrap_or(Path::new(""));
                let new = if relative.as_os_str().is_empty() {
                    dst.to_path_buf()
                } else {
                    dst.join(relative)
                };
                nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let mut nodes = self.lock();
        if !nodes.contains_key(path) {
            return Err(not_found(path));
        }
        for key in Self::subtree(&nodes, path) {
            nodes.remove(&key);
        }
        Ok(())
    }
}
