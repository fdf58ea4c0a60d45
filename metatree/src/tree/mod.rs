//! In-memory resource tree.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. A child has exactly one owning parent (the collection whose
//! child map holds its id); the `parent` field of a node is a back-reference
//! only, so copying a node never touches the original's child map.
//!
//! A node switches between scalar and collection only through
//! [`Tree::set_value`] and [`Tree::add_child`], both of which return the
//! variant that was replaced.
//!
//! # Examples
//!
//! ```
//! use metatree::{ResourcePath, Tree};
//! use serde_json::json;
//!
//! let mut tree = Tree::new();
//! let root = ResourcePath::parse("/projects/hulk").unwrap();
//! let location = tree.add_location(&root).unwrap();
//!
//! let age = tree.add_entry("age", Some(location)).unwrap();
//! tree.set_value(age, json!(27)).unwrap();
//!
//! assert_eq!(tree.path(age).as_str(), "/projects/hulk/.meta/age.int");
//! assert_eq!(tree.value(age), json!(27));
//! ```

mod node;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::{Map, Value};

use crate::kind::ValueKind;
use crate::path::{ResourcePath, CONTAINER};
use crate::{Error, Result};

pub(crate) use node::Node;
pub use node::{Layout, NodeId, NodeKind, NodeValue};

/// Arena of resource nodes.
///
/// Methods taking a [`NodeId`] panic if the id was issued by another tree.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated (detached nodes included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Add a location for the directory `dir`.
    ///
    /// The directory does not have to exist yet; operations that touch disk
    /// check for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsolutePathExpected`] if `dir` is relative.
    pub fn add_location(&mut self, dir: &ResourcePath) -> Result<NodeId> {
        if dir.is_relative() {
            return Err(Error::AbsolutePathExpected {
                path: dir.to_string(),
            });
        }
        Ok(self.alloc(Node::new(NodeKind::Location, dir.clone())))
    }

    /// Add an anchor: a bare absolute directory whose entries are stored
    /// directly inside it rather than under a container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsolutePathExpected`] if `dir` is relative.
    pub fn add_anchor(&mut self, dir: &ResourcePath) -> Result<NodeId> {
        if dir.is_relative() {
            return Err(Error::AbsolutePathExpected {
                path: dir.to_string(),
            });
        }
        Ok(self.alloc(Node::new(NodeKind::Anchor, dir.clone())))
    }

    /// Add an entry whose path is relative to `parent`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if `path` is empty or climbs with `..`
    /// - [`Error::RelativePathExpected`] if `path` is absolute
    pub fn add_entry(&mut self, path: &str, parent: Option<NodeId>) -> Result<NodeId> {
        let path = ResourcePath::parse(path)?;
        if path.is_absolute() {
            return Err(Error::RelativePathExpected {
                path: path.to_string(),
            });
        }
        if path.segments().any(|s| s == "..") {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "entry paths may not climb above their parent".to_string(),
            });
        }

        let id = self.alloc(Node::new(NodeKind::Entry, path));
        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        Ok(id)
    }

    /// Make `child` a child of `parent`, keyed by its name plus option.
    ///
    /// A scalar or unset `parent` becomes an empty collection first (an
    /// entry also takes the `dict` suffix unless it already has a collection
    /// suffix). A same-key child is overwritten and detached. Returns the
    /// variant `parent` held before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `child` is not an entry or if the
    /// insertion would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeValue> {
        if self.kind(child) != NodeKind::Entry {
            return Err(Error::InvalidValue {
                reason: format!("{} cannot be the child of another resource", self.path(child)),
            });
        }
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return Err(Error::InvalidValue {
                reason: format!("{} cannot contain itself", self.path(child)),
            });
        }

        let previous = self.node(parent).value.clone();
        if !matches!(previous, NodeValue::Collection(_)) {
            self.make_collection(parent);
        }

        self.detach(child);
        let key = self.key(child).to_string();
        let replaced = match &mut self.node_mut(parent).value {
            NodeValue::Collection(children) => children.insert(key, child),
            _ => None,
        };
        if let Some(replaced) = replaced.filter(|r| *r != child) {
            self.node_mut(replaced).parent = None;
        }

        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).dirty = true;
        Ok(previous)
    }

    fn make_collection(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.value = NodeValue::Collection(BTreeMap::new());
        if node.kind == NodeKind::Entry && !node.path.is_hidden() {
            let is_collection_kind = node
                .path
                .suffix()
                .and_then(ValueKind::from_suffix)
                .is_some_and(ValueKind::is_collection);
            if !is_collection_kind {
                node.path = node.path.with_suffix(ValueKind::Dict.suffix());
            }
        }
    }

    /// Assign a value and mark the node dirty.
    ///
    /// The suffix is re-inferred from `value` (keeping a compatible existing
    /// suffix), existing children are discarded, and an object value becomes
    /// one child entry per key. Returns the variant held before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `id` is not an entry or an object
    /// key cannot be used as a name.
    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<NodeValue> {
        self.assign(id, value, true)
    }

    /// Like [`Tree::set_value`], without marking anything dirty.
    ///
    /// Used when hydrating from disk.
    ///
    /// # Errors
    ///
    /// Same as [`Tree::set_value`].
    pub fn load_value(&mut self, id: NodeId, value: Value) -> Result<NodeValue> {
        self.assign(id, value, false)
    }

    fn assign(&mut self, id: NodeId, value: Value, dirty: bool) -> Result<NodeValue> {
        if self.kind(id) != NodeKind::Entry {
            return Err(Error::InvalidValue {
                reason: format!("cannot assign a value to location {}", self.path(id)),
            });
        }

        let kind = ValueKind::infer(&value, self.value_kind(id));
        let value = kind.coerce(value);
        let previous = self.clear(id);
        {
            let node = self.node_mut(id);
            if !node.path.is_hidden() {
                node.path = node.path.with_suffix(kind.suffix());
            }
            node.layout = Layout::Unknown;
            node.dirty = dirty;
        }

        match value {
            Value::Object(map) => {
                self.node_mut(id).value = NodeValue::Collection(BTreeMap::new());
                for (key, child_value) in map {
                    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
                        return Err(Error::InvalidValue {
                            reason: format!("'{key}' cannot be used as a name"),
                        });
                    }
                    let basename = if key.starts_with('.') {
                        key
                    } else {
                        let child_kind = ValueKind::infer(&child_value, None);
                        format!("{key}.{}", child_kind.suffix())
                    };
                    let child = self.alloc(Node::new(NodeKind::Entry, ResourcePath::parse(&basename)?));
                    self.assign(child, child_value, dirty)?;
                    self.add_child(id, child)?;
                }
                self.node_mut(id).dirty = dirty;
            }
            other => self.node_mut(id).value = NodeValue::Scalar(other),
        }

        Ok(previous)
    }

    /// Store `value` as a leaf without re-inferring the suffix.
    ///
    /// Hydrating from a file and restoring a snapshot go through here so
    /// that the on-disk suffix stays authoritative.
    pub(crate) fn set_scalar(&mut self, id: NodeId, value: Value, dirty: bool) -> NodeValue {
        let value = match self.value_kind(id) {
            Some(kind) => kind.coerce(value),
            None => value,
        };
        let previous = self.clear(id);
        let node = self.node_mut(id);
        node.value = NodeValue::Scalar(value);
        node.dirty = dirty;
        previous
    }

    /// The node's value.
    ///
    /// An unset node reads as its suffix default (null when it has none);
    /// a collection reads as an object of its children (an array for
    /// `list`).
    #[must_use]
    pub fn value(&self, id: NodeId) -> Value {
        let node = self.node(id);
        match &node.value {
            NodeValue::Scalar(value) => value.clone(),
            NodeValue::Collection(children) => {
                if self.value_kind(id) == Some(ValueKind::List) {
                    Value::Array(
                        list_order(children)
                            .into_iter()
                            .map(|c| self.value(c))
                            .collect(),
                    )
                } else {
                    Value::Object(
                        children
                            .iter()
                            .map(|(k, c)| (k.clone(), self.value(*c)))
                            .collect::<Map<_, _>>(),
                    )
                }
            }
            NodeValue::Unset => match node.kind {
                NodeKind::Location | NodeKind::Anchor => Value::Object(Map::new()),
                NodeKind::Entry => self
                    .value_kind(id)
                    .map_or(Value::Null, ValueKind::default_value),
            },
        }
    }

    /// The raw content of a node.
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> &NodeValue {
        &self.node(id).value
    }

    /// Whether a value was loaded or assigned (children count as a value).
    #[must_use]
    pub fn has_value(&self, id: NodeId) -> bool {
        !self.node(id).value.is_unset()
    }

    /// Reset to unset, detaching every child. Returns the previous variant.
    pub fn clear(&mut self, id: NodeId) -> NodeValue {
        let previous = std::mem::take(&mut self.node_mut(id).value);
        if let NodeValue::Collection(children) = &previous {
            for child in children.values() {
                self.node_mut(*child).parent = None;
            }
        }
        previous
    }

    /// Copy a node.
    ///
    /// - `path` replaces the copy's own path
    /// - `deep` copies children recursively; a shallow copy of a collection
    ///   is an empty collection
    /// - `parent` adds the copy to that node; without it the copy only keeps
    ///   a back-reference to the original's parent, which does not list the
    ///   copy among its children
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is invalid for the node kind or the copy
    /// cannot be added to `parent`.
    pub fn copy(
        &mut self,
        id: NodeId,
        path: Option<&str>,
        deep: bool,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let original = self.node(id).clone();
        let own_path = match path {
            Some(raw) => {
                let parsed = ResourcePath::parse(raw)?;
                match original.kind {
                    NodeKind::Entry if parsed.is_absolute() => {
                        return Err(Error::RelativePathExpected { path: raw.to_string() })
                    }
                    NodeKind::Location | NodeKind::Anchor if parsed.is_relative() => {
                        return Err(Error::AbsolutePathExpected { path: raw.to_string() })
                    }
                    _ => parsed,
                }
            }
            None => original.path.clone(),
        };

        let mut node = Node::new(original.kind, own_path);
        node.layout = original.layout;
        node.dirty = original.dirty;
        node.value = match &original.value {
            NodeValue::Collection(_) => NodeValue::Collection(BTreeMap::new()),
            other => other.clone(),
        };
        let copy = self.alloc(node);

        if deep {
            if let NodeValue::Collection(children) = &original.value {
                for child in children.values() {
                    self.copy(*child, None, true, Some(copy))?;
                }
                self.node_mut(copy).dirty = original.dirty;
            }
        }

        match parent {
            Some(parent) => {
                self.add_child(parent, copy)?;
            }
            None => self.node_mut(copy).parent = original.parent,
        }
        Ok(copy)
    }

    /// Deep-copy `src_id` from another tree and add it under `parent`,
    /// overwriting a same-key child.
    ///
    /// # Errors
    ///
    /// Returns an error if the copied node is not an entry.
    pub fn graft(&mut self, parent: NodeId, src: &Tree, src_id: NodeId) -> Result<NodeId> {
        let copy = self.import(src, src_id);
        self.add_child(parent, copy)?;
        Ok(copy)
    }

    fn import(&mut self, src: &Tree, src_id: NodeId) -> NodeId {
        let original = src.node(src_id);
        let mut node = Node::new(original.kind, original.path.clone());
        node.layout = original.layout;
        node.dirty = original.dirty;
        if let NodeValue::Scalar(value) = &original.value {
            node.value = NodeValue::Scalar(value.clone());
        }
        let copy = self.alloc(node);

        if let NodeValue::Collection(children) = &original.value {
            let mut imported = BTreeMap::new();
            for (key, child) in children {
                let child_copy = self.import(src, *child);
                self.node_mut(child_copy).parent = Some(copy);
                imported.insert(key.clone(), child_copy);
            }
            self.node_mut(copy).value = NodeValue::Collection(imported);
        }
        copy
    }

    /// Remove `id` from its parent's children and drop the back-reference.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let key = self.key(id).to_string();
        if let NodeValue::Collection(children) = &mut self.node_mut(parent).value {
            if children.get(&key) == Some(&id) {
                children.remove(&key);
            }
        }
        self.node_mut(id).parent = None;
    }

    /// Absolute (or, for a parentless entry, relative) storage path.
    ///
    /// A location's storage path is its container directory.
    #[must_use]
    pub fn path(&self, id: NodeId) -> ResourcePath {
        let node = self.node(id);
        match node.kind {
            NodeKind::Location => node.path.child(CONTAINER),
            NodeKind::Anchor => node.path.clone(),
            NodeKind::Entry => match node.parent {
                Some(parent) => node
                    .path
                    .segments()
                    .fold(self.path(parent), |acc, segment| acc.child(segment)),
                None => node.path.clone(),
            },
        }
    }

    /// The path as given at construction (updated by suffix changes).
    #[must_use]
    pub fn own_path(&self, id: NodeId) -> &ResourcePath {
        &self.node(id).path
    }

    /// Replace the own path, re-keying the node under its parent.
    pub(crate) fn set_own_path(&mut self, id: NodeId, path: ResourcePath) -> Result<()> {
        let key_changed = self.node(id).path.key() != path.key();
        let parent = self.node(id).parent;
        if key_changed {
            self.detach(id);
        }
        self.node_mut(id).path = path;
        match parent {
            Some(parent) if key_changed => self.add_child(parent, id).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Name plus option: the key under which the parent stores this node.
    #[must_use]
    pub fn key(&self, id: NodeId) -> &str {
        self.node(id).path.key()
    }

    /// Suffix of the node's basename.
    #[must_use]
    pub fn suffix(&self, id: NodeId) -> Option<&str> {
        match self.node(id).kind {
            NodeKind::Entry => self.node(id).path.suffix(),
            NodeKind::Location | NodeKind::Anchor => None,
        }
    }

    /// Kind named by the suffix, if recognized.
    #[must_use]
    pub fn value_kind(&self, id: NodeId) -> Option<ValueKind> {
        self.suffix(id).and_then(ValueKind::from_suffix)
    }

    /// What the node represents.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Whether the node is stored as a directory.
    #[must_use]
    pub fn is_collection(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.kind != NodeKind::Entry
            || matches!(node.value, NodeValue::Collection(_))
            || node.layout == Layout::Directory
            || self.value_kind(id).is_some_and(ValueKind::is_collection)
    }

    /// Children sorted by key.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).value {
            NodeValue::Collection(children) => children.values().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// The child stored under `key`.
    #[must_use]
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.node(id).value {
            NodeValue::Collection(children) => children.get(key).copied(),
            _ => None,
        }
    }

    /// Back-reference to the parent.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |p| self.parent(*p))
    }

    /// Nearest location at or above `id`.
    #[must_use]
    pub fn location(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.kind(*n) == NodeKind::Location)
    }

    /// Whether the value was assigned since the last pull or flush.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.node(id).dirty
    }

    pub(crate) fn set_dirty(&mut self, id: NodeId, dirty: bool) {
        self.node_mut(id).dirty = dirty;
    }

    /// The on-disk shape last observed by a pull.
    #[must_use]
    pub fn layout(&self, id: NodeId) -> Layout {
        self.node(id).layout
    }

    pub(crate) fn set_layout(&mut self, id: NodeId, layout: Layout) {
        self.node_mut(id).layout = layout;
    }

    pub(crate) fn set_collection(&mut self, id: NodeId) {
        if !matches!(self.node(id).value, NodeValue::Collection(_)) {
            self.clear(id);
            self.node_mut(id).value = NodeValue::Collection(BTreeMap::new());
        }
    }

    /// Indented listing of the subtree, one basename per line.
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::{ResourcePath, Tree};
    /// use serde_json::json;
    ///
    /// let mut tree = Tree::new();
    /// let location = tree.add_location(&ResourcePath::parse("/r").unwrap()).unwrap();
    /// let group = tree.add_entry("group", Some(location)).unwrap();
    /// tree.set_value(group, json!({"a": 1})).unwrap();
    ///
    /// assert_eq!(tree.ls(location), ".meta\n\tgroup.dict\n\t\ta.int\n");
    /// ```
    #[must_use]
    pub fn ls(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.ls_into(id, 0, &mut out);
        out
    }

    fn ls_into(&self, id: NodeId, level: usize, out: &mut String) {
        let _ = writeln!(out, "{}{}", "\t".repeat(level), self.path(id).basename());
        for child in self.children(id) {
            self.ls_into(child, level + 1, out);
        }
    }
}

/// List children by numeric index when every key is one, by key otherwise.
fn list_order(children: &BTreeMap<String, NodeId>) -> Vec<NodeId> {
    let indexed: Option<Vec<(u64, NodeId)>> = children
        .iter()
        .map(|(key, child)| key.parse().ok().map(|index| (index, *child)))
        .collect();
    match indexed {
        Some(mut indexed) => {
            indexed.sort_by_key(|(index, _)| *index);
            indexed.into_iter().map(|(_, child)| child).collect()
        }
        None => children.values().copied().collect(),
    }
}
