//! Node types stored in a [`Tree`](super::Tree) arena.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::path::ResourcePath;

/// Handle to a node inside one [`Tree`](super::Tree).
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory hosting a metadata container.
    Location,
    /// A metadata node, scalar or collection.
    Entry,
    /// A bare absolute directory used as the root of a detached subtree.
    Anchor,
}

/// The on-disk shape last observed by a pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Never pulled, or reassigned since.
    #[default]
    Unknown,
    /// Backed by a file.
    File,
    /// Backed by a directory.
    Directory,
}

/// A node's content: nothing, a scalar, or named children.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeValue {
    /// No value was ever loaded or assigned; reads fall back to the
    /// suffix default.
    #[default]
    Unset,
    /// A leaf value.
    Scalar(Value),
    /// Children keyed by name plus option.
    Collection(BTreeMap<String, NodeId>),
}

impl NodeValue {
    /// Whether this is [`NodeValue::Unset`].
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) path: ResourcePath,
    pub(crate) parent: Option<NodeId>,
    pub(crate) value: NodeValue,
    pub(crate) layout: Layout,
    pub(crate) dirty: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, path: ResourcePath) -> Self {
        Self {
            kind,
            path,
            parent: None,
            value: NodeValue::Unset,
            layout: Layout::Unknown,
            dirty: false,
        }
    }
}
