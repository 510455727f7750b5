//! Parse tree node representation
//!
//! Nodes live in an arena and are addressed by `NodeId`.
//! A node's structural address is its `TreePosition`:
//!   root      = ()
//!   k-th child of p = p ++ (k)

use std::fmt;

/// Arena index of a node inside a `ParseTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a node carries a syntactic category or a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Syntactic category (S, NP, VP, ...)
    Internal,

    /// Terminal token
    Leaf,
}

/// Tree node stored in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Category label or token text
    pub label: String,

    /// Internal or leaf
    pub kind: NodeKind,

    /// Parent node (None for the root)
    pub parent: Option<NodeId>,

    /// Children in left-to-right order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub(crate) fn new(label: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            label,
            kind,
            parent,
            children: Vec::new(),
        }
    }

    /// Check if leaf (terminal token)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }
}

/// Path of child indices from the root
///
/// Uniquely identifies a node; the parent position drops the last index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePosition(Vec<usize>);

impl TreePosition {
    /// Position of the root: the empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this is the root position
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of edges between the root and this node
    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Child index at the deepest level
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Position of the structural parent (None for the root)
    pub fn parent(&self) -> Option<TreePosition> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Position of the `index`-th child
    pub fn child(&self, index: usize) -> TreePosition {
        let mut path = Vec::with_capacity(self.0.len() + 1);
        path.extend_from_slice(&self.0);
        path.push(index);
        Self(path)
    }

    /// Raw child-index path
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for TreePosition {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl fmt::Display for TreePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, ")")
    }
}
