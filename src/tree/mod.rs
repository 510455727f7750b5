//! Constituency parse tree arena
//!
//! The tree is never walked recursively: nodes sit in a flat arena,
//! children always get larger ids than their parent, so bottom-up
//! passes are a single reverse sweep over ids.

mod bracket;
mod node;
mod traversal;

pub use node::{NodeId, NodeKind, TreeNode, TreePosition};
pub use traversal::PreorderTraversal;

use thiserror::Error;

/// Errors raised while building or reading a parse tree
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Referenced node id does not exist
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// Attempted to attach a child below a leaf
    #[error("node {0} is a leaf and cannot have children")]
    LeafParent(usize),

    /// Root was already set
    #[error("tree already has a root")]
    RootExists,

    /// Bracketed input could not be read
    #[error("bracketed tree syntax error at byte {offset}: {reason}")]
    Syntax {
        /// Byte offset into the input
        offset: usize,
        /// What went wrong
        reason: String,
    },
}

/// Constituency tree stored as an arena of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<TreeNode>,
}

impl ParseTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Read a tree from bracketed notation, e.g. `(S (NP (D the) (N dog)))`
    pub fn from_bracketed(input: &str) -> Result<Self, TreeError> {
        bracket::read_bracketed(input)
    }

    /// Set the root node. A leaf root makes a single-token tree.
    pub fn set_root(&mut self, kind: NodeKind, label: impl Into<String>) -> Result<NodeId, TreeError> {
        if !self.nodes.is_empty() {
            return Err(TreeError::RootExists);
        }
        self.nodes.push(TreeNode::new(label.into(), kind, None));
        Ok(NodeId(0))
    }

    /// Append an internal (category) child to `parent`
    pub fn add_internal(&mut self, parent: NodeId, label: impl Into<String>) -> Result<NodeId, TreeError> {
        self.attach(parent, NodeKind::Internal, label.into())
    }

    /// Append a leaf (token) child to `parent`
    pub fn add_leaf(&mut self, parent: NodeId, token: impl Into<String>) -> Result<NodeId, TreeError> {
        self.attach(parent, NodeKind::Leaf, token.into())
    }

    fn attach(&mut self, parent: NodeId, kind: NodeKind, label: String) -> Result<NodeId, TreeError> {
        let parent_node = self
            .nodes
            .get(parent.0)
            .ok_or(TreeError::UnknownNode(parent.0))?;
        if parent_node.is_leaf() {
            return Err(TreeError::LeafParent(parent.0));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(label, kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Root node (None for an empty tree)
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Total node count (internal + leaf)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tokens in left-to-right order
    pub fn leaves(&self) -> Vec<&str> {
        self.preorder()
            .filter_map(|(id, _)| self.node(id))
            .filter(|node| node.is_leaf())
            .map(|node| node.label.as_str())
            .collect()
    }

    /// Depth-first, left-to-right walk
    pub fn preorder(&self) -> PreorderTraversal<'_> {
        PreorderTraversal::new(self)
    }

    /// Navigate from the root along child indices
    pub fn resolve_position(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root()?;
        for &step in path {
            current = *self.node(current)?.children.get(step)?;
        }
        Some(current)
    }

    /// Height of every node, indexed by `NodeId`
    ///
    /// Leaf = 1, internal = 1 + max(child heights).
    /// An internal node without children gets height 0.
    pub fn heights(&self) -> Vec<usize> {
        let mut heights = vec![0usize; self.nodes.len()];

        // Children have larger ids, so a reverse sweep sees them first
        for idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                heights[idx] = 1;
            }
            if let Some(parent) = node.parent {
                if heights[idx] > 0 {
                    heights[parent.0] = heights[parent.0].max(heights[idx] + 1);
                }
            }
        }

        heights
    }

    /// Height of the whole tree (0 if empty)
    pub fn height(&self) -> usize {
        self.heights().first().copied().unwrap_or(0)
    }
}
