//! Tree flattening
//!
//! Turns the arena tree into three parallel sequences in depth-first,
//! left-to-right order: positions, labels, heights. Everything after
//! this stage works on plain index arrays.

mod index;

pub use index::{FlatIndex, HeightOrder};

use crate::tree::{NodeKind, ParseTree, TreePosition};
use crate::MaskError;

/// Every node of a tree in preorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedTree {
    /// Tree position of each node
    pub positions: Vec<TreePosition>,

    /// Category label or token of each node
    pub labels: Vec<String>,

    /// Height of each node (leaf = 1)
    pub heights: Vec<usize>,
}

impl FlattenedTree {
    /// Flatten `tree`, validating its structure on the way
    ///
    /// Fails with `MalformedTree` on an empty tree, on an internal node
    /// without children, or if a position does not resolve back to the
    /// node it was discovered at.
    pub fn from_tree(tree: &ParseTree) -> Result<Self, MaskError> {
        if tree.is_empty() {
            return Err(MaskError::malformed("tree has no nodes"));
        }

        let childless = tree.preorder().find(|(id, _)| {
            tree.node(*id)
                .is_some_and(|node| node.kind == NodeKind::Internal && node.children.is_empty())
        });
        if let Some((id, position)) = childless {
            let label = tree.node(id).map(|node| node.label.as_str()).unwrap_or_default();
            return Err(MaskError::malformed(format!(
                "internal node {:?} at {} has no children",
                label, position
            )));
        }

        let node_heights = tree.heights();
        let mut positions = Vec::with_capacity(tree.len());
        let mut labels = Vec::with_capacity(tree.len());
        let mut heights = Vec::with_capacity(tree.len());

        for (id, position) in tree.preorder() {
            let node = tree
                .resolve_position(position.as_slice())
                .filter(|&resolved| resolved == id)
                .and_then(|resolved| tree.node(resolved))
                .ok_or_else(|| {
                    MaskError::malformed(format!("position {} does not resolve to a node", position))
                })?;

            let height = node_heights[id.index()];
            if height == 0 {
                return Err(MaskError::malformed(format!(
                    "node {:?} at {} has no leaf descendants",
                    node.label, position
                )));
            }

            positions.push(position);
            labels.push(node.label.clone());
            heights.push(height);
        }

        if positions.len() != tree.len() {
            return Err(MaskError::malformed(format!(
                "reached {} of {} nodes from the root",
                positions.len(),
                tree.len()
            )));
        }

        Ok(Self {
            positions,
            labels,
            heights,
        })
    }

    /// Total node count
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no nodes
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
