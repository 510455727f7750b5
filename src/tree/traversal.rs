//! Explicit-stack preorder traversal
//!
//! Depth-first, left-to-right, with no recursion: the pending stack
//! holds (node, position) pairs, so arbitrarily deep trees are safe.

use super::{NodeId, ParseTree, TreePosition};

/// Preorder walk over a `ParseTree`
///
/// Yields every node exactly once with its tree position.
/// Order: a node before its children, children left to right.
#[derive(Debug)]
pub struct PreorderTraversal<'a> {
    tree: &'a ParseTree,

    /// Pending nodes; top of stack is visited next
    pending: Vec<(NodeId, TreePosition)>,
}

impl<'a> PreorderTraversal<'a> {
    /// Create traversal starting at the tree's root (empty for an empty tree)
    pub fn new(tree: &'a ParseTree) -> Self {
        let pending = match tree.root() {
            Some(root) => vec![(root, TreePosition::root())],
            None => Vec::new(),
        };
        Self { tree, pending }
    }

    /// Number of nodes discovered but not yet visited
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Iterator for PreorderTraversal<'_> {
    type Item = (NodeId, TreePosition);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, position) = self.pending.pop()?;

        if let Some(node) = self.tree.node(id) {
            // Reverse push so the leftmost child is popped first
            for (k, &child) in node.children.iter().enumerate().rev() {
                self.pending.push((child, position.child(k)));
            }
        }

        Some((id, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn test_preorder_positions() {
        // (S (NP x) (VP (V y)))
        let mut tree = ParseTree::new();
        let s = tree.set_root(NodeKind::Internal, "S").unwrap();
        let np = tree.add_internal(s, "NP").unwrap();
        tree.add_leaf(np, "x").unwrap();
        let vp = tree.add_internal(s, "VP").unwrap();
        let v = tree.add_internal(vp, "V").unwrap();
        tree.add_leaf(v, "y").unwrap();

        let visited: Vec<(String, String)> = PreorderTraversal::new(&tree)
            .map(|(id, pos)| (tree.node(id).unwrap().label.clone(), pos.to_string()))
            .collect();

        let expected = [
            ("S", "()"),
            ("NP", "(0)"),
            ("x", "(0, 0)"),
            ("VP", "(1)"),
            ("V", "(1, 0)"),
            ("y", "(1, 0, 0)"),
        ];
        assert_eq!(visited.len(), expected.len());
        for ((label, pos), (exp_label, exp_pos)) in visited.iter().zip(expected) {
            assert_eq!(label, exp_label);
            assert_eq!(pos, exp_pos);
        }
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut tree = ParseTree::new();
        let mut current = tree.set_root(NodeKind::Internal, "X").unwrap();
        for _ in 0..2_000 {
            current = tree.add_internal(current, "X").unwrap();
        }
        tree.add_leaf(current, "w").unwrap();

        let traversal = PreorderTraversal::new(&tree);
        assert_eq!(traversal.count(), tree.len());
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        let tree = ParseTree::new();
        assert_eq!(PreorderTraversal::new(&tree).next(), None);
    }
}
