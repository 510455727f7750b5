//! Height-ordered indexing
//!
//! Nodes are reordered by descending height. Ties keep their preorder
//! discovery order (stable sort), so taller subtrees get lower indices
//! and the resulting tag order is reproducible.

use std::collections::HashMap;

use super::FlattenedTree;
use crate::tree::TreePosition;
use crate::MaskError;

/// Bijection between tree positions and node indices `0..N`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatIndex {
    positions: Vec<TreePosition>,
    by_position: HashMap<TreePosition, usize>,
}

impl FlatIndex {
    fn new(positions: Vec<TreePosition>) -> Result<Self, MaskError> {
        let mut by_position = HashMap::with_capacity(positions.len());
        for (idx, pos) in positions.iter().enumerate() {
            if by_position.insert(pos.clone(), idx).is_some() {
                return Err(MaskError::malformed(format!(
                    "position {} appears more than once",
                    pos
                )));
            }
        }
        Ok(Self {
            positions,
            by_position,
        })
    }

    /// Index assigned to `position`
    pub fn index_of(&self, position: &TreePosition) -> Option<usize> {
        self.by_position.get(position).copied()
    }

    /// Position stored at `index`
    pub fn position_of(&self, index: usize) -> Option<&TreePosition> {
        self.positions.get(index)
    }

    /// Positions in index order
    pub fn positions(&self) -> &[TreePosition] {
        &self.positions
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Flattened tree reordered by descending height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightOrder {
    index: FlatIndex,
    labels: Vec<String>,
    heights: Vec<usize>,
}

impl HeightOrder {
    /// Stable-sort `flat` by descending height
    ///
    /// Fails with `MalformedTree` when the three sequences differ in
    /// length or a position occurs twice.
    pub fn from_flattened(flat: FlattenedTree) -> Result<Self, MaskError> {
        let FlattenedTree {
            positions,
            labels,
            heights,
        } = flat;

        if labels.len() != positions.len() || heights.len() != positions.len() {
            return Err(MaskError::malformed(format!(
                "flattened tree has {} positions, {} labels and {} heights",
                positions.len(),
                labels.len(),
                heights.len()
            )));
        }

        let mut order: Vec<usize> = (0..positions.len()).collect();
        // `sort_by` is stable: equal heights keep preorder
        order.sort_by(|&a, &b| heights[b].cmp(&heights[a]));

        let mut positions: Vec<Option<TreePosition>> = positions.into_iter().map(Some).collect();
        let mut labels: Vec<Option<String>> = labels.into_iter().map(Some).collect();

        let sorted_positions = order.iter().filter_map(|&i| positions[i].take()).collect();
        let sorted_labels = order.iter().filter_map(|&i| labels[i].take()).collect();
        let sorted_heights = order.iter().map(|&i| heights[i]).collect();

        Ok(Self {
            index: FlatIndex::new(sorted_positions)?,
            labels: sorted_labels,
            heights: sorted_heights,
        })
    }

    /// Position ↔ index bijection
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Labels in index order (the `tags` sequence)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Heights in index order (non-increasing)
    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    /// Height of the tallest node
    pub fn tree_height(&self) -> usize {
        self.heights.first().copied().unwrap_or(0)
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether there are no nodes
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Split into index, labels and heights
    pub fn into_parts(self) -> (FlatIndex, Vec<String>, Vec<usize>) {
        (self.index, self.labels, self.heights)
    }
}
