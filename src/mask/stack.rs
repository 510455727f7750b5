//! Layer stacking
//!
//! Layer L uses threshold L. Layers past the tree's own height are
//! all-true and are still emitted: the encoder has a fixed depth.

use tracing::trace;

use super::{build_mask, AttentionMask};
use crate::layer::{contract, resolve, EdgePolicy};
use crate::MaskError;

/// Number of layers to build: `max(tree_height, min_layer_depth)`
#[inline]
pub fn layer_count(tree_height: usize, min_layer_depth: usize) -> usize {
    tree_height.max(min_layer_depth)
}

/// Run contract → resolve → mask for every layer in `0..layer_count`
pub fn build_stack(
    father: &[usize],
    height: &[usize],
    layer_count: usize,
    policy: EdgePolicy,
) -> Result<Vec<AttentionMask>, MaskError> {
    let mut masks = Vec::with_capacity(layer_count);

    for layer in 0..layer_count {
        let contracted = contract(father, height, layer, policy)?;
        let classes = resolve(&contracted)?;
        trace!(layer, groups = classes.group_count(), "resolved layer");
        masks.push(build_mask(&classes));
    }

    Ok(masks)
}

/// Immutable result of one tree: tags plus one mask per layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskStack {
    tags: Vec<String>,
    heights: Vec<usize>,
    masks: Vec<AttentionMask>,
    policy: EdgePolicy,
}

impl MaskStack {
    /// Assemble a stack from height-ordered tags/heights and per-layer masks
    pub fn new(
        tags: Vec<String>,
        heights: Vec<usize>,
        masks: Vec<AttentionMask>,
        policy: EdgePolicy,
    ) -> Self {
        Self {
            tags,
            heights,
            masks,
            policy,
        }
    }

    /// Labels in index order; index 0 is the root
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Heights in index order
    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    /// All masks, finest first
    pub fn masks(&self) -> &[AttentionMask] {
        &self.masks
    }

    /// Mask of layer `layer`
    pub fn layer(&self, layer: usize) -> Option<&AttentionMask> {
        self.masks.get(layer)
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.masks.len()
    }

    /// Node count N
    pub fn node_count(&self) -> usize {
        self.tags.len()
    }

    /// Height of the tree the stack was built from
    pub fn tree_height(&self) -> usize {
        self.heights.first().copied().unwrap_or(0)
    }

    /// Policy the stack was built with
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// `[layer_count, N, N]`
    pub fn shape(&self) -> [usize; 3] {
        let n = self.node_count();
        [self.layer_count(), n, n]
    }

    /// Each layer's mask refines the next
    pub fn is_monotonic(&self) -> bool {
        self.masks.windows(2).all(|pair| pair[0].is_refinement_of(&pair[1]))
    }

    /// Number of groups per layer (true diagonal blocks)
    pub fn group_counts(&self) -> Vec<usize> {
        self.masks
            .iter()
            .map(|mask| {
                // Count each group once, at its lowest index
                (0..mask.size())
                    .filter(|&i| (0..i).all(|j| !mask.get(i, j)))
                    .count()
            })
            .collect()
    }

    /// Layer-major, row-major 0/1 tensor of shape `[layer_count, N, N]`
    pub fn to_dense(&self) -> Vec<u8> {
        let n = self.node_count();
        let mut dense = Vec::with_capacity(self.layer_count() * n * n);
        for mask in &self.masks {
            dense.extend(mask.to_dense());
        }
        dense
    }

    /// Digest of tags, shape and mask bits
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for dim in self.shape() {
            hasher.update(&(dim as u64).to_le_bytes());
        }
        for tag in &self.tags {
            hasher.update(&(tag.len() as u64).to_le_bytes());
            hasher.update(tag.as_bytes());
        }
        hasher.update(&self.to_dense());
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FATHER: [usize; 14] = [0, 0, 0, 1, 2, 2, 1, 3, 3, 4, 5, 6, 7, 8];
    const HEIGHT: [usize; 14] = [5, 4, 3, 3, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1];

    #[test]
    fn test_layer_count_floor() {
        assert_eq!(layer_count(5, 12), 12);
        assert_eq!(layer_count(20, 12), 20);
        assert_eq!(layer_count(1, 0), 1);
    }

    #[test]
    fn test_stack_coarsens() {
        let masks = build_stack(&FATHER, &HEIGHT, 6, EdgePolicy::ParentHeight).unwrap();
        let stack = MaskStack::new(vec![String::new(); 14], HEIGHT.to_vec(), masks, EdgePolicy::ParentHeight);

        assert_eq!(stack.shape(), [6, 14, 14]);
        assert!(stack.is_monotonic());
        assert_eq!(stack.group_counts(), vec![14, 9, 5, 3, 1, 1]);
        assert_eq!(stack.to_dense().len(), 6 * 14 * 14);
    }

    #[test]
    fn test_zero_layers() {
        let masks = build_stack(&FATHER, &HEIGHT, 0, EdgePolicy::ParentHeight).unwrap();
        assert!(masks.is_empty());
    }

    #[test]
    fn test_errors_propagate() {
        assert!(matches!(
            build_stack(&FATHER, &HEIGHT[..3], 2, EdgePolicy::ParentHeight),
            Err(MaskError::LengthMismatch { .. })
        ));
    }
}
