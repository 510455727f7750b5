//! Square boolean attention matrix
//!
//! Stored row-major in one bit vector: N² bits instead of N² bytes.
//! Entry (i, j) is set iff i and j share a representative, so every
//! mask is reflexive, symmetric and a disjoint union of all-true blocks.

use bitvec::prelude::*;

use crate::layer::EquivalenceClasses;

/// N×N attention mask for one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionMask {
    /// Side length N
    size: usize,

    /// Row-major bits, `size * size` long
    bits: BitVec,
}

impl AttentionMask {
    /// All-false mask
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            bits: bitvec![0; size * size],
        }
    }

    /// Side length N
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether i may attend to j (false outside the matrix)
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        if i >= self.size || j >= self.size {
            return false;
        }
        self.bits[i * self.size + j]
    }

    fn set(&mut self, i: usize, j: usize) {
        self.bits.set(i * self.size + j, true);
    }

    /// Row `i` as a bit slice
    pub fn row(&self, i: usize) -> Option<&BitSlice> {
        if i >= self.size {
            return None;
        }
        self.bits.get(i * self.size..(i + 1) * self.size)
    }

    /// Number of true entries
    pub fn count_true(&self) -> usize {
        self.bits.count_ones()
    }

    /// Every pair may attend (single group)
    pub fn is_all_true(&self) -> bool {
        self.bits.all()
    }

    /// Diagonal fully set
    pub fn is_reflexive(&self) -> bool {
        (0..self.size).all(|i| self.get(i, i))
    }

    /// (i, j) == (j, i) for all pairs
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Every true entry of `self` is also true in `coarser`
    pub fn is_refinement_of(&self, coarser: &AttentionMask) -> bool {
        self.size == coarser.size && self.bits.iter_ones().all(|k| coarser.bits[k])
    }

    /// Row-major 0/1 bytes
    pub fn to_dense(&self) -> Vec<u8> {
        self.bits.iter().map(|bit| u8::from(*bit)).collect()
    }

    /// Rows as nested 0/1 vectors
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|i| (0..self.size).map(|j| u8::from(self.get(i, j))).collect())
            .collect()
    }
}

/// Expand a group assignment into its mask
///
/// Fills one all-true block per group, so the cost is the number of
/// true entries rather than N².
pub fn build_mask(classes: &EquivalenceClasses) -> AttentionMask {
    let mut mask = AttentionMask::empty(classes.len());

    for members in classes.groups().values() {
        for &i in members {
            for &j in members {
                mask.set(i, j);
            }
        }
    }

    mask
}
