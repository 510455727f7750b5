//! Equivalence classes from contracted parent chains
//!
//! Every edge comes from the acyclic input tree, so a plain chain
//! walk replaces union-by-rank. Roots found along a walk are memoized:
//! later walks stop at the first node whose root is already known.

use std::collections::BTreeMap;

use super::ContractedParents;
use crate::MaskError;

/// Representative (`root_of`) per node for one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClasses {
    root_of: Vec<usize>,
}

impl EquivalenceClasses {
    /// Representative of every node
    pub fn root_of(&self) -> &[usize] {
        &self.root_of
    }

    /// Representative of `index`
    pub fn representative(&self, index: usize) -> Option<usize> {
        self.root_of.get(index).copied()
    }

    /// Whether `i` and `j` attend to each other
    pub fn same_group(&self, i: usize, j: usize) -> bool {
        match (self.root_of.get(i), self.root_of.get(j)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Members of each group, keyed by representative
    pub fn groups(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &root) in self.root_of.iter().enumerate() {
            groups.entry(root).or_default().push(idx);
        }
        groups
    }

    /// Number of distinct groups
    pub fn group_count(&self) -> usize {
        self.root_of
            .iter()
            .enumerate()
            .filter(|&(i, &root)| i == root)
            .count()
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.root_of.len()
    }

    /// Whether there are no nodes
    pub fn is_empty(&self) -> bool {
        self.root_of.is_empty()
    }
}

/// Follow every contracted chain to its self-loop
///
/// A walk longer than the node count means the array has a cycle and
/// fails with `CycleDetected` instead of looping forever.
pub fn resolve(contracted: &ContractedParents) -> Result<EquivalenceClasses, MaskError> {
    let father = contracted.as_slice();
    let n = father.len();
    let mut root_of: Vec<Option<usize>> = vec![None; n];
    let mut chain: Vec<usize> = Vec::new();

    for start in 0..n {
        if root_of[start].is_some() {
            continue;
        }

        chain.clear();
        let mut current = start;
        let root = loop {
            let parent = *father.get(current).ok_or_else(|| {
                MaskError::malformed(format!("parent index {} outside 0..{}", current, n))
            })?;
            if let Some(root) = root_of[current] {
                break root;
            }
            if parent == current {
                break current;
            }

            chain.push(current);
            if chain.len() > n {
                return Err(MaskError::CycleDetected {
                    start,
                    steps: chain.len(),
                });
            }
            current = parent;
        };

        root_of[current] = Some(root);
        for &node in &chain {
            root_of[node] = Some(root);
        }
    }

    Ok(EquivalenceClasses {
        root_of: root_of
            .into_iter()
            .enumerate()
            .map(|(i, root)| root.unwrap_or(i))
            .collect(),
    })
}
