//! Parent resolution over height-ordered indices

use crate::flatten::HeightOrder;
use crate::MaskError;

/// `father[i]` = index of node i's structural parent; the root points to itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentArray {
    father: Vec<usize>,
}

impl ParentArray {
    /// Look up every node's parent position in the flat index
    pub fn resolve(order: &HeightOrder) -> Result<Self, MaskError> {
        let index = order.index();
        let mut father = Vec::with_capacity(index.len());

        for (idx, position) in index.positions().iter().enumerate() {
            let parent = match position.parent() {
                None => idx,
                Some(parent_position) => {
                    index
                        .index_of(&parent_position)
                        .ok_or_else(|| MaskError::ParentLookup {
                            position: position.clone(),
                        })?
                }
            };
            father.push(parent);
        }

        Ok(Self { father })
    }

    /// Wrap a raw parent array (no validation)
    pub fn from_raw(father: Vec<usize>) -> Self {
        Self { father }
    }

    /// Parent indices
    pub fn as_slice(&self) -> &[usize] {
        &self.father
    }

    /// Index of the root: the first self-loop
    pub fn root(&self) -> Option<usize> {
        self.father.iter().enumerate().find(|&(i, &p)| i == p).map(|(i, _)| i)
    }

    /// Steps from `index` to the root, or None if the chain does not end
    pub fn depth_of(&self, index: usize) -> Option<usize> {
        let mut current = index;
        for steps in 0..=self.father.len() {
            let parent = *self.father.get(current)?;
            if parent == current {
                return Some(steps);
            }
            current = parent;
        }
        None
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.father.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.father.is_empty()
    }
}
