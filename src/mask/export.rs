//! Serializable view of a mask stack (feature `visualize`)

use serde::Serialize;

use super::MaskStack;
use crate::layer::EdgePolicy;

/// Mask stack in a form ready for JSON consumers
#[derive(Debug, Clone, Serialize)]
pub struct MaskStackExport {
    /// Labels in index order
    pub tags: Vec<String>,
    /// Heights in index order
    pub heights: Vec<usize>,
    /// Edge policy used
    pub policy: EdgePolicy,
    /// Heads the consumer broadcasts each layer over
    pub n_head: usize,
    /// `[layer_count, N, N]`
    pub shape: [usize; 3],
    /// `masks[layer][i][j]` as 0/1
    pub masks: Vec<Vec<Vec<u8>>>,
}

impl MaskStack {
    /// Build the serializable view
    pub fn to_export(&self, n_head: usize) -> MaskStackExport {
        MaskStackExport {
            tags: self.tags().to_vec(),
            heights: self.heights().to_vec(),
            policy: self.policy(),
            n_head,
            shape: self.shape(),
            masks: self.masks().iter().map(|mask| mask.to_rows()).collect(),
        }
    }

    /// Serialize to a single-line JSON document
    pub fn to_json(&self, n_head: usize) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_export(n_head))
    }
}
