//! Attention masks
//!
//! One N×N boolean matrix per layer, stacked finest to coarsest.
//! Monotonic: if mask[L][i][j] then mask[L + 1][i][j].

#[cfg(feature = "visualize")]
mod export;
mod matrix;
mod stack;

#[cfg(feature = "visualize")]
pub use export::MaskStackExport;
pub use matrix::{build_mask, AttentionMask};
pub use stack::{build_stack, layer_count, MaskStack};
