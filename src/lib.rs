//! # Layer-wise Attention Masks from Constituency Trees
//!
//! This library converts a parsed constituency tree into a stack of
//! binary attention masks, one per transformer layer. Early layers only
//! let tightly grouped leaf clusters attend to each other; every layer
//! reveals more of the tree until the whole sentence attends jointly.
//!
//! ## Core Algorithm
//!
//! 1. **Flatten**: Walk the tree depth-first, recording position, label, height
//! 2. **Height order**: Stable sort by descending height, fixing node indices
//! 3. **Parents**: Resolve each index's structural parent (root = self-loop)
//! 4. **Contract**: Per layer L, cut edges above the height threshold
//! 5. **Resolve**: Follow contracted parent chains to a representative
//! 6. **Mask**: (i, j) attend iff they share a representative
//!
//! Steps 4-6 repeat for `L in 0..max(tree_height, min_layer_depth)`.
//!
//! ## Usage Example
//!
//! ```
//! use treemask::{MaskConfig, ParseTree, TreeMasker};
//!
//! let tree = ParseTree::from_bracketed("(S (NP (D the) (N dog)) (VP (V barked)))")?;
//! let masker = TreeMasker::new(MaskConfig::default())?;
//! let stack = masker.build(&tree)?;
//!
//! assert_eq!(stack.layer_count(), 12);
//! assert!(stack.layer(11).unwrap().is_all_true());
//! # Ok::<(), treemask::MaskError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each implements one stage of the tree → mask pipeline
pub mod tree;       // Parse tree arena and bracketed reader
pub mod flatten;    // Flattening and height-ordered indexing
pub mod layer;      // Parents, contraction, equivalence classes
pub mod mask;       // Mask matrices and layer stacking
/// Python bindings for exposing the mask builder to PyTorch consumers.
#[cfg(feature = "python-bindings")]
pub mod python_bindings;

// Re-exports for convenience
pub use flatten::{FlatIndex, FlattenedTree, HeightOrder};
pub use layer::{contract, resolve, ContractedParents, EdgePolicy, EquivalenceClasses, ParentArray};
pub use mask::{build_mask, build_stack, layer_count, AttentionMask, MaskStack};
pub use tree::{NodeId, NodeKind, ParseTree, TreeError, TreePosition};

use thiserror::Error;
use tracing::{debug, debug_span};

/// Minimum number of mask layers produced for any tree
pub const DEFAULT_MIN_LAYER_DEPTH: usize = 12;

/// Attention heads the consuming encoder broadcasts each mask over
pub const DEFAULT_N_HEAD: usize = 5;

/// Errors that can occur while building masks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Tree is empty or structurally invalid
    #[error("malformed tree: {reason}")]
    MalformedTree {
        /// What is wrong with the tree
        reason: String,
    },

    /// A non-root position's parent is missing from the flat index
    #[error("parent of position {position} not found in flat index")]
    ParentLookup {
        /// Position whose parent could not be resolved
        position: TreePosition,
    },

    /// Contracted parent chain never reached a self-loop
    #[error("cycle detected following parents from node {start} after {steps} steps")]
    CycleDetected {
        /// Index the chain walk started from
        start: usize,
        /// Steps taken before giving up
        steps: usize,
    },

    /// Parent and height arrays disagree in length
    #[error("parent array has {parents} entries but height array has {heights}")]
    LengthMismatch {
        /// Length of the parent array
        parents: usize,
        /// Length of the height array
        heights: usize,
    },

    /// Invalid mask configuration
    #[error("invalid mask configuration: {0}")]
    InvalidConfiguration(String),

    /// Tree construction or reading failed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl MaskError {
    /// Helper for constructing malformed-tree errors.
    pub fn malformed(reason: impl Into<String>) -> Self {
        MaskError::MalformedTree {
            reason: reason.into(),
        }
    }
}

/// Configuration parameters for mask construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    /// Minimum layer count; shallower trees get trailing all-true layers
    pub min_layer_depth: usize,

    /// Edge-removal policy used for every layer of a build
    pub policy: EdgePolicy,

    /// Attention heads of the consuming encoder (masks are not tiled here)
    pub n_head: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            min_layer_depth: DEFAULT_MIN_LAYER_DEPTH,
            policy: EdgePolicy::ParentHeight,
            n_head: DEFAULT_N_HEAD,
        }
    }
}

impl MaskConfig {
    /// Set the minimum layer depth.
    pub fn with_min_layer_depth(mut self, min_layer_depth: usize) -> Self {
        self.min_layer_depth = min_layer_depth;
        self
    }

    /// Set the edge-removal policy.
    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the downstream head count.
    pub fn with_n_head(mut self, n_head: usize) -> Self {
        self.n_head = n_head;
        self
    }

    /// Check the configuration before building
    pub fn validate(&self) -> Result<(), MaskError> {
        if self.n_head == 0 {
            return Err(MaskError::InvalidConfiguration(
                "n_head must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main mask orchestrator
///
/// Runs the full pipeline for one tree at a time. Holds no per-tree
/// state, so one masker can be shared across threads.
#[derive(Debug, Clone)]
pub struct TreeMasker {
    config: MaskConfig,
}

impl TreeMasker {
    /// Create a masker after validating `config`
    pub fn new(config: MaskConfig) -> Result<Self, MaskError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Build the full mask stack for `tree`
    ///
    /// All-or-nothing: any stage failure returns the error and no stack.
    pub fn build(&self, tree: &ParseTree) -> Result<MaskStack, MaskError> {
        let _span = debug_span!("build_mask_stack", nodes = tree.len()).entered();

        let order = Self::index(tree)?;
        let parents = ParentArray::resolve(&order)?;

        let layers = layer_count(order.tree_height(), self.config.min_layer_depth);
        let masks = build_stack(
            parents.as_slice(),
            order.heights(),
            layers,
            self.config.policy,
        )?;

        debug!(
            nodes = order.len(),
            height = order.tree_height(),
            layers,
            policy = %self.config.policy,
            "built mask stack"
        );

        let (_, labels, heights) = order.into_parts();
        Ok(MaskStack::new(labels, heights, masks, self.config.policy))
    }

    /// Read a bracketed tree and build its mask stack
    pub fn build_bracketed(&self, bracketed: &str) -> Result<MaskStack, MaskError> {
        let tree = ParseTree::from_bracketed(bracketed)?;
        self.build(&tree)
    }

    /// Build the mask of a single layer threshold
    pub fn layer_mask(&self, tree: &ParseTree, layer: usize) -> Result<AttentionMask, MaskError> {
        let order = Self::index(tree)?;
        let parents = ParentArray::resolve(&order)?;
        let contracted = contract(parents.as_slice(), order.heights(), layer, self.config.policy)?;
        let classes = resolve(&contracted)?;
        Ok(build_mask(&classes))
    }

    fn index(tree: &ParseTree) -> Result<HeightOrder, MaskError> {
        let flat = FlattenedTree::from_tree(tree)?;
        HeightOrder::from_flattened(flat)
    }
}

/// Build a mask stack for `tree` with `config`
pub fn tree_to_masks(tree: &ParseTree, config: &MaskConfig) -> Result<MaskStack, MaskError> {
    TreeMasker::new(config.clone())?.build(tree)
}
