//! Per-layer grouping of tree nodes
//!
//! father[] ──contract(L)──▶ contracted[] ──resolve──▶ root_of[]
//!
//! Lower layers cut more edges and leave finer groups.

mod contract;
mod equivalence;
mod parents;

pub use contract::{contract, ContractedParents, EdgePolicy};
pub use equivalence::{resolve, EquivalenceClasses};
pub use parents::ParentArray;
