//! Mutation operations
//!
//! - `MutationEngine` - add / add-parent / update / delete / move on snapshots
//! - `Relation` - caller-facing relation names resolved into record links
//! - `History` - bounded undo/redo of whole snapshots
//! - `MutationError` - why a mutation was rejected

pub mod engine;
pub mod error;
pub mod history;
pub mod relation;

pub use engine::{
    descendants_of, is_descendant, Added, DeleteOutcome, DeletePolicy, IdAllocator, MutationEngine,
};
pub use error::MutationError;
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use relation::{Placement, Relation, EX_SPOUSE_NOTE};
