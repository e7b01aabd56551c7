//! Service Layer Error Types

use crate::export::FormatError;
use crate::models::PersonId;
use crate::operations::MutationError;
use thiserror::Error;

/// Errors from [`crate::services::FamilyTreeService`]
///
/// A rejected mutation or import never changes the service's snapshot, and
/// a failed save rolls the change back.
#[derive(Error, Debug)]
pub enum FamilyServiceError {
    /// The engine refused the mutation
    #[error("Mutation rejected: {0}")]
    Rejected(#[from] MutationError),

    /// Import input could not be parsed
    #[error("Import failed: {0}")]
    Format(#[from] FormatError),

    /// Imported collection contains the same id twice
    #[error("Duplicate person id in import: {id}")]
    DuplicateId { id: PersonId },

    /// Imported collection has a record that is its own ancestor
    #[error("Parent cycle in import through person {id}")]
    ParentCycle { id: PersonId },

    /// Store load or save failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FamilyServiceError {
    pub fn duplicate_id(id: PersonId) -> Self {
        Self::DuplicateId { id }
    }

    pub fn parent_cycle(id: PersonId) -> Self {
        Self::ParentCycle { id }
    }

    /// Wrap a store error, keeping its context chain in the message
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", err))
    }
}
