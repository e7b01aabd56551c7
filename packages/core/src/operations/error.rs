//! Error types for the mutation engine
//!
//! Every rejection leaves the caller's snapshot untouched; these errors only
//! describe why a mutation was not applied.

use crate::models::{PersonId, ValidationError};
use thiserror::Error;

/// Reasons a mutation is rejected
///
/// # Examples
///
/// ```rust
/// use familytree_core::models::PersonId;
/// use familytree_core::operations::MutationError;
///
/// let err = MutationError::cycle_rejected(PersonId(1), PersonId(5));
/// assert_eq!(
///     err.to_string(),
///     "Cannot move person 1 under 5: 5 is a descendant of 1"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Field-level validation failed (empty name, death before birth, self reference)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reparenting would make a record its own ancestor
    #[error("Cannot move person {person_id} under {target_id}: {target_id} is a descendant of {person_id}")]
    CycleRejected {
        person_id: PersonId,
        target_id: PersonId,
    },

    /// The record the operation is about does not exist
    #[error("Person {id} does not exist")]
    PersonNotFound { id: PersonId },

    /// A new relationship names a record that does not exist
    #[error("Referenced {field} {id} does not exist")]
    UnknownReference { field: &'static str, id: PersonId },

    /// Every id up to `i64::MAX` has been handed out or imported
    #[error("No person ids left to allocate")]
    IdSpaceExhausted,
}

impl MutationError {
    /// Create a CycleRejected error
    pub fn cycle_rejected(person_id: PersonId, target_id: PersonId) -> Self {
        Self::CycleRejected {
            person_id,
            target_id,
        }
    }

    /// Create a PersonNotFound error
    pub fn person_not_found(id: PersonId) -> Self {
        Self::PersonNotFound { id }
    }

    /// Create an UnknownReference error
    pub fn unknown_reference(field: &'static str, id: PersonId) -> Self {
        Self::UnknownReference { field, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: MutationError = ValidationError::EmptyName.into();
        assert!(matches!(err, MutationError::Validation(ValidationError::EmptyName)));
        assert_eq!(err.to_string(), "Validation error: Name must not be empty");
    }

    #[test]
    fn test_unknown_reference_message() {
        let err = MutationError::unknown_reference("partner", PersonId(42));
        assert_eq!(err.to_string(), "Referenced partner 42 does not exist");
    }

    #[test]
    fn test_person_not_found_message() {
        let err = MutationError::person_not_found(PersonId(7));
        assert_eq!(err.to_string(), "Person 7 does not exist");
    }
}
