//! Data Models
//!
//! This module contains the persisted record shape and its helpers:
//!
//! - `PersonRecord` - the flat, stored person entity
//! - `PersonDraft` / `PersonPatch` - inputs to add and update
//! - `RecordIndex` - id lookup over one snapshot
//! - date helpers shared by validation and the aggregator
//!
//! Everything derived from records (tree nodes, counts, paths) lives in
//! [`crate::services`] and is never persisted.

pub mod date;
mod index;
mod person;
mod sample;

pub use index::RecordIndex;
pub use person::{Gender, PersonDraft, PersonId, PersonPatch, PersonRecord, ValidationError};
pub use sample::sample_family;
