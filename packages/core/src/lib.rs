//! Family Tree Core
//!
//! Derivation and mutation engine for a single-lineage family tree.
//!
//! # Architecture
//!
//! - **Flat records**: each person stores one `parent_id` and one `partner_id`;
//!   the tree shape is always re-derived, never persisted
//! - **Snapshots in, snapshots out**: mutations take the current collection
//!   and return the next one, or a typed rejection
//! - **Store at the edge**: persistence is a `RecordStore` load/save pair
//!
//! # Modules
//!
//! - [`models`] - `PersonRecord`, drafts, patches, date helpers
//! - [`services`] - tree building, view selection, aggregates, search, paths
//! - [`operations`] - add / update / delete / move, relations, undo history
//! - [`export`] - JSON and CSV import/export
//! - [`db`] - `RecordStore` trait with file and in-memory stores
//! - [`config`] - engine settings from serde or `FAMILYTREE_*` variables

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use config::EngineConfig;
pub use models::*;
pub use operations::{DeletePolicy, MutationEngine, MutationError, Relation};
pub use services::{derive, DerivationReport, DerivationRequest, FamilyTree, FamilyTreeService};
