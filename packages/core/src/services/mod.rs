//! Business Services
//!
//! Read-side derivations over a record snapshot, plus the service that owns
//! the snapshot:
//!
//! - `FamilyTree` - partner-aware forest built from flat records
//! - `select_view` / `current_root_id` - which roots the caller sees
//! - `DescendantCounts` / `upcoming_dates` - aggregates
//! - `search` - name and relationship queries
//! - `highlight_path` - lineage between one or two people
//! - `timeline` - chronological listing of visible people
//! - `derive` - all of the above in one pass
//! - `FamilyTreeService` - store-backed mutations with undo/redo
//!
//! Everything except `FamilyTreeService` is a pure function of its inputs.

pub mod aggregator;
pub mod derivation;
pub mod error;
pub mod family_service;
pub mod path_finder;
pub mod search;
pub mod timeline;
pub mod tree_builder;
pub mod view_selector;

pub use aggregator::{upcoming_dates, DescendantCounts, EventKind, UpcomingDate, DEFAULT_UPCOMING_LIMIT};
pub use derivation::{derive, DerivationReport, DerivationRequest};
pub use error::FamilyServiceError;
pub use family_service::FamilyTreeService;
pub use path_finder::{ancestor_chain, highlight_path, lowest_common_ancestor};
pub use search::{search, SearchQuery};
pub use timeline::{SortOrder, TimelineEntry};
pub use tree_builder::{FamilyNode, FamilyTree, TreeView};
pub use view_selector::{current_root_id, default_selection, select_view, visible_ids, ViewFilter, ViewSelection};
