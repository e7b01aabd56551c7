//! RecordStore Trait - persistence boundary
//!
//! The engine never stores anything itself. A `RecordStore` is the caller's
//! load/save pair bracketing each pure derivation or mutation.
//!
//! # Design Decisions
//!
//! 1. **Async**: implementations may touch the filesystem or a network
//! 2. **Whole snapshots**: `save` replaces the stored collection; there are no
//!    per-record writes
//! 3. **Id watermark**: the lowest id never handed out is saved next to the
//!    collection, so ids freed by a delete stay retired after a reload
//! 4. **Error Handling**: `anyhow::Result` for flexible error context
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::db::{InMemoryRecordStore, RecordStore};
//! use familytree_core::models::{PersonId, PersonRecord};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = InMemoryRecordStore::new();
//! assert!(store.load().await?.is_none());
//!
//! store.save(&[PersonRecord::new(PersonId(1), "Ada")]).await?;
//! assert_eq!(store.load().await?.map(|r| r.len()), Some(1));
//! # Ok(())
//! # }
//! ```

use crate::models::{PersonId, PersonRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Load/save pair for the authoritative record collection
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a service holding one can be
/// moved across tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The saved collection, or `None` if nothing has been saved yet
    async fn load(&self) -> Result<Option<Vec<PersonRecord>>>;

    /// Replace the saved collection
    async fn save(&self, records: &[PersonRecord]) -> Result<()>;

    /// The saved id watermark, or `None` if none was saved
    async fn load_next_id(&self) -> Result<Option<PersonId>>;

    /// Record that ids below `next` have been handed out
    async fn save_next_id(&self, next: PersonId) -> Result<()>;
}
