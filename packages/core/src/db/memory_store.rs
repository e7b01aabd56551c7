//! In-memory record store, used by tests and ephemeral sessions

use crate::db::RecordStore;
use crate::models::{PersonId, PersonRecord};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Option<Vec<PersonRecord>>>,
    next_id: RwLock<Option<PersonId>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated as if `records` had been saved
    pub fn with_records(records: Vec<PersonRecord>) -> Self {
        Self {
            records: RwLock::new(Some(records)),
            next_id: RwLock::new(None),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self) -> Result<Option<Vec<PersonRecord>>> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[PersonRecord]) -> Result<()> {
        *self.records.write().await = Some(records.to_vec());
        tracing::debug!("Saved {} record(s) in memory", records.len());
        Ok(())
    }

    async fn load_next_id(&self) -> Result<Option<PersonId>> {
        Ok(*self.next_id.read().await)
    }

    async fn save_next_id(&self, next: PersonId) -> Result<()> {
        *self.next_id.write().await = Some(next);
        Ok(())
    }
}
