//! Family Tree Service
//!
//! Owns the current record snapshot and brackets every engine call with the
//! store: load once on open, save after each accepted mutation. Derivations
//! run against the in-memory snapshot and never touch the store.
//!
//! The engine's id watermark is saved before the records it covers, so a
//! reopened service never hands out an id that an earlier session used.

use crate::config::EngineConfig;
use crate::db::RecordStore;
use crate::export;
use crate::models::{sample_family, PersonDraft, PersonId, PersonPatch, PersonRecord, RecordIndex};
use crate::operations::{
    is_descendant, DeleteOutcome, DeletePolicy, History, MutationEngine, MutationError, Placement, Relation,
};
use crate::services::derivation::{derive, DerivationReport, DerivationRequest};
use crate::services::error::FamilyServiceError;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

pub struct FamilyTreeService {
    store: Arc<dyn RecordStore>,
    records: Vec<PersonRecord>,
    engine: MutationEngine,
    saved_next_id: Option<PersonId>,
    history: History,
    config: EngineConfig,
}

impl FamilyTreeService {
    /// Load the saved family, or start from the sample family when the store
    /// has never been written.
    pub async fn open(store: Arc<dyn RecordStore>, config: EngineConfig) -> Result<Self, FamilyServiceError> {
        let records = match store.load().await.map_err(FamilyServiceError::storage)? {
            Some(records) => {
                tracing::info!("Loaded {} people", records.len());
                records
            }
            None => {
                tracing::info!("No saved family, starting from the sample family");
                sample_family()
            }
        };

        let mut engine = MutationEngine::for_records(&records, config.delete_policy);
        let saved_next_id = store.load_next_id().await.map_err(FamilyServiceError::storage)?;
        if let Some(next) = saved_next_id {
            engine.resume_ids(next);
        }

        Ok(Self {
            engine,
            saved_next_id,
            history: History::new(config.history_limit),
            store,
            records,
            config,
        })
    }

    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    //
    // DERIVATION
    //

    /// Request for `today` carrying the configured upcoming-date limit
    pub fn request(&self, today: NaiveDate) -> DerivationRequest {
        DerivationRequest::new(today).with_upcoming_limit(self.config.upcoming_limit)
    }

    pub fn derive(&self, request: &DerivationRequest) -> DerivationReport {
        derive(&self.records, request)
    }

    //
    // MUTATIONS
    //

    pub async fn add(&mut self, draft: PersonDraft) -> Result<PersonId, FamilyServiceError> {
        let added = self.engine.add(&self.records, draft).map_err(rejected)?;
        self.commit(added.records).await?;
        Ok(added.id)
    }

    /// Add `draft` as the `relation` of `reference`
    pub async fn add_relative(
        &mut self,
        relation: Relation,
        reference: PersonId,
        mut draft: PersonDraft,
    ) -> Result<PersonId, FamilyServiceError> {
        match relation.place(&self.records, reference).map_err(rejected)? {
            Placement::ParentOf(child) => self.add_parent(child, draft).await,
            placement => {
                placement.apply_to(&mut draft);
                self.add(draft).await
            }
        }
    }

    pub async fn add_parent(&mut self, child: PersonId, draft: PersonDraft) -> Result<PersonId, FamilyServiceError> {
        let added = self
            .engine
            .add_parent(&self.records, child, draft)
            .map_err(rejected)?;
        self.commit(added.records).await?;
        Ok(added.id)
    }

    pub async fn update(&mut self, id: PersonId, patch: &PersonPatch) -> Result<(), FamilyServiceError> {
        if patch.is_empty() {
            return Ok(());
        }
        let next = self.engine.update(&self.records, id, patch).map_err(rejected)?;
        self.commit(next).await
    }

    /// Delete under the configured policy. Deleting an unknown id saves
    /// nothing and records no history.
    pub async fn delete(&mut self, id: PersonId) -> Result<DeleteOutcome, FamilyServiceError> {
        let policy = self.engine.delete_policy();
        self.delete_with(id, policy).await
    }

    pub async fn delete_with(&mut self, id: PersonId, policy: DeletePolicy) -> Result<DeleteOutcome, FamilyServiceError> {
        let outcome = self.engine.delete_with(&self.records, id, policy);
        if !outcome.existed {
            tracing::debug!("Delete of unknown person {} ignored", id);
            return Ok(outcome);
        }
        self.commit(outcome.records.clone()).await?;
        Ok(outcome)
    }

    pub async fn move_person(&mut self, dragged: PersonId, target: PersonId) -> Result<(), FamilyServiceError> {
        let next = self
            .engine
            .move_person(&self.records, dragged, target)
            .map_err(rejected)?;
        self.commit(next).await
    }

    /// Replace the whole collection with a JSON export
    pub async fn import_json(&mut self, input: &str) -> Result<usize, FamilyServiceError> {
        let records = export::from_json(input)?;
        self.replace_all(records).await
    }

    /// Replace the whole collection with a CSV export
    pub async fn import_csv(&mut self, input: &str) -> Result<usize, FamilyServiceError> {
        let records = export::from_csv(input)?;
        self.replace_all(records).await
    }

    /// Replace the collection with the sample family
    pub async fn reset(&mut self) -> Result<(), FamilyServiceError> {
        self.commit(sample_family()).await
    }

    pub fn export_json(&self) -> Result<String, FamilyServiceError> {
        Ok(export::to_json(&self.records)?)
    }

    pub fn export_csv(&self) -> String {
        export::to_csv(&self.records)
    }

    //
    // HISTORY
    //

    /// Restore the snapshot before the last change. Returns `false` when
    /// there is nothing to undo.
    pub async fn undo(&mut self) -> Result<bool, FamilyServiceError> {
        let Some(previous) = self.history.undo(self.records.clone()) else {
            return Ok(false);
        };
        if let Err(err) = self.store.save(&previous).await {
            self.history.redo(previous);
            return Err(FamilyServiceError::storage(err));
        }
        self.records = previous;
        tracing::info!("Undo: {} people", self.records.len());
        Ok(true)
    }

    pub async fn redo(&mut self) -> Result<bool, FamilyServiceError> {
        let Some(next) = self.history.redo(self.records.clone()) else {
            return Ok(false);
        };
        if let Err(err) = self.store.save(&next).await {
            self.history.undo(next);
            return Err(FamilyServiceError::storage(err));
        }
        self.records = next;
        tracing::info!("Redo: {} people", self.records.len());
        Ok(true)
    }

    async fn replace_all(&mut self, records: Vec<PersonRecord>) -> Result<usize, FamilyServiceError> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(duplicate) = records.iter().find(|r| !seen.insert(r.id)) {
            tracing::warn!("Rejected import with duplicate id {}", duplicate.id);
            return Err(FamilyServiceError::duplicate_id(duplicate.id));
        }

        let index = RecordIndex::new(&records);
        let looped = records.iter().find(|r| {
            r.parent_id
                .is_some_and(|parent| is_descendant(&index, parent, r.id))
        });
        if let Some(record) = looped {
            tracing::warn!("Rejected import with a parent cycle through {}", record.id);
            return Err(FamilyServiceError::parent_cycle(record.id));
        }

        let count = records.len();
        self.commit(records).await?;
        tracing::info!("Imported {} people", count);
        Ok(count)
    }

    /// Save `next` and make it current. The snapshot is unchanged if the
    /// save fails.
    async fn commit(&mut self, next: Vec<PersonRecord>) -> Result<(), FamilyServiceError> {
        self.engine.observe_ids(&next);
        self.save_next_id().await?;

        self.store.save(&next).await.map_err(|err| {
            tracing::error!("Failed to save family: {:#}", err);
            FamilyServiceError::storage(err)
        })?;
        let previous = std::mem::replace(&mut self.records, next);
        self.history.record(previous);
        Ok(())
    }

    async fn save_next_id(&mut self) -> Result<(), FamilyServiceError> {
        let Some(next) = self.engine.next_id() else {
            return Ok(());
        };
        if self.saved_next_id == Some(next) {
            return Ok(());
        }

        self.store.save_next_id(next).await.map_err(|err| {
            tracing::error!("Failed to save id watermark: {:#}", err);
            FamilyServiceError::storage(err)
        })?;
        self.saved_next_id = Some(next);
        Ok(())
    }
}

fn rejected(err: MutationError) -> FamilyServiceError {
    tracing::warn!("{}", err);
    err.into()
}
