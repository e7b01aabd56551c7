//! Mutation Engine
//!
//! Applies add / add-parent / update / delete / move to a record snapshot.
//!
//! # Contract
//!
//! - Every operation borrows the caller's snapshot and returns a new one;
//!   the input is never modified, so a rejection leaves it intact.
//! - Ids come from a monotonic [`IdAllocator`] and are never reused, even
//!   after the record that held them is deleted.
//! - Parentage stays acyclic: move walks upward from the target before
//!   committing, and delete never reparents into the deleted subtree.
//! - Partner links are fixed up on both sides when a record is added with a
//!   partner. A previous partner of that partner keeps its (now one-sided)
//!   link; derivation tolerates the asymmetry.

use crate::models::{PersonDraft, PersonId, PersonPatch, PersonRecord, RecordIndex};
use crate::operations::error::MutationError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// What happens to a deleted record's descendants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Direct children move under the deleted record's partner (or become
    /// roots); grandchildren keep their parents
    #[default]
    Reparent,
    /// All transitive descendants are removed with the record
    Cascade,
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletePolicy::Reparent => write!(f, "reparent"),
            DeletePolicy::Cascade => write!(f, "cascade"),
        }
    }
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "reparent" | "reparent-to-partner" => Ok(DeletePolicy::Reparent),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => Err(format!("unknown delete policy '{}'", other)),
        }
    }
}

/// Monotonic id source
///
/// Seeded above the highest id it has seen. Observing a snapshot or a saved
/// watermark can only move the counter forward. Once `i64::MAX` has been
/// seen there is nothing left to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: Option<i64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded_from(records: &[PersonRecord]) -> Self {
        let mut allocator = Self::new();
        allocator.observe(records);
        allocator
    }

    /// Make sure future ids are above every id in `records`
    pub fn observe(&mut self, records: &[PersonRecord]) {
        if let Some(max) = records.iter().map(|r| r.id.value()).max() {
            self.advance_past(max);
        }
    }

    /// Make sure future ids are at least `next`
    pub fn resume_at(&mut self, next: PersonId) {
        self.next = self.next.map(|current| current.max(next.value()));
    }

    fn advance_past(&mut self, used: i64) {
        self.next = match (self.next, used.checked_add(1)) {
            (Some(current), Some(after)) => Some(current.max(after)),
            _ => None,
        };
    }

    pub fn allocate(&mut self) -> Result<PersonId, MutationError> {
        let id = self.next.ok_or(MutationError::IdSpaceExhausted)?;
        self.next = id.checked_add(1);
        Ok(PersonId(id))
    }

    /// The id the next call to `allocate` returns, if any remain
    pub fn peek(&self) -> Option<PersonId> {
        self.next.map(PersonId)
    }
}

/// Result of a successful add
#[derive(Debug, Clone, PartialEq)]
pub struct Added {
    pub id: PersonId,
    pub records: Vec<PersonRecord>,
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    /// Whether the record existed (`false` is an idempotent no-op)
    pub existed: bool,
    pub policy: DeletePolicy,
    /// Every removed id, the requested one first
    pub removed: Vec<PersonId>,
    /// Children whose `parent_id` was rewritten
    pub reparented: Vec<PersonId>,
    /// Where a selection on the deleted record should move: its parent,
    /// otherwise its partner
    pub next_selection: Option<PersonId>,
    pub records: Vec<PersonRecord>,
}

/// Applies mutations to record snapshots
#[derive(Debug, Clone, Default)]
pub struct MutationEngine {
    ids: IdAllocator,
    delete_policy: DeletePolicy,
}

impl MutationEngine {
    pub fn new(delete_policy: DeletePolicy) -> Self {
        Self {
            ids: IdAllocator::new(),
            delete_policy,
        }
    }

    /// Engine whose allocator starts above every id in `records`
    pub fn for_records(records: &[PersonRecord], delete_policy: DeletePolicy) -> Self {
        Self {
            ids: IdAllocator::seeded_from(records),
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Make sure future ids are above every id in `records`
    pub fn observe_ids(&mut self, records: &[PersonRecord]) {
        self.ids.observe(records);
    }

    /// Continue numbering from a watermark saved by an earlier session
    pub fn resume_ids(&mut self, next: PersonId) {
        self.ids.resume_at(next);
    }

    /// Lowest id this engine could still hand out
    pub fn next_id(&self) -> Option<PersonId> {
        self.ids.peek()
    }

    /// Create a record from `draft`.
    ///
    /// The draft's `parent_id` / `partner_id` are taken as already resolved by
    /// the caller (see [`crate::operations::Relation`]). If a partner is named,
    /// it is pointed back at the new record and, when the draft carries an
    /// anniversary date, receives the same date.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty name or a death date before the birth date
    /// - `UnknownReference` if the parent or partner does not exist
    /// - `IdSpaceExhausted` if every id up to `i64::MAX` is taken
    pub fn add(&mut self, records: &[PersonRecord], draft: PersonDraft) -> Result<Added, MutationError> {
        self.ids.observe(records);
        let index = RecordIndex::new(records);

        let id = self.ids.peek().ok_or(MutationError::IdSpaceExhausted)?;
        let record = draft.into_record(id);
        record.validate()?;
        check_reference(&index, "parent", record.parent_id)?;
        check_reference(&index, "partner", record.partner_id)?;

        self.ids.allocate()?;
        let mut next = records.to_vec();
        if let Some(partner_id) = record.partner_id {
            link_partner(&mut next, partner_id, &record);
        }
        next.push(record);

        tracing::info!("Added person {}", id);
        Ok(Added { id, records: next })
    }

    /// Insert a new record between `child` and the child's current parent.
    ///
    /// The new record inherits the child's old `parent_id` (possibly none) and
    /// the child is reparented under it. Any `parent_id` on the draft is
    /// ignored.
    pub fn add_parent(
        &mut self,
        records: &[PersonRecord],
        child: PersonId,
        mut draft: PersonDraft,
    ) -> Result<Added, MutationError> {
        let index = RecordIndex::new(records);
        let existing = index
            .get(child)
            .ok_or_else(|| MutationError::person_not_found(child))?;

        draft.parent_id = existing.parent_id.filter(|p| index.contains(*p));
        if draft.partner_id == Some(child) {
            draft.partner_id = None;
        }

        let mut added = self.add(records, draft)?;
        for record in added.records.iter_mut().filter(|r| r.id == child) {
            record.parent_id = Some(added.id);
        }

        tracing::info!("Inserted person {} as parent of {}", added.id, child);
        Ok(added)
    }

    /// Apply `patch` to the record `id`.
    ///
    /// Relationship ids are not part of a patch. If the anniversary date
    /// changes and the partner exists, the partner receives the new value.
    pub fn update(
        &self,
        records: &[PersonRecord],
        id: PersonId,
        patch: &PersonPatch,
    ) -> Result<Vec<PersonRecord>, MutationError> {
        let index = RecordIndex::new(records);
        let current = index
            .get(id)
            .ok_or_else(|| MutationError::person_not_found(id))?;

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        updated.validate()?;

        let sync_partner = (updated.anniversary_date != current.anniversary_date)
            .then_some(updated.partner_id)
            .flatten()
            .filter(|partner| *partner != id && index.contains(*partner));

        let mut next = records.to_vec();
        if let Some(position) = index.position(id) {
            next[position] = updated.clone();
        }
        if let Some(partner) = sync_partner {
            for record in next.iter_mut().filter(|r| r.id == partner) {
                record.anniversary_date = updated.anniversary_date.clone();
            }
        }

        tracing::info!("Updated person {}", id);
        Ok(next)
    }

    /// Remove `id` under the engine's configured policy
    pub fn delete(&self, records: &[PersonRecord], id: PersonId) -> DeleteOutcome {
        self.delete_with(records, id, self.delete_policy)
    }

    /// Remove `id` under an explicit policy.
    ///
    /// Deleting an unknown id returns the snapshot unchanged with
    /// `existed == false`. Every surviving `partner_id` that named a removed
    /// record is cleared.
    pub fn delete_with(&self, records: &[PersonRecord], id: PersonId, policy: DeletePolicy) -> DeleteOutcome {
        let index = RecordIndex::new(records);
        let Some(target) = index.get(id) else {
            tracing::debug!("Delete of unknown person {} ignored", id);
            return DeleteOutcome {
                existed: false,
                policy,
                removed: Vec::new(),
                reparented: Vec::new(),
                next_selection: None,
                records: records.to_vec(),
            };
        };

        let descendants = descendants_of(records, id);
        let partner = target
            .partner_id
            .filter(|p| *p != id && index.contains(*p));
        let next_selection = target
            .parent_id
            .filter(|p| index.contains(*p))
            .or(partner);

        let mut removed = vec![id];
        let mut reparented = Vec::new();
        let mut next: Vec<PersonRecord> = match policy {
            DeletePolicy::Cascade => {
                removed.extend(records.iter().map(|r| r.id).filter(|r| descendants.contains(r)));
                records
                    .iter()
                    .filter(|r| r.id != id && !descendants.contains(&r.id))
                    .cloned()
                    .collect()
            }
            DeletePolicy::Reparent => {
                // A partner inside the deleted subtree cannot adopt it
                let new_parent = partner.filter(|p| !descendants.contains(p));
                records
                    .iter()
                    .filter(|r| r.id != id)
                    .cloned()
                    .map(|mut r| {
                        if r.parent_id == Some(id) {
                            r.parent_id = new_parent.filter(|p| *p != r.id);
                            reparented.push(r.id);
                        }
                        r
                    })
                    .collect()
            }
        };

        let removed_set: HashSet<PersonId> = removed.iter().copied().collect();
        for record in next.iter_mut() {
            if record.partner_id.is_some_and(|p| removed_set.contains(&p)) {
                record.partner_id = None;
            }
        }
        let next_selection = next_selection.filter(|s| !removed_set.contains(s));

        tracing::info!(
            "Deleted person {} ({} policy): {} removed, {} reparented",
            id,
            policy,
            removed.len(),
            reparented.len()
        );

        DeleteOutcome {
            existed: true,
            policy,
            removed,
            reparented,
            next_selection,
            records: next,
        }
    }

    /// Reparent `dragged` under `target`.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` if either id is unknown
    /// - `CycleRejected` if `target` is `dragged` or one of its descendants
    pub fn move_person(
        &self,
        records: &[PersonRecord],
        dragged: PersonId,
        target: PersonId,
    ) -> Result<Vec<PersonRecord>, MutationError> {
        let index = RecordIndex::new(records);
        for id in [dragged, target] {
            if !index.contains(id) {
                return Err(MutationError::person_not_found(id));
            }
        }

        if is_descendant(&index, target, dragged) {
            tracing::warn!("Rejected move of {} under its descendant {}", dragged, target);
            return Err(MutationError::cycle_rejected(dragged, target));
        }

        let mut next = records.to_vec();
        for record in next.iter_mut().filter(|r| r.id == dragged) {
            record.parent_id = Some(target);
        }

        tracing::info!("Moved person {} under {}", dragged, target);
        Ok(next)
    }
}

fn check_reference(
    index: &RecordIndex<'_>,
    field: &'static str,
    reference: Option<PersonId>,
) -> Result<(), MutationError> {
    match reference {
        Some(id) if !index.contains(id) => Err(MutationError::unknown_reference(field, id)),
        _ => Ok(()),
    }
}

/// Point `partner_id` back at `record` and share its anniversary date
fn link_partner(records: &mut [PersonRecord], partner_id: PersonId, record: &PersonRecord) {
    for partner in records.iter_mut().filter(|r| r.id == partner_id) {
        if let Some(previous) = partner.partner_id.filter(|p| *p != record.id) {
            tracing::debug!(
                "Person {} re-partnered from {} to {}",
                partner_id,
                previous,
                record.id
            );
        }
        partner.partner_id = Some(record.id);
        if record.anniversary_date.is_some() {
            partner.anniversary_date = record.anniversary_date.clone();
        }
    }
}

/// True if walking `parent_id` upward from `start` reaches `ancestor`.
///
/// A record counts as its own descendant. Pre-existing loops stop the walk.
pub fn is_descendant(index: &RecordIndex<'_>, start: PersonId, ancestor: PersonId) -> bool {
    let mut seen = HashSet::new();
    let mut current = index.get(start);

    while let Some(record) = current {
        if record.id == ancestor {
            return true;
        }
        if !seen.insert(record.id) {
            return false;
        }
        current = record.parent_id.and_then(|parent| index.get(parent));
    }
    false
}

/// Every transitive descendant of `id` via `parent_id`, excluding `id`
pub fn descendants_of(records: &[PersonRecord], id: PersonId) -> HashSet<PersonId> {
    let mut children: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    for record in records {
        if let Some(parent) = record.parent_id {
            children.entry(parent).or_default().push(record.id);
        }
    }

    let mut found = HashSet::new();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        for child in children.get(&current).into_iter().flatten() {
            if *child != id && found.insert(*child) {
                stack.push(*child);
            }
        }
    }
    found
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
