//! Id lookup over a flat record slice

use crate::models::{PersonId, PersonRecord};
use std::collections::HashMap;

/// Borrowed id → record map over one snapshot.
///
/// If a snapshot carries duplicate ids the first occurrence wins, matching a
/// front-to-back scan of the collection.
#[derive(Debug, Clone)]
pub struct RecordIndex<'a> {
    records: &'a [PersonRecord],
    positions: HashMap<PersonId, usize>,
}

impl<'a> RecordIndex<'a> {
    pub fn new(records: &'a [PersonRecord]) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            positions.entry(record.id).or_insert(position);
        }
        Self { records, positions }
    }

    pub fn get(&self, id: PersonId) -> Option<&'a PersonRecord> {
        self.positions.get(&id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn position(&self, id: PersonId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// The record's parent, if its `parent_id` resolves
    pub fn parent_of(&self, id: PersonId) -> Option<&'a PersonRecord> {
        self.get(id)?.parent_id.and_then(|parent| self.get(parent))
    }

    /// The record's partner, if its `partner_id` resolves
    pub fn partner_of(&self, id: PersonId) -> Option<&'a PersonRecord> {
        self.get(id)?.partner_id.and_then(|partner| self.get(partner))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
