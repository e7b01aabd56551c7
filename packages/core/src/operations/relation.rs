//! Relation placement
//!
//! Turns "add X as the <relation> of <reference>" into the `parent_id` /
//! `partner_id` pair the mutation engine expects.

use crate::models::{PersonDraft, PersonId, PersonRecord, RecordIndex};
use crate::operations::error::MutationError;
use serde::{Deserialize, Serialize};

/// Note line appended to a draft added as an ex-spouse
pub const EX_SPOUSE_NOTE: &str = "Status: Ex-Spouse";

/// How a new person relates to an existing reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    Child,
    Spouse,
    Sibling,
    /// Child of the reference's partner
    StepChild,
    ExSpouse,
    /// Inserted above the reference (see [`crate::operations::MutationEngine::add_parent`])
    Parent,
}

/// Where a new record goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Plain add with these links
    Links {
        parent_id: Option<PersonId>,
        partner_id: Option<PersonId>,
        note: Option<&'static str>,
    },
    /// Insert as the parent of an existing record
    ParentOf(PersonId),
}

impl Relation {
    /// Resolve this relation against `reference`.
    ///
    /// A step-child of someone without a partner falls back to a plain child,
    /// and a sibling of a root becomes a root.
    pub fn place(self, records: &[PersonRecord], reference: PersonId) -> Result<Placement, MutationError> {
        let index = RecordIndex::new(records);
        let target = index
            .get(reference)
            .ok_or_else(|| MutationError::person_not_found(reference))?;

        let links = |parent_id, partner_id, note| Placement::Links {
            parent_id,
            partner_id,
            note,
        };

        Ok(match self {
            Relation::Child => links(Some(reference), None, None),
            Relation::Spouse => links(None, Some(reference), None),
            Relation::Sibling => links(target.parent_id.filter(|p| index.contains(*p)), None, None),
            Relation::StepChild => {
                let parent = target.partner_id.filter(|p| index.contains(*p)).unwrap_or(reference);
                links(Some(parent), None, None)
            }
            Relation::ExSpouse => links(None, Some(reference), Some(EX_SPOUSE_NOTE)),
            Relation::Parent => Placement::ParentOf(reference),
        })
    }
}

impl Placement {
    /// Write plain links onto a draft. `ParentOf` leaves the draft's links alone.
    pub fn apply_to(&self, draft: &mut PersonDraft) {
        if let Placement::Links {
            parent_id,
            partner_id,
            note,
        } = self
        {
            draft.parent_id = *parent_id;
            draft.partner_id = *partner_id;
            if let Some(note) = note {
                draft.notes = Some(match draft.notes.as_deref() {
                    Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, note),
                    _ => (*note).to_string(),
                });
            }
        }
    }
}
