//! Aggregator
//!
//! Store-wide figures recomputed on every derivation cycle:
//!
//! - per-record descendant counts over `parent_id` edges
//! - the soonest upcoming birthdays, death anniversaries and anniversaries
//!
//! Both are pure functions of the record snapshot. "Today" is always passed in
//! so results are reproducible.

use crate::models::date::{date_parts, date_with_overflow};
use crate::models::{PersonId, PersonRecord, RecordIndex};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Number of upcoming events returned when no limit is configured
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

/// Transitive descendant count per record id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DescendantCounts {
    counts: BTreeMap<PersonId, usize>,
}

impl DescendantCounts {
    /// Count descendants of every record.
    ///
    /// Uses a parent → children index and an explicit post-order worklist, so
    /// each id is resolved once and deep lineages never recurse. A parent edge
    /// that closes a loop contributes nothing.
    pub fn compute(records: &[PersonRecord]) -> Self {
        let index = RecordIndex::new(records);
        let mut children: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            if index.position(record.id) != Some(position) {
                continue;
            }
            if let Some(parent) = record.parent_id.filter(|p| index.contains(*p)) {
                children.entry(parent).or_default().push(record.id);
            }
        }

        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Pending,
            Done,
        }

        let mut state: HashMap<PersonId, State> = HashMap::with_capacity(records.len());
        let mut counts: BTreeMap<PersonId, usize> = BTreeMap::new();
        let mut stack: Vec<(PersonId, bool)> = Vec::new();

        for record in records {
            if state.contains_key(&record.id) {
                continue;
            }
            stack.push((record.id, false));

            while let Some((id, expanded)) = stack.pop() {
                let kids = children.get(&id).map(Vec::as_slice).unwrap_or(&[]);
                if expanded {
                    let total = kids
                        .iter()
                        .filter(|child| state.get(*child) == Some(&State::Done))
                        .map(|child| 1 + counts.get(child).copied().unwrap_or(0))
                        .sum();
                    counts.insert(id, total);
                    state.insert(id, State::Done);
                    continue;
                }
                if state.contains_key(&id) {
                    continue;
                }
                state.insert(id, State::Pending);
                stack.push((id, true));
                for child in kids {
                    if !state.contains_key(child) {
                        stack.push((*child, false));
                    }
                }
            }
        }

        Self { counts }
    }

    /// Descendants of `id`; zero for childless or unknown ids
    pub fn get(&self, id: PersonId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Displayed count for a couple unit
    pub fn couple_total(&self, id: PersonId, partner: Option<PersonId>) -> usize {
        self.get(id) + partner.map(|p| self.get(p)).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, usize)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Which record date an upcoming event was projected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Birthday,
    #[serde(rename = "Death Anniversary")]
    DeathAnniversary,
    Anniversary,
}

impl EventKind {
    /// Short suffix used in event keys (`5_dob`)
    pub fn suffix(self) -> &'static str {
        match self {
            EventKind::Birthday => "dob",
            EventKind::DeathAnniversary => "dod",
            EventKind::Anniversary => "doa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDate {
    pub id: PersonId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Next occurrence on or after today
    pub date: NaiveDate,
    pub days_until: i64,
    /// Projected year minus the original year
    pub years: i32,
}

impl UpcomingDate {
    /// Stable key combining the record id and event kind
    pub fn key(&self) -> String {
        format!("{}_{}", self.id, self.kind.suffix())
    }
}

/// Next occurrence of a stored date on or after `today`
fn project(value: &str, today: NaiveDate) -> Option<(NaiveDate, i32)> {
    let (year, month, day) = date_parts(value)?;
    let mut next = date_with_overflow(today.year(), month, day)?;
    if next < today {
        next = date_with_overflow(today.year() + 1, month, day)?;
    }
    Some((next, year))
}

/// The `limit` soonest events across the whole store, ascending by days until.
///
/// Events falling on the same day keep record order, then birthday, death
/// anniversary, anniversary. Malformed dates are skipped.
pub fn upcoming_dates(records: &[PersonRecord], today: NaiveDate, limit: usize) -> Vec<UpcomingDate> {
    let mut events = Vec::new();

    for record in records {
        let sources = [
            (EventKind::Birthday, &record.birth_date),
            (EventKind::DeathAnniversary, &record.death_date),
            (EventKind::Anniversary, &record.anniversary_date),
        ];
        for (kind, value) in sources {
            let Some((date, year)) = value.as_deref().and_then(|v| project(v, today)) else {
                continue;
            };
            events.push(UpcomingDate {
                id: record.id,
                name: record.name.clone(),
                kind,
                date,
                days_until: (date - today).num_days(),
                years: date.year() - year,
            });
        }
    }

    events.sort_by_key(|event| event.days_until);
    events.truncate(limit);
    events
}
