//! Chronological listing of the records in the current view

use crate::models::date::{parse_date, whole_years_between};
use crate::models::{PersonId, PersonRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: PersonId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    /// Age today, or age reached at death
    pub years: Option<i32>,
    pub is_secondary: bool,
}

/// Visible records ordered by birth date; undated records follow in input order.
///
/// Records whose birth date does not parse count as undated. Equal birth dates
/// keep input order in both directions.
pub fn timeline(
    records: &[PersonRecord],
    visible: &HashSet<PersonId>,
    secondary: &BTreeSet<PersonId>,
    order: SortOrder,
    today: NaiveDate,
) -> Vec<TimelineEntry> {
    let mut dated = Vec::new();
    let mut undated = Vec::new();

    for record in records.iter().filter(|r| visible.contains(&r.id)) {
        let birth = record.birth_date.as_deref().and_then(parse_date);
        let death = record.death_date.as_deref().and_then(parse_date);
        let entry = TimelineEntry {
            id: record.id,
            name: record.name.clone(),
            birth_date: birth,
            death_date: death,
            years: birth.map(|b| whole_years_between(b, death.unwrap_or(today))),
            is_secondary: secondary.contains(&record.id),
        };
        match birth {
            Some(_) => dated.push(entry),
            None => undated.push(entry),
        }
    }

    match order {
        SortOrder::Asc => dated.sort_by_key(|entry| entry.birth_date),
        SortOrder::Desc => dated.sort_by(|a, b| b.birth_date.cmp(&a.birth_date)),
    }

    dated.extend(undated);
    dated
}
