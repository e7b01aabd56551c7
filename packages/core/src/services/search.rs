//! Search Engine
//!
//! Resolves a free-text query into the set of record ids to highlight.
//! Queries are trimmed and matched case-insensitively. Relationship phrases
//! are tried first, in this order:
//!
//! 1. `siblings of X` / `brothers of X` / `sisters of X`
//! 2. `children of X` / `kids of X` / `sons of X` / `daughters of X`
//! 3. `parents of X` / `father of X` / `mother of X` / `mom of X` / `dad of X`
//!
//! Anything else is a plain substring match on the name. `X` itself is always
//! a substring match, so one phrase can target several people.

use crate::models::{PersonId, PersonRecord, RecordIndex};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const SIBLINGS_PATTERN: &str = r"^(?:siblings?|brothers?|sisters?) of (.+)$";
const CHILDREN_PATTERN: &str = r"^(?:children|kids?|sons?|daughters?) of (.+)$";
const PARENTS_PATTERN: &str = r"^(?:parents?|father|mother|mom|dad) of (.+)$";

/// A parsed, lower-cased query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Siblings(String),
    Children(String),
    Parents(String),
    Name(String),
}

impl SearchQuery {
    /// Parse a raw query. Blank input yields `None` so it never matches everything.
    pub fn parse(raw: &str) -> Option<Self> {
        let query = raw.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        static SIBLINGS_REGEX: OnceLock<Regex> = OnceLock::new();
        static CHILDREN_REGEX: OnceLock<Regex> = OnceLock::new();
        static PARENTS_REGEX: OnceLock<Regex> = OnceLock::new();

        let siblings = SIBLINGS_REGEX.get_or_init(|| Regex::new(SIBLINGS_PATTERN).unwrap());
        let children = CHILDREN_REGEX.get_or_init(|| Regex::new(CHILDREN_PATTERN).unwrap());
        let parents = PARENTS_REGEX.get_or_init(|| Regex::new(PARENTS_PATTERN).unwrap());

        let target = |regex: &Regex| {
            regex
                .captures(&query)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        };

        let parsed = if let Some(name) = target(siblings) {
            SearchQuery::Siblings(name)
        } else if let Some(name) = target(children) {
            SearchQuery::Children(name)
        } else if let Some(name) = target(parents) {
            SearchQuery::Parents(name)
        } else {
            SearchQuery::Name(query.clone())
        };
        Some(parsed)
    }
}

fn name_matches(record: &PersonRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
}

/// Ids matched by `raw` over the record collection
pub fn search(records: &[PersonRecord], raw: &str) -> BTreeSet<PersonId> {
    let Some(query) = SearchQuery::parse(raw) else {
        return BTreeSet::new();
    };
    execute(records, &query)
}

/// Run an already parsed query
pub fn execute(records: &[PersonRecord], query: &SearchQuery) -> BTreeSet<PersonId> {
    let mut ids = BTreeSet::new();

    match query {
        SearchQuery::Siblings(name) => {
            for target in records.iter().filter(|r| name_matches(r, name)) {
                let Some(parent) = target.parent_id else {
                    continue;
                };
                ids.extend(
                    records
                        .iter()
                        .filter(|r| r.parent_id == Some(parent) && r.id != target.id)
                        .map(|r| r.id),
                );
            }
        }
        SearchQuery::Children(name) => {
            for target in records.iter().filter(|r| name_matches(r, name)) {
                ids.extend(
                    records
                        .iter()
                        .filter(|r| r.parent_id == Some(target.id))
                        .map(|r| r.id),
                );
            }
        }
        SearchQuery::Parents(name) => {
            let index = RecordIndex::new(records);
            ids.extend(
                records
                    .iter()
                    .filter(|r| name_matches(r, name))
                    .filter_map(|r| r.parent_id)
                    .filter(|parent| index.contains(*parent)),
            );
        }
        SearchQuery::Name(needle) => {
            ids.extend(
                records
                    .iter()
                    .filter(|r| name_matches(r, needle))
                    .map(|r| r.id),
            );
        }
    }

    tracing::debug!("Search {:?} matched {} record(s)", query, ids.len());
    ids
}
