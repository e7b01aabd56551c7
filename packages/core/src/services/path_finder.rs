//! Path Finder
//!
//! Highlights the lineage connecting one or two selected records. Chains are
//! walked over the flat collection, not the derived tree, so secondary
//! partners keep their own ancestry.

use crate::models::{PersonId, PersonRecord, RecordIndex};
use std::collections::{BTreeSet, HashSet};

/// `id` followed by each resolvable ancestor, nearest first.
///
/// Empty for an unknown id. The walk stops at a missing parent or at an id it
/// has already visited.
pub fn ancestor_chain(index: &RecordIndex<'_>, id: PersonId) -> Vec<PersonId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = index.get(id);

    while let Some(record) = current {
        if !seen.insert(record.id) {
            break;
        }
        chain.push(record.id);
        current = record.parent_id.and_then(|parent| index.get(parent));
    }

    chain
}

/// Nearest id on `a_chain` that also appears on `b_chain`
pub fn lowest_common_ancestor(a_chain: &[PersonId], b_chain: &[PersonId]) -> Option<PersonId> {
    let b: HashSet<PersonId> = b_chain.iter().copied().collect();
    a_chain.iter().copied().find(|id| b.contains(id))
}

/// Ids to highlight for a selection and an optional second target.
///
/// With one id this is its full ancestor chain. With two ids it is both
/// chains up to and including their lowest common ancestor, or just the two
/// ids when they share no ancestor.
pub fn highlight_path(
    records: &[PersonRecord],
    selected: PersonId,
    target: Option<PersonId>,
) -> BTreeSet<PersonId> {
    let index = RecordIndex::new(records);
    let a_chain = ancestor_chain(&index, selected);

    let Some(target) = target else {
        return a_chain.into_iter().collect();
    };

    let b_chain = ancestor_chain(&index, target);
    match lowest_common_ancestor(&a_chain, &b_chain) {
        Some(lca) => {
            let mut ids = BTreeSet::new();
            for chain in [&a_chain, &b_chain] {
                for id in chain.iter().copied() {
                    ids.insert(id);
                    if id == lca {
                        break;
                    }
                }
            }
            ids
        }
        None => BTreeSet::from([selected, target]),
    }
}
