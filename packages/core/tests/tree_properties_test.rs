//! Property tests over generated families
//!
//! Generated parents always point at an earlier record, so every family is
//! acyclic. Partner links are drawn from a parentless record to an earlier
//! one, optionally mirrored, which is how the mutation engine creates them.

use familytree_core::models::{PersonId, PersonRecord};
use familytree_core::operations::{MutationEngine, MutationError};
use familytree_core::services::{highlight_path, DescendantCounts, FamilyTree};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone)]
struct Slot {
    parent: Option<u8>,
    partner: Option<u8>,
    mirror: bool,
}

fn slot() -> impl Strategy<Value = Slot> {
    (any::<Option<u8>>(), any::<Option<u8>>(), any::<bool>()).prop_map(|(parent, partner, mirror)| Slot {
        parent,
        partner,
        mirror,
    })
}

fn assemble(slots: Vec<Slot>) -> Vec<PersonRecord> {
    let mut records: Vec<PersonRecord> = Vec::with_capacity(slots.len());
    for (i, slot) in slots.into_iter().enumerate() {
        let id = PersonId(i as i64 + 1);
        let mut record = PersonRecord::new(id, format!("Person {}", i + 1));

        if i > 0 {
            if let Some(p) = slot.parent {
                record.parent_id = Some(PersonId((p as usize % i) as i64 + 1));
            } else if let Some(q) = slot.partner {
                let j = q as usize % i;
                record.partner_id = Some(PersonId(j as i64 + 1));
                if slot.mirror && records[j].partner_id.is_none() {
                    records[j].partner_id = Some(id);
                }
            }
        }
        records.push(record);
    }
    records
}

/// Acyclic families with engine-shaped partner links
fn family() -> impl Strategy<Value = Vec<PersonRecord>> {
    prop::collection::vec(slot(), 1..40).prop_map(assemble)
}

/// Acyclic families with arbitrary, possibly cross-generation partner links
fn tangled_family() -> impl Strategy<Value = Vec<PersonRecord>> {
    prop::collection::vec((any::<Option<u8>>(), any::<Option<u8>>()), 1..40).prop_map(|slots| {
        let n = slots.len();
        slots
            .into_iter()
            .enumerate()
            .map(|(i, (parent, partner))| {
                let mut record = PersonRecord::new(PersonId(i as i64 + 1), "P");
                if i > 0 {
                    record.parent_id = parent.map(|p| PersonId((p as usize % i) as i64 + 1));
                }
                record.partner_id = partner.map(|q| PersonId((q as usize % n) as i64 + 1));
                record
            })
            .collect()
    })
}

/// `id` and its ancestors, nearest first
fn chain(records: &[PersonRecord], id: PersonId) -> Vec<PersonId> {
    let mut out = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
        out.push(id);
        current = records[(id.0 - 1) as usize].parent_id;
    }
    out
}

proptest! {
    #[test]
    fn property_members_cover_every_record(records in family()) {
        let tree = FamilyTree::build(&records);
        let members = tree.members(tree.roots());

        prop_assert_eq!(members.len(), records.len());
        let ids: HashSet<PersonId> = members.into_iter().collect();
        prop_assert!(records.iter().all(|r| ids.contains(&r.id)));
    }

    #[test]
    fn property_at_most_one_secondary_per_couple(records in tangled_family()) {
        let tree = FamilyTree::build(&records);

        for id in tree.secondary_ids() {
            let anchor = tree.anchor_of(*id);
            prop_assert!(anchor.is_some());
            let anchor = anchor.unwrap();
            prop_assert!(!tree.is_secondary(anchor));
            prop_assert_eq!(records[(id.0 - 1) as usize].partner_id, Some(anchor));
        }
    }

    #[test]
    fn property_symmetric_pair_has_exactly_one_secondary(records in tangled_family()) {
        let tree = FamilyTree::build(&records);

        for record in &records {
            let Some(partner) = record.partner_id else { continue };
            if partner == record.id || records[(partner.0 - 1) as usize].partner_id != Some(record.id) {
                continue;
            }
            prop_assert!(tree.is_secondary(record.id) != tree.is_secondary(partner));
        }
    }

    #[test]
    fn property_move_under_descendant_always_rejected(records in family()) {
        let engine = MutationEngine::default();

        for record in &records {
            let x = record.id;
            for candidate in &records {
                if !chain(&records, candidate.id).contains(&x) {
                    continue;
                }
                let result = engine.move_person(&records, x, candidate.id);
                prop_assert_eq!(result, Err(MutationError::cycle_rejected(x, candidate.id)));
            }
        }
    }

    #[test]
    fn property_single_path_ends_at_root(records in family(), pick in any::<prop::sample::Index>()) {
        let id = records[pick.index(records.len())].id;
        let expected = chain(&records, id);

        let path = highlight_path(&records, id, None);

        prop_assert_eq!(&path, &expected.iter().copied().collect::<BTreeSet<_>>());
        let top = *expected.last().unwrap();
        prop_assert!(records[(top.0 - 1) as usize].parent_id.is_none());
    }

    #[test]
    fn property_two_id_path_meets_at_common_ancestor(
        records in family(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let a = records[a.index(records.len())].id;
        let a_chain = chain(&records, a);
        let root = a_chain.last().copied();
        let same_tree: Vec<PersonId> = records
            .iter()
            .map(|r| r.id)
            .filter(|id| chain(&records, *id).last().copied() == root)
            .collect();
        let b = same_tree[b.index(same_tree.len())];
        let b_chain = chain(&records, b);

        let lca = a_chain.iter().copied().find(|id| b_chain.contains(id)).unwrap();
        let path = highlight_path(&records, a, Some(b));

        prop_assert!(path.contains(&lca));
        prop_assert!(path.contains(&a) && path.contains(&b));
        for id in &path {
            prop_assert!(a_chain.contains(id) || b_chain.contains(id));
        }
        // Nothing above the meeting point
        for id in a_chain.iter().skip_while(|id| **id != lca).skip(1) {
            prop_assert!(!path.contains(id));
        }
    }

    #[test]
    fn property_descendant_counts_match_subtrees(records in family()) {
        let counts = DescendantCounts::compute(&records);

        for record in &records {
            let has_children = records.iter().any(|r| r.parent_id == Some(record.id));
            if !has_children {
                prop_assert_eq!(counts.get(record.id), 0);
            }
            if record.parent_id.is_none() {
                let subtree = records
                    .iter()
                    .filter(|r| chain(&records, r.id).contains(&record.id))
                    .count();
                prop_assert_eq!(counts.get(record.id), subtree - 1);
            }
        }
    }
}
