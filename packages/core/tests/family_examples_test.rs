//! Worked examples over small hand-built families
//!
//! Tests cover:
//! - Couple merging and descendant counts for a three-person family
//! - Relationship search
//! - Delete under both policies

use familytree_core::models::{PersonId, PersonRecord};
use familytree_core::operations::{DeletePolicy, MutationEngine};
use familytree_core::services::{search, DescendantCounts, FamilyTree};
use std::collections::BTreeSet;

fn ids(values: &[i64]) -> BTreeSet<PersonId> {
    values.iter().copied().map(PersonId).collect()
}

fn find(records: &[PersonRecord], id: i64) -> Option<&PersonRecord> {
    records.iter().find(|r| r.id == PersonId(id))
}

// =========================================================================
// Tree Building
// =========================================================================

#[test]
fn test_couple_with_one_child() {
    let records = vec![
        PersonRecord::new(PersonId(1), "A").with_partner(PersonId(2)),
        PersonRecord::new(PersonId(2), "B").with_partner(PersonId(1)),
        PersonRecord::new(PersonId(3), "C").with_parent(PersonId(1)),
    ];

    let tree = FamilyTree::build(&records);

    assert_eq!(tree.roots(), &[PersonId(1)]);
    assert_eq!(tree.children_of(PersonId(1)), &[PersonId(3)]);
    assert_eq!(tree.partner_of(PersonId(1)), Some(PersonId(2)));
    assert_eq!(tree.secondary_ids(), &ids(&[2]));
    assert_eq!(DescendantCounts::compute(&records).get(PersonId(1)), 1);
}

// =========================================================================
// Search
// =========================================================================

#[test]
fn test_children_of_named_parent() {
    let records = vec![
        PersonRecord::new(PersonId(3), "Father"),
        PersonRecord::new(PersonId(5), "Son").with_parent(PersonId(3)),
        PersonRecord::new(PersonId(6), "Daughter").with_parent(PersonId(3)),
    ];

    assert_eq!(search(&records, "children of Father"), ids(&[5, 6]));
}

// =========================================================================
// Delete Policies
// =========================================================================

fn parent_with_two_children() -> Vec<PersonRecord> {
    vec![
        PersonRecord::new(PersonId(1), "Parent").with_partner(PersonId(2)),
        PersonRecord::new(PersonId(2), "Partner").with_partner(PersonId(1)),
        PersonRecord::new(PersonId(3), "First").with_parent(PersonId(1)),
        PersonRecord::new(PersonId(4), "Second").with_parent(PersonId(1)),
    ]
}

#[test]
fn test_cascade_removes_record_and_children() {
    let records = parent_with_two_children();
    let engine = MutationEngine::for_records(&records, DeletePolicy::Cascade);

    let outcome = engine.delete(&records, PersonId(1));

    assert_eq!(outcome.records.len(), 1);
    assert!(find(&outcome.records, 2).is_some());
    assert_eq!(
        outcome.removed.iter().copied().collect::<BTreeSet<_>>(),
        ids(&[1, 3, 4])
    );
}

#[test]
fn test_reparent_moves_children_to_partner() {
    let records = parent_with_two_children();
    let engine = MutationEngine::for_records(&records, DeletePolicy::Reparent);

    let outcome = engine.delete(&records, PersonId(1));

    assert_eq!(outcome.removed, vec![PersonId(1)]);
    assert_eq!(outcome.records.len(), 3);
    for child in [3, 4] {
        assert_eq!(
            find(&outcome.records, child).and_then(|r| r.parent_id),
            Some(PersonId(2))
        );
    }

    // The partner now heads the tree on its own
    let tree = FamilyTree::build(&outcome.records);
    assert_eq!(tree.roots(), &[PersonId(2)]);
    assert!(tree.secondary_ids().is_empty());
}
