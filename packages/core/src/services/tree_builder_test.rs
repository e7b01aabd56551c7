//! Tests for forest derivation
//!
//! Covers couple merging, child ordering, folding of a secondary partner's
//! children and tolerance of dangling or asymmetric references.

#[cfg(test)]
mod tests {
    use crate::models::{sample_family, PersonId, PersonRecord};
    use crate::services::tree_builder::FamilyTree;

    fn ids(values: &[i64]) -> Vec<PersonId> {
        values.iter().copied().map(PersonId).collect()
    }

    #[test]
    fn test_couple_with_child() {
        let records = vec![
            PersonRecord::new(PersonId(1), "A").with_partner(PersonId(2)),
            PersonRecord::new(PersonId(2), "B").with_partner(PersonId(1)),
            PersonRecord::new(PersonId(3), "C").with_parent(PersonId(1)),
        ];

        let tree = FamilyTree::build(&records);

        assert_eq!(tree.roots(), ids(&[1]).as_slice());
        assert!(tree.is_secondary(PersonId(2)));
        assert!(!tree.is_secondary(PersonId(1)));
        assert_eq!(tree.children_of(PersonId(1)), ids(&[3]).as_slice());
        assert_eq!(tree.partner_of(PersonId(1)), Some(PersonId(2)));
        assert_eq!(tree.partner_of(PersonId(2)), Some(PersonId(1)));
        assert_eq!(tree.anchor_of(PersonId(2)), Some(PersonId(1)));
    }

    #[test]
    fn test_partner_married_into_bloodline_is_secondary() {
        let tree = FamilyTree::build(&sample_family());

        // Mother (7) has no parent while Father (3) does
        assert!(tree.is_secondary(PersonId(7)));
        assert!(!tree.is_secondary(PersonId(3)));
        // Grandmother (2) loses the tie-break on the larger id
        assert!(tree.is_secondary(PersonId(2)));
        assert_eq!(tree.secondary_ids().len(), 2);

        assert_eq!(tree.roots(), ids(&[1]).as_slice());
        assert_eq!(tree.children_of(PersonId(1)), ids(&[3, 4]).as_slice());
        assert_eq!(tree.children_of(PersonId(3)), ids(&[5, 6]).as_slice());
    }

    #[test]
    fn test_secondary_children_fold_into_anchor() {
        let records = vec![
            PersonRecord::new(PersonId(1), "Father").with_partner(PersonId(2)),
            PersonRecord::new(PersonId(2), "Mother").with_partner(PersonId(1)),
            PersonRecord::new(PersonId(3), "Son").with_parent(PersonId(1)),
            PersonRecord::new(PersonId(4), "Daughter").with_parent(PersonId(2)),
        ];

        let tree = FamilyTree::build(&records);

        assert_eq!(tree.roots(), ids(&[1]).as_slice());
        assert_eq!(tree.children_of(PersonId(1)), ids(&[3, 4]).as_slice());
        assert_eq!(tree.node(PersonId(1)).unwrap().folded, ids(&[2]));
    }

    #[test]
    fn test_children_keep_input_order() {
        let records = vec![
            PersonRecord::new(PersonId(10), "Parent"),
            PersonRecord::new(PersonId(30), "Third").with_parent(PersonId(10)),
            PersonRecord::new(PersonId(20), "Second").with_parent(PersonId(10)),
            PersonRecord::new(PersonId(40), "Fourth").with_parent(PersonId(10)),
        ];

        let tree = FamilyTree::build(&records);
        assert_eq!(tree.children_of(PersonId(10)), ids(&[30, 20, 40]).as_slice());
    }

    #[test]
    fn test_dangling_references_are_absent() {
        let records = vec![
            PersonRecord::new(PersonId(1), "Orphan").with_parent(PersonId(99)),
            PersonRecord::new(PersonId(2), "Widow").with_partner(PersonId(98)),
        ];

        let tree = FamilyTree::build(&records);

        assert_eq!(tree.roots(), ids(&[1, 2]).as_slice());
        assert!(tree.secondary_ids().is_empty());
        assert_eq!(tree.partner_of(PersonId(2)), None);
        assert_eq!(tree.parent_of(PersonId(1)), None);
    }

    #[test]
    fn test_asymmetric_partner_links_both_ways() {
        let records = vec![
            PersonRecord::new(PersonId(1), "A").with_partner(PersonId(2)),
            PersonRecord::new(PersonId(2), "B"),
        ];

        let tree = FamilyTree::build(&records);

        assert_eq!(tree.partner_of(PersonId(1)), Some(PersonId(2)));
        assert_eq!(tree.partner_of(PersonId(2)), Some(PersonId(1)));
        // B never names a partner, so it cannot be folded away
        assert!(!tree.is_secondary(PersonId(2)));
    }

    #[test]
    fn test_secondary_is_never_an_anchor() {
        // 2 points at 1 and 3 points at 2: only one member of each couple yields
        let records = vec![
            PersonRecord::new(PersonId(1), "A").with_partner(PersonId(2)),
            PersonRecord::new(PersonId(2), "B").with_partner(PersonId(1)),
            PersonRecord::new(PersonId(3), "C").with_partner(PersonId(2)),
        ];

        let tree = FamilyTree::build(&records);

        assert!(tree.is_secondary(PersonId(2)));
        assert!(!tree.is_secondary(PersonId(3)));
        assert_eq!(tree.roots(), ids(&[1, 3]).as_slice());
    }

    #[test]
    fn test_members_cover_every_record_once() {
        let records = sample_family();
        let tree = FamilyTree::build(&records);

        let mut members = tree.members(tree.roots());
        assert_eq!(members.len(), records.len());
        members.sort();
        assert_eq!(members, ids(&[1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_view_nests_children_and_partner() {
        let tree = FamilyTree::build(&sample_family());
        let view = tree.view(PersonId(1)).unwrap();

        assert_eq!(view.person.name, "Grandfather");
        assert_eq!(view.partner.as_ref().map(|p| p.id), Some(PersonId(2)));
        assert_eq!(view.children.len(), 2);
        assert_eq!(view.children[0].children.len(), 2);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["isSecondary"], false);
        assert_eq!(json["children"][0]["name"], "Father");
    }

    #[test]
    fn test_view_skips_child_already_on_path() {
        // 2 is a secondary whose own child is its anchor
        let records = vec![
            PersonRecord::new(PersonId(1), "A")
                .with_parent(PersonId(2))
                .with_partner(PersonId(2)),
            PersonRecord::new(PersonId(2), "B").with_partner(PersonId(1)),
        ];

        let tree = FamilyTree::build(&records);
        let view = tree.view(PersonId(1)).unwrap();
        assert!(view.children.is_empty());
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let records = vec![
            PersonRecord::new(PersonId(1), "First"),
            PersonRecord::new(PersonId(1), "Second"),
        ];

        let tree = FamilyTree::build(&records);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(PersonId(1)).unwrap().record.name, "First");
    }
}
