//! View Selector
//!
//! Narrows the derived forest to the roots a caller should render for the
//! current filter and selection.

use crate::models::{PersonId, PersonRecord};
use crate::services::tree_builder::FamilyTree;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-supplied filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    /// The whole tree that contains the selection (or the full forest)
    #[default]
    All,
    /// Only the selected node's own subtree
    Descendants,
}

/// Filter plus optional selection, as held by the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSelection {
    #[serde(default)]
    pub filter: ViewFilter,

    #[serde(default)]
    pub selected: Option<PersonId>,

    /// Second id of a two-node path query
    #[serde(default)]
    pub target: Option<PersonId>,
}

impl ViewSelection {
    pub fn selected(id: PersonId) -> Self {
        Self {
            selected: Some(id),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: ViewFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_target(mut self, target: PersonId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Roots to render for a filter and selection.
///
/// - `Descendants` with a known selection renders that node alone.
/// - Any other known selection renders the single tree containing it.
/// - No selection, or one that does not resolve, renders the full forest.
pub fn select_view(tree: &FamilyTree, filter: ViewFilter, selected: Option<PersonId>) -> Vec<PersonId> {
    if let Some(id) = selected {
        if filter == ViewFilter::Descendants && tree.contains(id) {
            return vec![id];
        }
        if let Some(root) = current_root_id(tree, id) {
            return vec![root];
        }
    }
    tree.roots().to_vec()
}

/// The top of the tree that contains `selected`.
///
/// A secondary record with no parent has no subtree of its own, so the walk
/// restarts from the partner it was folded into. Returns `None` for an
/// unknown id.
pub fn current_root_id(tree: &FamilyTree, selected: PersonId) -> Option<PersonId> {
    if !tree.contains(selected) {
        return None;
    }

    let mut current = selected;
    let mut seen = HashSet::new();
    loop {
        if !seen.insert(current) {
            return Some(current);
        }
        if tree.parent_of(current).is_none() && tree.is_secondary(current) {
            if let Some(anchor) = tree.anchor_of(current) {
                current = anchor;
                continue;
            }
        }
        match tree.parent_of(current) {
            Some(parent) => current = parent,
            None => return Some(current),
        }
    }
}

/// Selection used when the caller clears theirs: the topmost ancestor of the
/// first record in the collection.
pub fn default_selection(records: &[PersonRecord]) -> Option<PersonId> {
    let index = crate::models::RecordIndex::new(records);
    let mut current = records.first()?;
    let mut seen = HashSet::from([current.id]);

    while let Some(parent) = index.parent_of(current.id) {
        if !seen.insert(parent.id) {
            break;
        }
        current = parent;
    }
    Some(current.id)
}

/// Every id shown under the given roots, partners included
pub fn visible_ids(tree: &FamilyTree, roots: &[PersonId]) -> HashSet<PersonId> {
    tree.members(roots).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_family;

    fn two_families() -> Vec<PersonRecord> {
        let mut records = sample_family();
        records.push(PersonRecord::new(PersonId(20), "Neighbour").with_partner(PersonId(21)));
        records.push(PersonRecord::new(PersonId(21), "Neighbour Wife").with_partner(PersonId(20)));
        records.push(PersonRecord::new(PersonId(22), "Neighbour Kid").with_parent(PersonId(21)));
        records
    }

    #[test]
    fn test_no_selection_returns_full_forest() {
        let tree = FamilyTree::build(&two_families());
        assert_eq!(
            select_view(&tree, ViewFilter::All, None),
            vec![PersonId(1), PersonId(20)]
        );
    }

    #[test]
    fn test_selection_returns_containing_root() {
        let tree = FamilyTree::build(&two_families());
        assert_eq!(
            select_view(&tree, ViewFilter::All, Some(PersonId(5))),
            vec![PersonId(1)]
        );
    }

    #[test]
    fn test_secondary_root_redirects_to_partner() {
        let tree = FamilyTree::build(&two_families());
        // Mother (7) married into the family; her tree is Father's
        assert_eq!(current_root_id(&tree, PersonId(7)), Some(PersonId(1)));
        // A child hanging off a secondary partner also resolves to the couple's root
        assert_eq!(current_root_id(&tree, PersonId(22)), Some(PersonId(20)));
    }

    #[test]
    fn test_descendants_filter_returns_selected_node() {
        let tree = FamilyTree::build(&two_families());
        assert_eq!(
            select_view(&tree, ViewFilter::Descendants, Some(PersonId(3))),
            vec![PersonId(3)]
        );
    }

    #[test]
    fn test_unknown_selection_falls_back_to_forest() {
        let tree = FamilyTree::build(&two_families());
        assert_eq!(
            select_view(&tree, ViewFilter::Descendants, Some(PersonId(404))),
            vec![PersonId(1), PersonId(20)]
        );
    }

    #[test]
    fn test_default_selection_walks_to_top() {
        let mut records = sample_family();
        records.rotate_left(4); // "Me" first
        assert_eq!(default_selection(&records), Some(PersonId(1)));
        assert_eq!(default_selection(&[]), None);
    }

    #[test]
    fn test_visible_ids_include_partners() {
        let tree = FamilyTree::build(&two_families());
        let visible = visible_ids(&tree, &[PersonId(20)]);
        assert_eq!(visible.len(), 3);
        assert!(visible.contains(&PersonId(21)));
    }
}
