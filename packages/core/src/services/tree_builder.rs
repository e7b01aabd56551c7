//! Tree Builder
//!
//! Converts a flat record snapshot into a rooted forest in which partner couples
//! render as one unit.
//!
//! # Architecture
//!
//! - **Arena**: one `FamilyNode` per distinct id, stored in input order and
//!   addressed through an id → position map. `children` and `partner` hold ids,
//!   so the structure never contains ownership cycles and serializes as-is.
//! - **Secondary resolution**: in every couple the member married into the
//!   bloodline (no parent while the partner has one) yields to the partner;
//!   otherwise the larger id yields. A secondary node's children are folded into
//!   its anchor so the couple shows them together.
//! - **Graceful degradation**: parent/partner ids that do not resolve are
//!   treated as absent; such nodes become roots or stay unpartnered.
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::models::{PersonId, PersonRecord};
//! use familytree_core::services::FamilyTree;
//!
//! let records = vec![
//!     PersonRecord::new(PersonId(1), "Grandfather").with_partner(PersonId(2)),
//!     PersonRecord::new(PersonId(2), "Grandmother").with_partner(PersonId(1)),
//!     PersonRecord::new(PersonId(3), "Father").with_parent(PersonId(1)),
//! ];
//!
//! let tree = FamilyTree::build(&records);
//! assert_eq!(tree.roots(), &[PersonId(1)]);
//! assert!(tree.is_secondary(PersonId(2)));
//! assert_eq!(tree.children_of(PersonId(1)), &[PersonId(3)]);
//! ```

use crate::models::{PersonId, PersonRecord};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A record augmented with its derived links.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyNode {
    pub record: PersonRecord,

    /// Rendering order: own children in input order, then the children of
    /// every secondary partner folded into this node
    pub children: Vec<PersonId>,

    /// Linked partner; set from the record's own `partner_id` when it resolves,
    /// otherwise from a partner that points at this node
    pub partner: Option<PersonId>,

    /// Secondary records folded into this node (normally just the partner)
    pub folded: Vec<PersonId>,
}

impl FamilyNode {
    fn new(record: PersonRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
            partner: None,
            folded: Vec::new(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.record.id
    }
}

/// Nested, serializable rendering of a subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView {
    #[serde(flatten)]
    pub person: PersonRecord,

    pub is_secondary: bool,

    pub partner: Option<PersonRecord>,

    pub children: Vec<TreeView>,
}

/// The forest derived from one record snapshot.
///
/// Roots, secondary ids and the node map are produced together by
/// [`FamilyTree::build`]; downstream components read all three.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    nodes: Vec<FamilyNode>,
    positions: HashMap<PersonId, usize>,
    roots: Vec<PersonId>,
    secondary: BTreeSet<PersonId>,
    anchors: HashMap<PersonId, PersonId>,
}

impl FamilyTree {
    /// Build the forest from a flat snapshot
    pub fn build(records: &[PersonRecord]) -> Self {
        let mut tree = FamilyTree::default();

        // 1. Arena, one node per distinct id
        for record in records {
            if tree.positions.contains_key(&record.id) {
                tracing::debug!("Skipping duplicate record id {}", record.id);
                continue;
            }
            tree.positions.insert(record.id, tree.nodes.len());
            tree.nodes.push(FamilyNode::new(record.clone()));
        }

        let parent_pos: Vec<Option<usize>> = tree
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| tree.resolve(node.record.parent_id, pos))
            .collect();
        let partner_pos: Vec<Option<usize>> = tree
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| tree.resolve(node.record.partner_id, pos))
            .collect();

        let dangling = tree
            .nodes
            .iter()
            .enumerate()
            .filter(|(pos, node)| {
                (node.record.parent_id.is_some() && parent_pos[*pos].is_none())
                    || (node.record.partner_id.is_some() && partner_pos[*pos].is_none())
            })
            .count();
        if dangling > 0 {
            tracing::debug!("{} record(s) carry unresolvable references", dangling);
        }

        // 2. Secondary resolution, strongest anchors first so a record that is
        //    itself folded away never anchors someone else
        let ranks: Vec<(bool, Reverse<PersonId>)> = tree
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (parent_pos[pos].is_some(), Reverse(node.record.id)))
            .collect();
        let mut order: Vec<usize> = (0..tree.nodes.len()).collect();
        order.sort_by_key(|&pos| Reverse(ranks[pos]));

        for pos in order {
            let Some(partner) = partner_pos[pos] else {
                continue;
            };
            let id = tree.nodes[pos].record.id;
            let partner_id = tree.nodes[partner].record.id;
            if ranks[partner] > ranks[pos] && !tree.secondary.contains(&partner_id) {
                tree.secondary.insert(id);
                tree.anchors.insert(id, partner_id);
            }
        }

        // 3. Children, in input order
        for pos in 0..tree.nodes.len() {
            if let Some(parent) = parent_pos[pos] {
                let id = tree.nodes[pos].record.id;
                tree.nodes[parent].children.push(id);
            }
        }

        // 4. Partners: own link first, back-links fill empty slots
        for pos in 0..tree.nodes.len() {
            let partner_id = partner_pos[pos].map(|p| tree.nodes[p].record.id);
            tree.nodes[pos].partner = partner_id;
        }
        for pos in 0..tree.nodes.len() {
            if let Some(partner) = partner_pos[pos] {
                let id = tree.nodes[pos].record.id;
                let slot = &mut tree.nodes[partner].partner;
                if slot.is_none() {
                    *slot = Some(id);
                }
            }
        }

        // 5. Fold secondary children into anchors, collect roots
        for pos in 0..tree.nodes.len() {
            let id = tree.nodes[pos].record.id;
            if let Some(anchor) = tree.anchors.get(&id).copied() {
                let folded_children = tree.nodes[pos].children.clone();
                if let Some(&anchor_pos) = tree.positions.get(&anchor) {
                    let anchor_node = &mut tree.nodes[anchor_pos];
                    anchor_node.children.extend(folded_children);
                    anchor_node.folded.push(id);
                }
            }
        }
        for pos in 0..tree.nodes.len() {
            let id = tree.nodes[pos].record.id;
            if parent_pos[pos].is_none() && !tree.secondary.contains(&id) {
                tree.roots.push(id);
            }
        }

        tracing::debug!(
            "Built family tree: {} node(s), {} root(s), {} secondary",
            tree.nodes.len(),
            tree.roots.len(),
            tree.secondary.len()
        );

        tree
    }

    /// Position of a referenced id, ignoring self references and dangling ids
    fn resolve(&self, reference: Option<PersonId>, own_pos: usize) -> Option<usize> {
        let pos = *self.positions.get(&reference?)?;
        (pos != own_pos).then_some(pos)
    }

    pub fn node(&self, id: PersonId) -> Option<&FamilyNode> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Forest roots in input order
    pub fn roots(&self) -> &[PersonId] {
        &self.roots
    }

    pub fn secondary_ids(&self) -> &BTreeSet<PersonId> {
        &self.secondary
    }

    pub fn is_secondary(&self, id: PersonId) -> bool {
        self.secondary.contains(&id)
    }

    /// The partner a secondary record was folded into
    pub fn anchor_of(&self, id: PersonId) -> Option<PersonId> {
        self.anchors.get(&id).copied()
    }

    pub fn children_of(&self, id: PersonId) -> &[PersonId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn partner_of(&self, id: PersonId) -> Option<PersonId> {
        self.node(id).and_then(|n| n.partner)
    }

    /// The resolvable parent of a node, if any
    pub fn parent_of(&self, id: PersonId) -> Option<PersonId> {
        let parent = self.node(id)?.record.parent_id?;
        (parent != id && self.contains(parent)).then_some(parent)
    }

    /// All nodes in input order
    pub fn nodes(&self) -> impl Iterator<Item = &FamilyNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every id reachable from `roots` through children, partners and folded
    /// secondaries, each listed once in depth-first order.
    pub fn members(&self, roots: &[PersonId]) -> Vec<PersonId> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack: Vec<PersonId> = roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            ordered.push(id);

            for child in node.children.iter().rev() {
                stack.push(*child);
            }
            for folded in node.folded.iter().rev() {
                stack.push(*folded);
            }
            if let Some(partner) = node.partner {
                stack.push(partner);
            }
        }

        ordered
    }

    /// Nested rendering of the subtree below `id`.
    ///
    /// A child that already appears on the current path is skipped, so couples
    /// partnered across generations cannot nest forever.
    pub fn view(&self, id: PersonId) -> Option<TreeView> {
        let mut path = HashSet::new();
        self.view_recursive(id, &mut path)
    }

    /// Nested renderings for a list of roots
    pub fn views(&self, roots: &[PersonId]) -> Vec<TreeView> {
        roots.iter().filter_map(|id| self.view(*id)).collect()
    }

    fn view_recursive(&self, id: PersonId, path: &mut HashSet<PersonId>) -> Option<TreeView> {
        let node = self.node(id)?;
        path.insert(id);

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if path.contains(child) {
                continue;
            }
            if let Some(view) = self.view_recursive(*child, path) {
                children.push(view);
            }
        }

        path.remove(&id);

        Some(TreeView {
            person: node.record.clone(),
            is_secondary: self.is_secondary(id),
            partner: node
                .partner
                .and_then(|p| self.node(p))
                .map(|p| p.record.clone()),
            children,
        })
    }
}

#[cfg(test)]
#[path = "tree_builder_test.rs"]
mod tree_builder_test;
