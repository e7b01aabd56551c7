//! One read-side cycle over a record snapshot
//!
//! Runs the tree builder once and feeds the result to the view selector,
//! aggregator, search engine and path finder. The report is a pure,
//! idempotent function of the records and the request.

use crate::models::{PersonId, PersonRecord};
use crate::services::aggregator::{upcoming_dates, DescendantCounts, UpcomingDate, DEFAULT_UPCOMING_LIMIT};
use crate::services::path_finder::highlight_path;
use crate::services::search::search;
use crate::services::timeline::{self, SortOrder, TimelineEntry};
use crate::services::tree_builder::{FamilyTree, TreeView};
use crate::services::view_selector::{current_root_id, select_view, visible_ids, ViewSelection};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Caller state a derivation depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationRequest {
    pub selection: ViewSelection,
    pub query: Option<String>,
    pub today: NaiveDate,
    pub upcoming_limit: usize,
    /// Also produce the chronological listing of the visible records
    pub timeline: Option<SortOrder>,
}

impl DerivationRequest {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selection: ViewSelection::default(),
            query: None,
            today,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            timeline: None,
        }
    }

    pub fn with_selection(mut self, selection: ViewSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }

    pub fn with_timeline(mut self, order: SortOrder) -> Self {
        self.timeline = Some(order);
        self
    }
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationReport {
    /// Roots selected for the current view
    pub roots: Vec<PersonId>,
    /// Nested rendering of `roots`
    pub forest: Vec<TreeView>,
    pub current_root_id: Option<PersonId>,
    pub secondary_ids: BTreeSet<PersonId>,
    pub descendant_counts: DescendantCounts,
    pub upcoming_dates: Vec<UpcomingDate>,
    /// Search matches
    pub highlighted_ids: BTreeSet<PersonId>,
    /// Lineage connecting the selection (and target, if any)
    pub path_ids: BTreeSet<PersonId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEntry>>,
}

pub fn derive(records: &[PersonRecord], request: &DerivationRequest) -> DerivationReport {
    let tree = FamilyTree::build(records);
    let selection = request.selection;

    let roots = select_view(&tree, selection.filter, selection.selected);
    let forest = tree.views(&roots);

    let path_ids = selection
        .selected
        .map(|id| highlight_path(records, id, selection.target))
        .unwrap_or_default();

    let highlighted_ids = request
        .query
        .as_deref()
        .map(|query| search(records, query))
        .unwrap_or_default();

    let timeline = request.timeline.map(|order| {
        let visible = visible_ids(&tree, &roots);
        timeline::timeline(records, &visible, tree.secondary_ids(), order, request.today)
    });

    DerivationReport {
        current_root_id: selection.selected.and_then(|id| current_root_id(&tree, id)),
        secondary_ids: tree.secondary_ids().clone(),
        descendant_counts: DescendantCounts::compute(records),
        upcoming_dates: upcoming_dates(records, request.today, request.upcoming_limit),
        roots,
        forest,
        highlighted_ids,
        path_ids,
        timeline,
    }
}
