//! Undo/redo over whole record snapshots

use crate::models::PersonRecord;
use std::collections::VecDeque;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo and redo stacks.
///
/// Callers push the snapshot that is about to be replaced; recording a new
/// change clears the redo stack. When the undo stack is full the oldest
/// snapshot is dropped.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Vec<PersonRecord>>,
    redo: Vec<Vec<PersonRecord>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn record(&mut self, previous: Vec<PersonRecord>) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(previous);
    }

    /// Step back. Returns the snapshot to restore; `current` moves to redo.
    pub fn undo(&mut self, current: Vec<PersonRecord>) -> Option<Vec<PersonRecord>> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Vec<PersonRecord>) -> Option<Vec<PersonRecord>> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        if self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonId;

    fn snapshot(names: &[&str]) -> Vec<PersonRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| PersonRecord::new(PersonId(i as i64 + 1), *name))
            .collect()
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        let v1 = snapshot(&["A"]);
        let v2 = snapshot(&["A", "B"]);

        history.record(v1.clone());
        assert!(history.can_undo());

        let restored = history.undo(v2.clone()).unwrap();
        assert_eq!(restored, v1);
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, v2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut history = History::default();
        history.record(snapshot(&["A"]));
        history.undo(snapshot(&["A", "B"]));
        history.record(snapshot(&["A"]));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(snapshot(&["1"]));
        history.record(snapshot(&["2"]));
        history.record(snapshot(&["3"]));

        assert_eq!(history.undo(Vec::new()).unwrap()[0].name, "3");
        assert_eq!(history.undo(Vec::new()).unwrap()[0].name, "2");
        assert!(history.undo(Vec::new()).is_none());
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = History::default();
        assert!(history.undo(snapshot(&["A"])).is_none());
        assert!(history.redo(snapshot(&["A"])).is_none());
    }
}
