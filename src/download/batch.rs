//! Per-tab batch tracking
//!
//! Each tab dispatches in numbered batches. Within a batch an id is dispatched
//! at most once; starting a new batch forgets everything from the previous one.

use super::task::TabId;
use std::collections::HashMap;

/// Dedup state of a single tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchState {
    pub current_batch: i64,
    /// Ids dispatched in the current batch, in dispatch order. A cleared slot
    /// is `None` and matches nothing.
    pub dispatched_ids: Vec<Option<String>>,
}

impl BatchState {
    fn new(batch_number: i64) -> Self {
        Self {
            current_batch: batch_number,
            dispatched_ids: Vec::new(),
        }
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.dispatched_ids
            .iter()
            .any(|slot| slot.as_deref() == Some(logical_id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchTracker {
    tabs: HashMap<TabId, BatchState>,
}

impl BatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `logical_id` for `tab_id` in `batch_number`.
    ///
    /// Returns `false` when the id was already dispatched in this batch.
    pub fn admit(&mut self, tab_id: TabId, batch_number: i64, logical_id: &str) -> bool {
        let state = self
            .tabs
            .entry(tab_id)
            .or_insert_with(|| BatchState::new(batch_number));

        if state.current_batch != batch_number {
            tracing::debug!(
                "{} starts batch {} (was {}), clearing {} ids",
                tab_id,
                batch_number,
                state.current_batch,
                state.dispatched_ids.len()
            );
            *state = BatchState::new(batch_number);
        }

        if state.contains(logical_id) {
            return false;
        }

        state.dispatched_ids.push(Some(logical_id.to_string()));
        true
    }

    /// Clear the slot holding `logical_id` so the id can be admitted again.
    ///
    /// Only the tab's current batch is touched; a task from an older batch has
    /// no slot left to clear. The slot stays in place, emptied. Returns whether
    /// a slot was found.
    pub fn tombstone(&mut self, tab_id: TabId, batch_number: i64, logical_id: &str) -> bool {
        let Some(slot) = self
            .tabs
            .get_mut(&tab_id)
            .filter(|state| state.current_batch == batch_number)
            .and_then(|state| {
                state
                    .dispatched_ids
                    .iter_mut()
                    .find(|slot| slot.as_deref() == Some(logical_id))
            })
        else {
            return false;
        };

        *slot = None;
        true
    }

    pub fn state(&self, tab_id: TabId) -> Option<&BatchState> {
        self.tabs.get(&tab_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: TabId = TabId(1);

    #[test]
    fn test_same_id_twice_in_batch() {
        let mut tracker = BatchTracker::new();
        assert!(tracker.admit(TAB, 1, "f1"));
        assert!(!tracker.admit(TAB, 1, "f1"));
        assert!(tracker.admit(TAB, 1, "f2"));
    }

    #[test]
    fn test_new_batch_clears_membership() {
        let mut tracker = BatchTracker::new();
        assert!(tracker.admit(TAB, 1, "f1"));
        assert!(tracker.admit(TAB, 1, "f2"));

        assert!(tracker.admit(TAB, 2, "f1"));
        let state = tracker.state(TAB).unwrap();
        assert_eq!(state.current_batch, 2);
        assert_eq!(state.dispatched_ids, vec![Some("f1".to_string())]);

        // Going back to an older number is also a new batch
        assert!(tracker.admit(TAB, 1, "f1"));
    }

    #[test]
    fn test_tabs_are_independent() {
        let mut tracker = BatchTracker::new();
        assert!(tracker.admit(TabId(1), 1, "f1"));
        assert!(tracker.admit(TabId(2), 1, "f1"));
        assert!(!tracker.admit(TabId(2), 1, "f1"));
    }

    #[test]
    fn test_tombstone_keeps_slot_position() {
        let mut tracker = BatchTracker::new();
        tracker.admit(TAB, 1, "a");
        tracker.admit(TAB, 1, "b");
        tracker.admit(TAB, 1, "c");

        assert!(tracker.tombstone(TAB, 1, "b"));
        assert_eq!(
            tracker.state(TAB).unwrap().dispatched_ids,
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );

        assert!(tracker.admit(TAB, 1, "b"));
        assert!(!tracker.admit(TAB, 1, "b"));
    }

    #[test]
    fn test_tombstone_unknown_id() {
        let mut tracker = BatchTracker::new();
        assert!(!tracker.tombstone(TAB, 1, "x"));
        tracker.admit(TAB, 1, "a");
        assert!(!tracker.tombstone(TAB, 1, "x"));
        assert!(!tracker.tombstone(TAB, 1, ""));
        assert!(!tracker.tombstone(TabId(9), 1, "a"));
    }

    #[test]
    fn test_tombstone_ignores_other_batches() {
        let mut tracker = BatchTracker::new();
        tracker.admit(TAB, 1, "a");
        tracker.admit(TAB, 2, "a");

        assert!(!tracker.tombstone(TAB, 1, "a"));
        assert!(!tracker.admit(TAB, 2, "a"));
        assert!(tracker.tombstone(TAB, 2, "a"));
    }

    #[test]
    fn test_cleared_slot_never_matches() {
        let mut tracker = BatchTracker::new();
        tracker.admit(TAB, 1, "a");
        tracker.tombstone(TAB, 1, "a");

        assert!(!tracker.state(TAB).unwrap().contains(""));
        assert!(tracker.admit(TAB, 1, ""));
        assert!(!tracker.admit(TAB, 1, ""));
        assert!(tracker.tombstone(TAB, 1, ""));
        assert!(tracker.admit(TAB, 1, ""));
    }
}
