/// StreamGrid Selection Model
///
/// Selection is a set of record ids plus an anchor, never a copy of
/// record contents and never a view position. Ids survive reordering and
/// in-place updates, so a selected row stays "the same logical row" while
/// the data underneath it changes; events rebuild their record payloads
/// from the store at emission time.
///
/// The model itself is a passive state machine. The owning table resolves
/// view positions to ids, calls the mutators, and emits the resulting
/// `SelectionEvent` to its listener. Ids whose records leave the store are
/// pruned silently; only explicit selection operations produce events.

use crate::record::{Record, RecordId};
use crate::store::RecordStore;
use crate::view::ViewIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Payload emitted after every selection operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    /// The most recently affected record, if any
    pub current: Option<Record>,
    /// The full selection, ordered by current view position
    pub selected: Vec<Record>,
}

/// Set of selected record ids with an anchor for range operations
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    items: HashSet<RecordId>,
    /// Range-selection origin: the last explicitly selected record
    anchor: Option<RecordId>,
    /// Most recently affected record, reported first in events
    current: Option<RecordId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        SelectionModel::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.items.contains(&id)
    }

    pub fn anchor(&self) -> Option<RecordId> {
        self.anchor
    }

    /// Replace the selection with at most one id; `None` clears
    ///
    /// The anchor follows the explicitly selected record.
    pub fn select_only(&mut self, id: Option<RecordId>) {
        self.items.clear();
        if let Some(id) = id {
            self.items.insert(id);
        }
        self.anchor = id;
        self.current = id;
    }

    /// Add ids to the existing selection
    ///
    /// The anchor does not move; `current` becomes the most recently
    /// affected record for the next emitted event.
    pub fn add_range(
        &mut self,
        ids: impl IntoIterator<Item = RecordId>,
        current: Option<RecordId>,
    ) {
        for id in ids {
            self.items.insert(id);
        }
        self.current = current;
    }

    /// Empty the selection and forget the anchor
    pub fn clear(&mut self) {
        self.items.clear();
        self.anchor = None;
        self.current = None;
    }

    /// Drop ids whose records no longer exist in the store
    ///
    /// Returns true if anything was dropped. This runs on every store
    /// mutation and never emits an event by itself.
    pub fn prune(&mut self, store: &RecordStore) -> bool {
        let before = self.items.len();
        self.items.retain(|&id| store.contains_id(id));
        if self.anchor.is_some_and(|id| !store.contains_id(id)) {
            self.anchor = None;
        }
        if self.current.is_some_and(|id| !store.contains_id(id)) {
            self.current = None;
        }
        self.items.len() != before
    }

    /// Selected ids ordered by their current view position
    pub fn ordered_ids(&self, view: &ViewIndex) -> Vec<RecordId> {
        view.ids()
            .iter()
            .copied()
            .filter(|id| self.items.contains(id))
            .collect()
    }

    /// Build the event payload for the current state
    pub fn snapshot(&self, store: &RecordStore, view: &ViewIndex) -> SelectionEvent {
        let selected = self
            .ordered_ids(view)
            .into_iter()
            .filter_map(|id| store.get_by_id(id).cloned())
            .collect();
        let current = self.current.and_then(|id| store.get_by_id(id)).cloned();
        SelectionEvent { current, selected }
    }
}
