/// StreamGrid View Index
///
/// The derived, incrementally maintained sequence of record ids that
/// satisfy the active predicate in the active order. The view holds ids,
/// never positions or references, so base-store churn cannot dangle it.
///
/// # Maintenance policy
///
/// - Append: membership test, then a binary-search insert at the sorted
///   position (or at the end under insertion order). Never a full re-sort
///   for a single append.
/// - Update: membership and position are re-evaluated for the affected id
///   only; other rows never move as a side effect.
/// - Remove/shift/clear: the dead ids are dropped.
/// - Predicate or comparator change: full recompute (filter the base,
///   then stable-sort the survivors).
///
/// # Ordering invariant
///
/// Under a comparator the view is totally ordered by (comparator, id);
/// under insertion order it is ordered by id alone. Ids rise with
/// insertion order, so both forms keep ties in insertion order and make
/// binary search exact.

use crate::filter::RecordPredicate;
use crate::record::{Record, RecordId};
use crate::sort::RecordComparator;
use crate::store::{RecordChange, RecordStore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One renderable row from a view window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub id: RecordId,
    /// Position of the record in the base store, for positional producer
    /// operations; the row's view position is the window offset
    pub base_position: usize,
    pub record: Record,
}

/// A change to the visible view, delivered synchronously in operation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewEvent {
    /// A row appeared at the given view position
    Inserted { position: usize },
    /// The row at the given view position has new contents
    Updated { position: usize },
    /// The row previously at the given view position is gone
    Removed { position: usize },
    /// A row changed position without leaving the view
    Moved { from: usize, to: usize },
    /// The view was recomputed or emptied; re-read the window
    Reset,
}

/// Filtered, sorted index over a `RecordStore`
#[derive(Default)]
pub struct ViewIndex {
    order: Vec<RecordId>,
    predicate: Option<RecordPredicate>,
    comparator: Option<RecordComparator>,
}

impl ViewIndex {
    /// Create an empty view with no predicate and insertion order
    pub fn new() -> Self {
        ViewIndex::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// View-ordered record ids
    pub fn ids(&self) -> &[RecordId] {
        &self.order
    }

    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.order.get(position).copied()
    }

    /// True when a predicate is active
    pub fn is_filtered(&self) -> bool {
        self.predicate.is_some()
    }

    /// True when an explicit comparator is active
    pub fn is_sorted(&self) -> bool {
        self.comparator.is_some()
    }

    /// Install a new predicate (or `None` for unfiltered) and recompute
    pub fn set_predicate(&mut self, store: &RecordStore, predicate: Option<RecordPredicate>) {
        self.predicate = predicate;
        self.rebuild(store);
    }

    /// Install a new comparator (or `None` for insertion order) and recompute
    pub fn set_comparator(&mut self, store: &RecordStore, comparator: Option<RecordComparator>) {
        self.comparator = comparator;
        self.rebuild(store);
    }

    /// Full recompute: filter the base store, then stable-sort survivors
    pub fn rebuild(&mut self, store: &RecordStore) {
        let mut order: Vec<RecordId> = store
            .iter()
            .filter(|entry| self.matches(&entry.record))
            .map(|entry| entry.id)
            .collect();

        if let Some(comparator) = &self.comparator {
            // Stable sort over an id-ascending base keeps ties in
            // insertion order in both directions
            order.sort_by(|&a, &b| match (store.get_by_id(a), store.get_by_id(b)) {
                (Some(ra), Some(rb)) => comparator.compare(ra, rb),
                _ => Ordering::Equal,
            });
        }
        self.order = order;
    }

    /// Apply one store change incrementally
    ///
    /// Returns the resulting view change, or `None` when the visible view
    /// is unaffected (e.g. an append that fails the predicate).
    pub fn apply(&mut self, store: &RecordStore, change: &RecordChange) -> Option<ViewEvent> {
        match change {
            RecordChange::Appended { id } => {
                let record = store.get_by_id(*id)?;
                if !self.matches(record) {
                    return None;
                }
                let position = self.insertion_position(store, record, *id);
                self.order.insert(position, *id);
                Some(ViewEvent::Inserted { position })
            }
            RecordChange::Updated { id, previous } => self.apply_update(store, *id, previous),
            RecordChange::Removed { id, record } => {
                let position = self.find_position(store, record, *id)?;
                self.order.remove(position);
                Some(ViewEvent::Removed { position })
            }
            RecordChange::Shifted { min_live } => {
                let before = self.order.len();
                self.order.retain(|&id| id >= *min_live);
                (self.order.len() != before).then_some(ViewEvent::Reset)
            }
            RecordChange::Cleared => {
                if self.order.is_empty() {
                    return None;
                }
                self.order.clear();
                Some(ViewEvent::Reset)
            }
        }
    }

    /// Read a window of the view for rendering
    ///
    /// Positions past the end are simply absent from the result; the call
    /// never fails.
    pub fn window_slice(&self, store: &RecordStore, start: usize, count: usize) -> Vec<ViewRow> {
        self.order
            .iter()
            .skip(start)
            .take(count)
            .filter_map(|&id| {
                let record = store.get_by_id(id)?;
                let base_position = store.position_of(id)?;
                Some(ViewRow {
                    id,
                    base_position,
                    record: record.clone(),
                })
            })
            .collect()
    }

    /// Current view position of a record id, if it is in the view
    pub fn position_of(&self, store: &RecordStore, id: RecordId) -> Option<usize> {
        let record = store.get_by_id(id)?;
        self.find_position(store, record, id)
    }

    fn matches(&self, record: &Record) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(record),
            None => true,
        }
    }

    fn apply_update(
        &mut self,
        store: &RecordStore,
        id: RecordId,
        previous: &Record,
    ) -> Option<ViewEvent> {
        let record = store.get_by_id(id)?;
        let was_at = self.find_position(store, previous, id);
        let belongs = self.matches(record);

        match (was_at, belongs) {
            (Some(position), true) => {
                let key_unchanged = match &self.comparator {
                    Some(comparator) => comparator.compare(previous, record) == Ordering::Equal,
                    None => true,
                };
                if key_unchanged {
                    return Some(ViewEvent::Updated { position });
                }
                self.order.remove(position);
                let target = self.insertion_position(store, record, id);
                self.order.insert(target, id);
                if target == position {
                    Some(ViewEvent::Updated { position })
                } else {
                    Some(ViewEvent::Moved {
                        from: position,
                        to: target,
                    })
                }
            }
            (Some(position), false) => {
                self.order.remove(position);
                Some(ViewEvent::Removed { position })
            }
            (None, true) => {
                let position = self.insertion_position(store, record, id);
                self.order.insert(position, id);
                Some(ViewEvent::Inserted { position })
            }
            (None, false) => None,
        }
    }

    /// Locate `id` in the view, probing with the given record contents
    ///
    /// A batched earlier change can leave the stored order inconsistent
    /// with the probe contents; the linear fallback keeps the lookup exact
    /// in that case.
    fn find_position(&self, store: &RecordStore, record: &Record, id: RecordId) -> Option<usize> {
        match self.search(store, record, id) {
            Ok(position) => Some(position),
            Err(_) => self.order.iter().position(|&existing| existing == id),
        }
    }

    fn insertion_position(&self, store: &RecordStore, record: &Record, id: RecordId) -> usize {
        match self.search(store, record, id) {
            Ok(position) => position,
            Err(position) => position,
        }
    }

    /// Binary search for (record, id) under the current order
    fn search(&self, store: &RecordStore, record: &Record, id: RecordId) -> Result<usize, usize> {
        match &self.comparator {
            Some(comparator) => self.order.binary_search_by(|&existing| {
                if existing == id {
                    return Ordering::Equal;
                }
                let existing_record = match store.get_by_id(existing) {
                    Some(r) => r,
                    // Only the probe id may be absent from the store
                    None => return Ordering::Less,
                };
                match comparator.compare(existing_record, record) {
                    Ordering::Equal => existing.cmp(&id),
                    other => other,
                }
            }),
            None => self.order.binary_search(&id),
        }
    }
}
