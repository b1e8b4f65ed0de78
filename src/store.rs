/// StreamGrid Record Store
///
/// The base collection every view derives from: records in insertion
/// order, each carrying a stable `RecordId`. Ids are assigned from a
/// strictly increasing counter that never resets, so an id identifies
/// "the same logical row" across updates, removals, and even `clear()`.
/// An id-to-position map absorbs positional churn; nothing downstream
/// holds raw positions across a mutation.
///
/// # Change propagation
///
/// Every mutation pushes a `RecordChange` into the store's change log.
/// The owning table drains the log after each operation and feeds the
/// changes to its view, in order, so derived state never observes a
/// partially applied mutation.
///
/// # Retention and keys
///
/// A store built with a retention limit evicts the oldest tenth of its
/// capacity when an append would overflow, mirroring how long-running
/// debug streams cap their buffers. A store built with a key field
/// additionally maintains a key-to-id map for `upsert`/`get_by_key`; the
/// map always points at the most recently stored record for a key.

use crate::error::TableError;
use crate::record::{Record, RecordId};
use std::collections::HashMap;

/// A stored record plus its stable identity
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: RecordId,
    pub record: Record,
}

/// A single change to the record store
#[derive(Debug, Clone, PartialEq)]
pub enum RecordChange {
    /// A record was appended; it is the store's last entry
    Appended { id: RecordId },

    /// The record for `id` was replaced in place
    /// Carries the previous contents so views can locate the old position
    Updated { id: RecordId, previous: Record },

    /// The record for `id` was removed
    /// Carries the removed contents for the same reason
    Removed { id: RecordId, record: Record },

    /// Retention eviction: every record with id below `min_live` is gone
    Shifted { min_live: RecordId },

    /// All records were removed
    Cleared,
}

/// Pending changes awaiting view application
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Vec<RecordChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        ChangeLog {
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: RecordChange) {
        self.changes.push(change);
    }

    /// All changes since the last drain
    pub fn changes(&self) -> &[RecordChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Take ownership of the pending changes, clearing the buffer
    pub fn drain(&mut self) -> Vec<RecordChange> {
        std::mem::take(&mut self.changes)
    }
}

/// Ordered, mutable record collection with stable identities
#[derive(Debug, Default)]
pub struct RecordStore {
    entries: Vec<Entry>,
    /// Current base position of each live id
    positions: HashMap<RecordId, usize>,
    next_id: RecordId,
    limit: Option<usize>,
    key_field: Option<String>,
    keys: HashMap<String, RecordId>,
    changes: ChangeLog,
}

impl RecordStore {
    /// Create an unbounded, unkeyed store
    pub fn new() -> Self {
        RecordStore::default()
    }

    /// Create a store that retains at most `limit` records
    ///
    /// When an append would exceed the limit, the oldest tenth of the
    /// capacity is evicted first.
    pub fn with_limit(limit: usize) -> Self {
        RecordStore {
            limit: Some(limit.max(1)),
            ..RecordStore::default()
        }
    }

    /// Create a store keyed by the given record field
    pub fn with_key_field(field: impl Into<String>) -> Self {
        RecordStore {
            key_field: Some(field.into()),
            ..RecordStore::default()
        }
    }

    /// Create a store with both options
    pub fn with_options(limit: Option<usize>, key_field: Option<String>) -> Self {
        RecordStore {
            limit: limit.map(|l| l.max(1)),
            key_field,
            ..RecordStore::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// Append a record at the end, assigning a fresh id
    ///
    /// Evicts the oldest records first when a retention limit would be
    /// exceeded.
    pub fn append(&mut self, record: Record) -> RecordId {
        if let Some(limit) = self.limit {
            if self.entries.len() >= limit {
                self.shift(limit.div_ceil(10));
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        if let Some(key) = self.key_of(&record) {
            self.keys.insert(key, id);
        }
        self.positions.insert(id, self.entries.len());
        self.entries.push(Entry { id, record });
        self.changes.push(RecordChange::Appended { id });
        id
    }

    /// Replace the record at `position`; its id is unchanged
    pub fn update(&mut self, position: usize, record: Record) -> Result<(), TableError> {
        let len = self.entries.len();
        if position >= len {
            return Err(TableError::out_of_range(position, len));
        }

        let new_key = self.key_of(&record);
        let entry = &mut self.entries[position];
        let id = entry.id;
        let previous = std::mem::replace(&mut entry.record, record);

        if let Some(field) = &self.key_field {
            if let Some(old_key) = previous.get(field).map(|v| v.to_string()) {
                if self.keys.get(&old_key) == Some(&id) {
                    self.keys.remove(&old_key);
                }
            }
        }
        if let Some(key) = new_key {
            self.keys.insert(key, id);
        }

        self.changes.push(RecordChange::Updated { id, previous });
        Ok(())
    }

    /// Remove and return the record at `position`
    pub fn remove(&mut self, position: usize) -> Result<Record, TableError> {
        let len = self.entries.len();
        if position >= len {
            return Err(TableError::out_of_range(position, len));
        }

        let entry = self.entries.remove(position);
        self.positions.remove(&entry.id);
        for (pos, later) in self.entries.iter().enumerate().skip(position) {
            self.positions.insert(later.id, pos);
        }
        if let Some(key) = self.key_of(&entry.record) {
            if self.keys.get(&key) == Some(&entry.id) {
                self.keys.remove(&key);
            }
        }

        self.changes.push(RecordChange::Removed {
            id: entry.id,
            record: entry.record.clone(),
        });
        Ok(entry.record)
    }

    /// Remove every record; id issuance does not reset
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.keys.clear();
        self.changes.push(RecordChange::Cleared);
    }

    /// Evict up to `count` records from the front (oldest first)
    ///
    /// Returns the number actually evicted.
    pub fn shift(&mut self, count: usize) -> usize {
        let count = count.min(self.entries.len());
        if count == 0 {
            return 0;
        }

        let evicted: Vec<Entry> = self.entries.drain(..count).collect();
        for entry in &evicted {
            self.positions.remove(&entry.id);
            if let Some(key) = self.key_of(&entry.record) {
                if self.keys.get(&key) == Some(&entry.id) {
                    self.keys.remove(&key);
                }
            }
        }
        for (position, entry) in self.entries.iter().enumerate() {
            self.positions.insert(entry.id, position);
        }

        let min_live = self.entries.first().map(|e| e.id).unwrap_or(self.next_id);
        self.changes.push(RecordChange::Shifted { min_live });
        count
    }

    /// Insert by key: replaces the record currently holding the same key,
    /// or appends when the key is new
    pub fn upsert(&mut self, record: Record) -> Result<RecordId, TableError> {
        let field = self.key_field.clone().ok_or(TableError::KeylessStore)?;
        let key = record
            .get(&field)
            .map(|v| v.to_string())
            .ok_or(TableError::MissingKey { field })?;

        match self
            .keys
            .get(&key)
            .copied()
            .and_then(|id| self.position_of(id).map(|pos| (id, pos)))
        {
            Some((id, position)) => {
                self.update(position, record)?;
                Ok(id)
            }
            None => Ok(self.append(record)),
        }
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.entries.get(position).map(|e| &e.record)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.position_of(id).map(|pos| &self.entries[pos].record)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&Record> {
        self.keys.get(key).and_then(|&id| self.get_by_id(id))
    }

    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.entries.get(position).map(|e| e.id)
    }

    /// Current base position of a live id
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn contains_id(&self, id: RecordId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn pending_changes(&self) -> &[RecordChange] {
        self.changes.changes()
    }

    /// Drain the change log for view application
    pub fn drain_changes(&mut self) -> Vec<RecordChange> {
        self.changes.drain()
    }

    fn key_of(&self, record: &Record) -> Option<String> {
        self.key_field
            .as_ref()
            .and_then(|field| record.get(field))
            .map(|v| v.to_string())
    }
}
