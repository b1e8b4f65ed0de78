/// StreamGrid Table Facade
///
/// A Table owns the record store, the derived view index, the selection
/// model, and the column configuration, and keeps them consistent: every
/// producer mutation drains the store's change log into the view and
/// prunes dead ids from the selection before returning, so callers never
/// observe a half-applied operation.
///
/// The engine is single-writer by design: all operations are synchronous,
/// run to completion in invocation order, and perform no internal locking.
/// Concurrent producers must serialize their calls into the one thread
/// that owns the table.

use crate::column::ColumnDescriptor;
use crate::error::TableError;
use crate::filter::{compile_filter, FilterSpec};
use crate::record::{Record, RecordId};
use crate::selection::{SelectionEvent, SelectionModel};
use crate::sort::{compile_sort, SortDirection};
use crate::store::RecordStore;
use crate::view::{ViewEvent, ViewIndex, ViewRow};
use log::warn;

/// Construction options for a table
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Retain at most this many records, evicting the oldest
    pub limit: Option<usize>,
    /// Record field used as the upsert key
    pub key_field: Option<String>,
}

type SelectionListener = Box<dyn FnMut(&SelectionEvent)>;
type ViewListener = Box<dyn FnMut(&ViewEvent)>;

/// Live table: record store + view + selection + column configuration
///
/// # Examples
///
/// ```
/// use streamgrid::{ColumnDescriptor, Record, Table};
///
/// let mut table = Table::new(vec![
///     ColumnDescriptor::new("title"),
///     ColumnDescriptor::new("done"),
/// ]);
///
/// table.append(Record::new().with("title", "Drink coffee").with("done", false));
/// table.append(Record::new().with("title", "Meet me").with("done", true));
///
/// table.set_search("coffee");
/// let rows = table.window_slice(0, 10);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].record.get("title").unwrap().as_str(), Some("Drink coffee"));
/// ```
pub struct Table {
    store: RecordStore,
    view: ViewIndex,
    selection: SelectionModel,
    columns: Vec<ColumnDescriptor>,
    /// Construction-time configuration, restored by `reset`
    defaults: Vec<ColumnDescriptor>,
    search: String,
    regex_search: bool,
    sort: Option<(String, SortDirection)>,
    on_selection: Option<SelectionListener>,
    on_view: Option<ViewListener>,
}

impl Table {
    /// Create a table with the given column configuration
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Table::with_options(columns, TableOptions::default())
    }

    /// Create a table with a retention limit and/or key field
    pub fn with_options(columns: Vec<ColumnDescriptor>, options: TableOptions) -> Self {
        let mut table = Table {
            store: RecordStore::with_options(options.limit, options.key_field),
            view: ViewIndex::new(),
            selection: SelectionModel::new(),
            defaults: columns.clone(),
            columns,
            search: String::new(),
            regex_search: false,
            sort: None,
            on_selection: None,
            on_view: None,
        };
        // Columns may carry enabled filters from construction
        table.refresh_filter();
        table
    }

    /// Register the selection event listener
    ///
    /// Exactly one event is delivered, synchronously, per selection
    /// operation.
    pub fn set_selection_listener(&mut self, listener: impl FnMut(&SelectionEvent) + 'static) {
        self.on_selection = Some(Box::new(listener));
    }

    /// Register the view change listener
    ///
    /// Events fire only for changes that alter the visible view.
    pub fn set_view_listener(&mut self, listener: impl FnMut(&ViewEvent) + 'static) {
        self.on_view = Some(Box::new(listener));
    }

    // ========================================================================
    // Producer boundary
    // ========================================================================

    /// Append a record; returns its permanent id
    pub fn append(&mut self, record: Record) -> RecordId {
        let id = self.store.append(record);
        self.sync();
        id
    }

    /// Replace the record at a base-store position; its id is unchanged
    pub fn update(&mut self, position: usize, record: Record) -> Result<(), TableError> {
        self.store.update(position, record)?;
        self.sync();
        Ok(())
    }

    /// Remove and return the record at a base-store position
    pub fn remove(&mut self, position: usize) -> Result<Record, TableError> {
        let record = self.store.remove(position)?;
        self.sync();
        Ok(record)
    }

    /// Remove every record; ids are never reused
    pub fn clear(&mut self) {
        self.store.clear();
        self.sync();
    }

    /// Evict up to `count` of the oldest records
    pub fn shift(&mut self, count: usize) -> usize {
        let evicted = self.store.shift(count);
        self.sync();
        evicted
    }

    /// Insert by key (requires a key field); replaces or appends
    pub fn upsert(&mut self, record: Record) -> Result<RecordId, TableError> {
        let id = self.store.upsert(record)?;
        self.sync();
        Ok(id)
    }

    /// Apply pending store changes to the view and selection
    fn sync(&mut self) {
        let changes = self.store.drain_changes();
        for change in &changes {
            if let Some(event) = self.view.apply(&self.store, change) {
                if let Some(listener) = &mut self.on_view {
                    listener(&event);
                }
            }
        }
        // Dead ids leave the selection silently
        self.selection.prune(&self.store);
    }

    // ========================================================================
    // Read boundary
    // ========================================================================

    /// Number of records in the base store
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of rows in the current view
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Record at a base-store position
    pub fn get(&self, position: usize) -> Option<&Record> {
        self.store.get(position)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.store.get_by_id(id)
    }

    /// Keyed lookup (stores built with a key field)
    pub fn get_by_key(&self, key: &str) -> Option<&Record> {
        self.store.get_by_key(key)
    }

    /// The renderer's only read path: a window of the current view
    pub fn window_slice(&self, start: usize, count: usize) -> Vec<ViewRow> {
        self.view.window_slice(&self.store, start, count)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| column.visible)
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn is_regex_search(&self) -> bool {
        self.regex_search
    }

    /// Current sort selection, if any
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort
            .as_ref()
            .map(|(key, direction)| (key.as_str(), *direction))
    }

    // ========================================================================
    // Configuration boundary
    // ========================================================================

    /// Set the free-text search and recompute the view
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.refresh_filter();
    }

    /// Switch the search between substring and regex matching
    pub fn set_regex_search(&mut self, enabled: bool) {
        if self.regex_search != enabled {
            self.regex_search = enabled;
            self.refresh_filter();
        }
    }

    /// Flip a column's visibility; returns the new state
    ///
    /// Visibility is a rendering concern: it does not affect which rows
    /// the view contains, and hidden columns keep filtering.
    pub fn toggle_column_visibility(&mut self, key: &str) -> Result<bool, TableError> {
        let column = self.column_mut(key)?;
        column.visible = !column.visible;
        Ok(column.visible)
    }

    /// Add (or enable) a categorical filter value on a column
    pub fn add_column_filter(&mut self, key: &str, value: &str) -> Result<(), TableError> {
        self.column_mut(key)?.enable_filter(value);
        self.refresh_filter();
        Ok(())
    }

    /// Flip a filter entry's enabled state, adding it when absent
    pub fn toggle_column_filter(&mut self, key: &str, value: &str) -> Result<(), TableError> {
        let column = self.column_mut(key)?;
        if !column.toggle_filter(value) {
            column.enable_filter(value);
        }
        self.refresh_filter();
        Ok(())
    }

    /// Remove a filter entry from a column
    pub fn remove_column_filter(&mut self, key: &str, value: &str) -> Result<(), TableError> {
        self.column_mut(key)?.remove_filter(value);
        self.refresh_filter();
        Ok(())
    }

    /// Sort by a column, or clear the sort with `None`
    ///
    /// An unknown key degrades to insertion order and reports the error
    /// once; the table is never left blank or stale.
    pub fn sort_column(
        &mut self,
        key: &str,
        direction: Option<SortDirection>,
    ) -> Result<(), TableError> {
        if direction.is_some() && !self.columns.iter().any(|column| column.key == key) {
            warn!("unknown sort column '{}'; keeping insertion order", key);
            self.sort = None;
            self.view.set_comparator(&self.store, None);
            self.emit_view(ViewEvent::Reset);
            return Err(TableError::unknown_column(key));
        }

        self.sort = direction.map(|d| (key.to_string(), d));
        self.view
            .set_comparator(&self.store, compile_sort(key, direction));
        self.emit_view(ViewEvent::Reset);
        Ok(())
    }

    /// Disable every filter entry and clear the search
    pub fn reset_filters(&mut self) {
        for column in &mut self.columns {
            for entry in &mut column.filters {
                entry.enabled = false;
            }
        }
        self.search.clear();
        self.regex_search = false;
        self.refresh_filter();
    }

    /// Restore construction defaults: column visibility and filters,
    /// search, sort, and selection
    pub fn reset(&mut self) {
        self.columns = self.defaults.clone();
        self.search.clear();
        self.regex_search = false;
        self.sort = None;
        self.selection.clear();
        self.view.set_comparator(&self.store, None);
        self.refresh_filter();
    }

    /// Recompile the predicate from the current config and rebuild
    fn refresh_filter(&mut self) {
        let specs: Vec<FilterSpec> = self
            .columns
            .iter()
            .filter(|column| !column.filters.is_empty())
            .map(FilterSpec::from)
            .collect();
        let predicate = compile_filter(&self.search, self.regex_search, &specs);
        self.view.set_predicate(&self.store, predicate);
        self.emit_view(ViewEvent::Reset);
    }

    fn column_mut(&mut self, key: &str) -> Result<&mut ColumnDescriptor, TableError> {
        match self.columns.iter_mut().position(|column| column.key == key) {
            Some(index) => Ok(&mut self.columns[index]),
            None => {
                warn!("unknown column '{}'; configuration unchanged", key);
                Err(TableError::unknown_column(key))
            }
        }
    }

    // ========================================================================
    // Selection boundary
    // ========================================================================

    /// Select exactly the row at a view position
    ///
    /// An out-of-range position clears the selection; the transition is
    /// still observable as a `(None, [])` event.
    pub fn select_item(&mut self, view_position: usize) {
        let id = self.view.id_at(view_position);
        self.selection.select_only(id);
        self.emit_selection();
    }

    /// Select the row for `id` if it is currently in the view
    ///
    /// Returns false (and emits nothing) when the id is absent.
    pub fn select_item_by_id(&mut self, id: RecordId) -> bool {
        if self.view.position_of(&self.store, id).is_none() {
            return false;
        }
        self.selection.select_only(Some(id));
        self.emit_selection();
        true
    }

    /// Add the rows at view positions `[min(from,to), max(from,to)]` to
    /// the selection
    ///
    /// The anchor does not move; the emitted event leads with the record
    /// at `to`. Out-of-range positions contribute nothing.
    pub fn add_range_to_selection(&mut self, from: usize, to: usize) {
        let (lo, hi) = (from.min(to), from.max(to));
        let hi = hi.min(self.view.len().saturating_sub(1));
        let ids: Vec<RecordId> = (lo..=hi)
            .filter_map(|position| self.view.id_at(position))
            .collect();
        let current = self.view.id_at(to);
        self.selection.add_range(ids, current);
        self.emit_selection();
    }

    /// Empty the selection, emitting the `(None, [])` transition
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.emit_selection();
    }

    /// Selected records in current view order
    pub fn selected_records(&self) -> Vec<Record> {
        self.selection
            .ordered_ids(&self.view)
            .into_iter()
            .filter_map(|id| self.store.get_by_id(id).cloned())
            .collect()
    }

    /// Selected ids in current view order
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ordered_ids(&self.view)
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Range-selection anchor: the last explicitly selected record
    pub fn anchor(&self) -> Option<RecordId> {
        self.selection.anchor()
    }

    fn emit_selection(&mut self) {
        if self.on_selection.is_none() {
            return;
        }
        let event = self.selection.snapshot(&self.store, &self.view);
        if let Some(listener) = &mut self.on_selection {
            listener(&event);
        }
    }

    fn emit_view(&mut self, event: ViewEvent) {
        if let Some(listener) = &mut self.on_view {
            listener(&event);
        }
    }
}
