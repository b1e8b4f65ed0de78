/// StreamGrid Column Configuration
///
/// Column descriptors are the table's configuration surface: which field a
/// column reads, whether it is visible, and the categorical filter entries
/// attached to it. The engine reads descriptors when compiling the filter
/// predicate; it mutates them only through the explicit toggle operations
/// on the table facade.
///
/// Descriptors serialize with serde so a host can persist and restore a
/// table layout.

use serde::{Deserialize, Serialize};

/// One categorical filter option attached to a column
///
/// `value` is compared against the record's canonical string form for the
/// column's key; `label` is what a host would display for the option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub value: String,
    pub label: String,
    pub enabled: bool,
}

impl FilterEntry {
    /// Create a disabled entry whose label mirrors its value
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        FilterEntry {
            label: value.clone(),
            value,
            enabled: false,
        }
    }

    /// Create an entry that starts enabled
    pub fn enabled(value: impl Into<String>) -> Self {
        let mut entry = FilterEntry::new(value);
        entry.enabled = true;
        entry
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Configuration for one table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Record field this column reads
    pub key: String,
    /// Display title; defaults to the key
    pub title: String,
    pub visible: bool,
    /// Categorical filter options for this column
    pub filters: Vec<FilterEntry>,
}

impl ColumnDescriptor {
    /// Create a visible column with no filters
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        ColumnDescriptor {
            title: key.clone(),
            key,
            visible: true,
            filters: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Start the column hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterEntry>) -> Self {
        self.filters = filters;
        self
    }

    /// True if at least one filter entry is enabled, i.e. the column
    /// imposes a constraint on the view
    pub fn has_enabled_filter(&self) -> bool {
        self.filters.iter().any(|entry| entry.enabled)
    }

    /// Add a filter entry for `value`, or enable it if already present
    pub fn enable_filter(&mut self, value: &str) {
        match self.filters.iter_mut().find(|entry| entry.value == value) {
            Some(entry) => entry.enabled = true,
            None => self.filters.push(FilterEntry::enabled(value)),
        }
    }

    /// Flip the enabled state of the entry for `value`
    ///
    /// Returns false if no entry carries that value.
    pub fn toggle_filter(&mut self, value: &str) -> bool {
        match self.filters.iter_mut().find(|entry| entry.value == value) {
            Some(entry) => {
                entry.enabled = !entry.enabled;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `value`; returns false if absent
    pub fn remove_filter(&mut self, value: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|entry| entry.value != value);
        self.filters.len() != before
    }

    /// Drop every filter entry
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }
}
