/// StreamGrid Filter Compilation
///
/// Turns the current search text and per-column categorical filter state
/// into a single predicate over a record, or `None` when no filtering is
/// needed. Callers must treat `None` as "pass every record" so the
/// unfiltered fast path stays free of per-record closure calls.
///
/// # Clause combination
///
/// - Within one column, enabled entries combine with OR: the record's
///   value must equal at least one enabled entry (canonical string form,
///   case-insensitive).
/// - Across columns, and against the free-text clause, clauses combine
///   with AND.
/// - The free-text clause passes if ANY field's canonical string contains
///   the search text case-insensitively, or matches the pattern when
///   regex mode is on. An invalid pattern degrades to substring matching
///   rather than blanking the table.
///
/// Compilation has no side effects and is cheap enough to run per
/// keystroke.

use crate::column::{ColumnDescriptor, FilterEntry};
use crate::record::Record;
use log::warn;
use regex::Regex;

/// Compiled membership test over a record
pub type RecordPredicate = Box<dyn Fn(&Record) -> bool>;

/// Per-column categorical filter state consumed by `compile_filter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Record field the entries are matched against
    pub key: String,
    pub entries: Vec<FilterEntry>,
}

impl FilterSpec {
    pub fn new(key: impl Into<String>, entries: Vec<FilterEntry>) -> Self {
        FilterSpec {
            key: key.into(),
            entries,
        }
    }

    /// True if this spec constrains the view at all
    pub fn is_active(&self) -> bool {
        self.entries.iter().any(|entry| entry.enabled)
    }
}

impl From<&ColumnDescriptor> for FilterSpec {
    fn from(column: &ColumnDescriptor) -> Self {
        FilterSpec {
            key: column.key.clone(),
            entries: column.filters.clone(),
        }
    }
}

/// Compile the current search and filter state into a predicate
///
/// Returns `None` when the search text is empty and no spec has an
/// enabled entry. A spec with zero enabled entries imposes no constraint.
pub fn compile_filter(
    search_text: &str,
    use_regex: bool,
    specs: &[FilterSpec],
) -> Option<RecordPredicate> {
    // Only columns with at least one enabled entry constrain the view
    let active: Vec<(String, Vec<String>)> = specs
        .iter()
        .filter(|spec| spec.is_active())
        .map(|spec| {
            let values = spec
                .entries
                .iter()
                .filter(|entry| entry.enabled)
                .map(|entry| entry.value.to_lowercase())
                .collect();
            (spec.key.clone(), values)
        })
        .collect();

    if search_text.is_empty() && active.is_empty() {
        return None;
    }

    let needle = search_text.to_lowercase();
    let pattern = if use_regex && !search_text.is_empty() {
        match Regex::new(search_text) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(
                    "invalid search pattern '{}': {}; matching as plain text",
                    search_text, err
                );
                None
            }
        }
    } else {
        None
    };

    Some(Box::new(move |record: &Record| {
        let passes_columns = active.iter().all(|(key, allowed)| {
            record
                .get(key)
                .map(|value| {
                    let text = value.to_string().to_lowercase();
                    allowed.iter().any(|option| *option == text)
                })
                .unwrap_or(false)
        });
        if !passes_columns {
            return false;
        }

        if needle.is_empty() {
            return true;
        }
        record.fields().any(|(_, value)| {
            let text = value.to_string();
            match &pattern {
                Some(re) => re.is_match(&text),
                None => text.to_lowercase().contains(&needle),
            }
        })
    }))
}
