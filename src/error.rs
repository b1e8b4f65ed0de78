/// StreamGrid Error Types
///
/// All fallible operations in the engine return `TableError`. The engine
/// performs no I/O, so the taxonomy is small: positional arguments outside
/// the store bounds, configuration referencing unknown columns, and keyed
/// operations on stores without (or records without) a key field.
///
/// Configuration errors are reported once to the caller and the engine
/// degrades to the nearest well-defined state (no filter, no sort) instead
/// of leaving the view inconsistent.

use thiserror::Error;

/// Errors produced by store, view, and configuration operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A positional argument was outside the current store bounds
    #[error("position {position} out of range [0, {len})")]
    OutOfRange { position: usize, len: usize },

    /// A sort or filter referenced a column key absent from configuration
    #[error("unknown column '{key}'")]
    UnknownColumn { key: String },

    /// A keyed operation received a record lacking the key field
    #[error("record is missing key field '{field}'")]
    MissingKey { field: String },

    /// A keyed operation was called on a store with no key field configured
    #[error("store has no key field configured")]
    KeylessStore,
}

impl TableError {
    /// Construct an `OutOfRange` error for a position checked against `len`
    pub fn out_of_range(position: usize, len: usize) -> Self {
        TableError::OutOfRange { position, len }
    }

    /// Construct an `UnknownColumn` error for the given key
    pub fn unknown_column(key: impl Into<String>) -> Self {
        TableError::UnknownColumn { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TableError::out_of_range(5, 3);
        assert_eq!(err.to_string(), "position 5 out of range [0, 3)");

        let err = TableError::unknown_column("missing");
        assert_eq!(err.to_string(), "unknown column 'missing'");

        let err = TableError::MissingKey {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "record is missing key field 'id'");

        assert_eq!(
            TableError::KeylessStore.to_string(),
            "store has no key field configured"
        );
    }
}
