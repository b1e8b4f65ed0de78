/// StreamGrid Sort Compilation
///
/// Turns a (column key, direction) pair into a comparator over records, or
/// `None` when insertion order should be kept. The comparator is type
/// aware: numbers compare numerically (integers and floats together),
/// booleans compare false < true, strings compare with a locale-naive
/// lexicographic ordering.
///
/// # Ordering rules
///
/// - Missing fields and explicit nulls sort before all present values in
///   both directions; the direction flips only the comparison of two
///   present values.
/// - Cross-type comparisons order by a fixed type rank (booleans, then
///   numbers, then strings) so the ordering stays total and transitive.
/// - The comparator reports `Equal` for ties; callers break ties by
///   record id, which preserves insertion order under a stable sort.

use crate::record::{Record, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Compiled ordering over records for a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordComparator {
    key: String,
    direction: SortDirection,
}

/// Compile a sort selection into a comparator
///
/// Returns `None` for an unset key or direction, meaning "use insertion
/// order".
pub fn compile_sort(key: &str, direction: Option<SortDirection>) -> Option<RecordComparator> {
    if key.is_empty() {
        return None;
    }
    direction.map(|direction| RecordComparator {
        key: key.to_string(),
        direction,
    })
}

impl RecordComparator {
    /// Column key this comparator reads
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two records by their value at the sort key
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let val_a = a.get(&self.key).filter(|v| !v.is_null());
        let val_b = b.get(&self.key).filter(|v| !v.is_null());

        let base = match (val_a, val_b) {
            (None, None) => return Ordering::Equal,
            // Absent values stay first regardless of direction
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => compare_present(a, b),
        };

        match self.direction {
            SortDirection::Ascending => base,
            SortDirection::Descending => base.reverse(),
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Str(_) => 3,
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        // Mixed types: rank keeps the order total and transitive
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: impl Into<Value>) -> Record {
        Record::new().with("score", value)
    }

    #[test]
    fn test_unset_key_or_direction_compiles_to_none() {
        assert!(compile_sort("", Some(SortDirection::Ascending)).is_none());
        assert!(compile_sort("score", None).is_none());
        assert!(compile_sort("score", Some(SortDirection::Ascending)).is_some());
    }

    #[test]
    fn test_numeric_ordering() {
        let cmp = compile_sort("score", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(cmp.compare(&rec(2), &rec(10)), Ordering::Less);
        assert_eq!(cmp.compare(&rec(10), &rec(2)), Ordering::Greater);
        assert_eq!(cmp.compare(&rec(5), &rec(5)), Ordering::Equal);

        // Integers and floats compare numerically, not by type
        assert_eq!(cmp.compare(&rec(3), &rec(3.5)), Ordering::Less);
        assert_eq!(cmp.compare(&rec(3.0), &rec(3)), Ordering::Equal);
    }

    #[test]
    fn test_boolean_ordering() {
        let cmp = compile_sort("score", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(cmp.compare(&rec(false), &rec(true)), Ordering::Less);
        assert_eq!(cmp.compare(&rec(true), &rec(false)), Ordering::Greater);
        assert_eq!(cmp.compare(&rec(true), &rec(true)), Ordering::Equal);
    }

    #[test]
    fn test_string_ordering_is_lexicographic() {
        let cmp = compile_sort("score", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(cmp.compare(&rec("a"), &rec("b")), Ordering::Less);
        assert_eq!(cmp.compare(&rec("x"), &rec("b")), Ordering::Greater);
        // Locale-naive: uppercase sorts before lowercase by code point
        assert_eq!(cmp.compare(&rec("B"), &rec("a")), Ordering::Less);
    }

    #[test]
    fn test_missing_sorts_first_in_both_directions() {
        let missing = Record::new().with("other", 1);
        let null = Record::new().with("score", Value::Null);
        let present = rec(1);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let cmp = compile_sort("score", Some(direction)).unwrap();
            assert_eq!(cmp.compare(&missing, &present), Ordering::Less);
            assert_eq!(cmp.compare(&present, &missing), Ordering::Greater);
            assert_eq!(cmp.compare(&null, &present), Ordering::Less);
            assert_eq!(cmp.compare(&missing, &null), Ordering::Equal);
        }
    }

    #[test]
    fn test_descending_flips_present_comparisons() {
        let cmp = compile_sort("score", Some(SortDirection::Descending)).unwrap();
        assert_eq!(cmp.compare(&rec(2), &rec(10)), Ordering::Greater);
        assert_eq!(cmp.compare(&rec("a"), &rec("b")), Ordering::Greater);
        assert_eq!(cmp.compare(&rec(5), &rec(5)), Ordering::Equal);
    }

    #[test]
    fn test_cross_type_rank_order() {
        let cmp = compile_sort("score", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(cmp.compare(&rec(true), &rec(0)), Ordering::Less);
        assert_eq!(cmp.compare(&rec(99), &rec("apple")), Ordering::Less);
        assert_eq!(cmp.compare(&rec(true), &rec("apple")), Ordering::Less);
    }

    #[test]
    fn test_nan_comparisons_stay_total() {
        let cmp = compile_sort("score", Some(SortDirection::Ascending)).unwrap();
        let nan = rec(f64::NAN);
        assert_eq!(cmp.compare(&nan, &nan), Ordering::Equal);
        // NaN lands at a consistent end rather than poisoning the order
        let against_one = cmp.compare(&nan, &rec(1.0));
        let against_two = cmp.compare(&nan, &rec(2.0));
        assert_eq!(against_one, against_two);
        assert_ne!(against_one, Ordering::Equal);
    }
}
