/// StreamGrid - Live Tabular Data Engine
///
/// A synchronous engine for tables that update while the user watches:
/// an append-ordered record store with stable ids, compiled filter and
/// sort passes, an incrementally maintained view index, and an
/// id-based selection model. A windowed renderer reads slices of the
/// view; producers stream appends and in-place updates through the
/// same single-writer facade.

pub mod column;
pub mod error;
pub mod filter;
pub mod record;
pub mod selection;
pub mod sort;
pub mod store;
pub mod table;
pub mod view;

pub use column::{ColumnDescriptor, FilterEntry};
pub use error::TableError;
pub use filter::{compile_filter, FilterSpec, RecordPredicate};
pub use record::{Record, RecordId, Value};
pub use selection::{SelectionEvent, SelectionModel};
pub use sort::{compile_sort, RecordComparator, SortDirection};
pub use store::{ChangeLog, RecordChange, RecordStore};
pub use table::{Table, TableOptions};
pub use view::{ViewEvent, ViewIndex, ViewRow};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn todo(title: &str, done: bool) -> Record {
        Record::new().with("title", title).with("done", done)
    }

    fn titles(table: &Table) -> Vec<String> {
        table
            .window_slice(0, usize::MAX)
            .into_iter()
            .map(|row| row.record.get("title").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_streaming_append_with_in_place_update() {
        let mut table = Table::new(vec![
            ColumnDescriptor::new("seq"),
            ColumnDescriptor::new("status"),
        ]);
        for i in 0..10_000 {
            table.append(Record::new().with("seq", i as i64).with("status", "pending"));
        }

        // The renderer only ever asks for a window near the tail
        let tail = table.window_slice(9_990, 10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0].record.get("seq").unwrap().as_i64(), Some(9_990));
        assert_eq!(tail[9].record.get("seq").unwrap().as_i64(), Some(9_999));

        // An in-place update keeps the row's id and position
        let before = table.window_slice(5_000, 1).pop().unwrap();
        table
            .update(
                5_000,
                Record::new().with("seq", 5_000i64).with("status", "done"),
            )
            .unwrap();
        let after = table.window_slice(5_000, 1).pop().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.record.get("status").unwrap().as_str(), Some("done"));
        assert_eq!(table.view_len(), 10_000);
    }

    #[test]
    fn test_sort_toggle_cycle_returns_to_arrival_order() {
        let mut table = Table::new(vec![ColumnDescriptor::new("title")]);
        for title in ["delta", "alpha", "echo", "bravo"] {
            table.append(Record::new().with("title", title));
        }

        table
            .sort_column("title", Some(SortDirection::Ascending))
            .unwrap();
        assert_eq!(titles(&table), vec!["alpha", "bravo", "delta", "echo"]);

        table
            .sort_column("title", Some(SortDirection::Descending))
            .unwrap();
        assert_eq!(titles(&table), vec!["echo", "delta", "bravo", "alpha"]);

        // Clearing the sort restores arrival order exactly
        table.sort_column("title", None).unwrap();
        assert_eq!(titles(&table), vec!["delta", "alpha", "echo", "bravo"]);
    }

    #[test]
    fn test_search_combined_with_column_filter() {
        let mut table = Table::new(vec![
            ColumnDescriptor::new("title"),
            ColumnDescriptor::new("done"),
        ]);
        table.append(todo("Drink coffee", true));
        table.append(todo("Eat a banana", false));
        table.append(todo("Meet me at the movies", false));

        // Substring search is case-insensitive
        table.set_search("EE");
        assert_eq!(titles(&table), vec!["Drink coffee", "Meet me at the movies"]);

        // A categorical filter narrows the same view further
        table.add_column_filter("done", "true").unwrap();
        assert_eq!(titles(&table), vec!["Drink coffee"]);

        table.remove_column_filter("done", "true").unwrap();
        table.set_search("");
        assert_eq!(table.view_len(), 3);
    }

    #[test]
    fn test_selection_event_stream_across_mutations() {
        let mut table = Table::new(vec![
            ColumnDescriptor::new("title"),
            ColumnDescriptor::new("done"),
        ]);
        table.append(todo("one", false));
        table.append(todo("two", false));
        table.append(todo("three", false));

        let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        table.set_selection_listener(move |event| sink.borrow_mut().push(event.clone()));

        table.select_item(2);
        table.add_range_to_selection(0, 0);

        // The selected record is updated between selection operations;
        // the next event reports its current contents, not a snapshot
        table.update(0, todo("one!", true)).unwrap();
        table.add_range_to_selection(1, 1);

        let captured = events.borrow();
        assert_eq!(captured.len(), 3);

        let selected_titles: Vec<_> = captured[2]
            .selected
            .iter()
            .map(|r| r.get("title").unwrap().to_string())
            .collect();
        assert_eq!(selected_titles, vec!["one!", "two", "three"]);
        assert_eq!(
            captured[2].current.as_ref().unwrap().get("title").unwrap().as_str(),
            Some("two")
        );

        // Exactly one event per selection operation, none for the update
        drop(captured);
        table.clear_selection();
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn test_filter_sort_and_selection_compose() {
        let mut table = Table::new(vec![
            ColumnDescriptor::new("level"),
            ColumnDescriptor::new("message"),
        ]);
        let entries = [
            ("error", "disk full"),
            ("info", "started"),
            ("error", "timeout"),
            ("warn", "slow request"),
            ("error", "bad handshake"),
        ];
        for (level, message) in entries {
            table.append(Record::new().with("level", level).with("message", message));
        }

        table.add_column_filter("level", "error").unwrap();
        table
            .sort_column("message", Some(SortDirection::Ascending))
            .unwrap();

        let messages: Vec<_> = table
            .window_slice(0, 10)
            .into_iter()
            .map(|row| row.record.get("message").unwrap().to_string())
            .collect();
        assert_eq!(messages, vec!["bad handshake", "disk full", "timeout"]);

        // A new matching append lands at its sorted position
        table.append(Record::new().with("level", "error").with("message", "aborted"));
        assert_eq!(
            table.window_slice(0, 1)[0].record.get("message").unwrap().as_str(),
            Some("aborted")
        );

        // Selection follows the record, not the position
        table.select_item(0);
        table
            .sort_column("message", Some(SortDirection::Descending))
            .unwrap();
        assert_eq!(
            table.selected_records()[0].get("message").unwrap().as_str(),
            Some("aborted")
        );
    }

    #[test]
    fn test_ids_are_never_reused_across_clear() {
        let mut table = Table::new(vec![ColumnDescriptor::new("n")]);
        let first = table.append(Record::new().with("n", 1i64));
        let second = table.append(Record::new().with("n", 2i64));
        table.select_item(0);

        table.clear();
        assert_eq!(table.view_len(), 0);
        assert!(table.selected_ids().is_empty());

        let third = table.append(Record::new().with("n", 3i64));
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn test_keyed_stream_with_retention() {
        let mut table = Table::with_options(
            vec![ColumnDescriptor::new("req"), ColumnDescriptor::new("status")],
            TableOptions {
                limit: Some(100),
                key_field: Some("req".to_string()),
            },
        );

        for i in 0..150 {
            let key = format!("req-{i}");
            table
                .upsert(Record::new().with("req", key.as_str()).with("status", "sent"))
                .unwrap();
        }
        assert!(table.len() <= 100);

        // Upserting an evicted key appends a fresh record
        let id = table
            .upsert(Record::new().with("req", "req-0").with("status", "retried"))
            .unwrap();
        assert_eq!(table.get_by_id(id).unwrap().get("status").unwrap().as_str(), Some("retried"));

        // Upserting a live key replaces in place
        let live = table
            .upsert(Record::new().with("req", "req-149").with("status", "done"))
            .unwrap();
        assert_eq!(
            table.get_by_key("req-149").unwrap().get("status").unwrap().as_str(),
            Some("done")
        );
        assert!(table.get_by_id(live).is_some());
    }

    #[test]
    fn test_json_ingestion_end_to_end() {
        let payload = r#"[
            {"title": "Drink coffee", "done": true, "priority": 2},
            {"title": "Write report", "done": false, "priority": 1},
            {"title": "Meet me at the movies", "done": false, "priority": 3}
        ]"#;
        let rows: Vec<serde_json::Value> = serde_json::from_str(payload).unwrap();

        let mut table = Table::new(vec![
            ColumnDescriptor::new("title"),
            ColumnDescriptor::new("done"),
            ColumnDescriptor::new("priority"),
        ]);
        for row in rows {
            table.append(Record::from_json(row).unwrap());
        }

        table
            .sort_column("priority", Some(SortDirection::Ascending))
            .unwrap();
        assert_eq!(
            titles(&table),
            vec!["Write report", "Drink coffee", "Meet me at the movies"]
        );

        // A window serializes straight back to JSON for transport
        let window = table.window_slice(0, 2);
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json[0]["record"]["title"], "Write report");
        assert_eq!(json[1]["record"]["priority"], 2);
    }

    #[test]
    fn test_regex_search_toggle() {
        let mut table = Table::new(vec![ColumnDescriptor::new("path")]);
        table.append(Record::new().with("path", "/api/users/42"));
        table.append(Record::new().with("path", "/api/orders/7"));
        table.append(Record::new().with("path", "/static/logo.png"));

        table.set_search(r"^/api/\w+/\d+$");
        // As a substring this matches nothing
        assert_eq!(table.view_len(), 0);

        table.set_regex_search(true);
        assert_eq!(table.view_len(), 2);

        table.set_regex_search(false);
        assert_eq!(table.view_len(), 0);
    }
}
