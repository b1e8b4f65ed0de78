/// Live Views Example
///
/// This example demonstrates:
/// - Free-text search over every column
/// - Categorical column filters and how they combine with search
/// - Regex search mode
/// - Sorting ascending, descending, and back to arrival order
/// - View change events for incremental rendering

use streamgrid::{ColumnDescriptor, Record, SortDirection, Table};

fn print_view(table: &Table) {
    for row in table.window_slice(0, usize::MAX) {
        let level = row.record.get("level").map(|v| v.to_string()).unwrap_or_default();
        let message = row.record.get("message").map(|v| v.to_string()).unwrap_or_default();
        println!("      {:<5} {}", level, message);
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== StreamGrid Live Views Example ===\n");

    // 1. Create a log table
    println!("1. Creating log table...");
    let mut table = Table::new(vec![
        ColumnDescriptor::new("level").with_title("Level"),
        ColumnDescriptor::new("message").with_title("Message"),
    ]);

    let entries = [
        ("info", "server started on :8080"),
        ("warn", "slow request to /api/users"),
        ("error", "connection reset by peer"),
        ("info", "cache warmed"),
        ("error", "timeout talking to upstream"),
    ];
    for (level, message) in entries {
        table.append(Record::new().with("level", level).with("message", message));
    }
    println!("   {} log entries\n", table.len());

    // 2. Free-text search
    println!("2. Searching for 'request' (case-insensitive, any column)...");
    table.set_search("REQUEST");
    print_view(&table);
    table.set_search("");
    println!();

    // 3. Categorical column filter
    println!("3. Filtering level to 'error'...");
    table.add_column_filter("level", "error").unwrap();
    print_view(&table);
    println!();

    // 4. Search and filter combine
    println!("4. Adding search 'timeout' on top of the filter...");
    table.set_search("timeout");
    print_view(&table);
    table.set_search("");
    table.remove_column_filter("level", "error").unwrap();
    println!();

    // 5. Regex search
    println!("5. Regex search for messages mentioning a port or path...");
    table.set_regex_search(true);
    table.set_search(r"(:\d+|/api/\w+)");
    print_view(&table);
    table.set_search("");
    table.set_regex_search(false);
    println!();

    // 6. Sorting
    println!("6. Sorting by message ascending...");
    table.sort_column("message", Some(SortDirection::Ascending)).unwrap();
    print_view(&table);

    println!("   ...and descending:");
    table.sort_column("message", Some(SortDirection::Descending)).unwrap();
    print_view(&table);

    println!("   ...and back to arrival order:");
    table.sort_column("message", None).unwrap();
    print_view(&table);
    println!();

    // 7. Unknown columns degrade instead of blanking the table
    println!("7. Sorting by a column that does not exist...");
    match table.sort_column("nope", Some(SortDirection::Ascending)) {
        Ok(()) => {}
        Err(err) => println!("   Reported once: {}", err),
    }
    println!("   The view still shows {} rows\n", table.view_len());

    // 8. View change events
    println!("8. Watching view events while records stream in...");
    table.set_view_listener(|event| println!("   [view] {:?}", event));
    table.append(Record::new().with("level", "info").with("message", "listener attached"));
    table.set_search("error");
    table.append(Record::new().with("level", "error").with("message", "disk full"));
    table.append(Record::new().with("level", "info").with("message", "filtered out, no event"));
    table.set_search("");

    println!("\n=== Example Complete ===");
}
