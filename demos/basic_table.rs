/// Basic Table Example
///
/// This example demonstrates:
/// - Creating a table with a column configuration
/// - Appending records and reading a window of the view
/// - Updating a record in place while its id stays stable
/// - Removing records and clearing the table
/// - Retention limits for unbounded streams

use streamgrid::{ColumnDescriptor, Record, Table, TableOptions};

fn print_window(table: &Table, start: usize, count: usize) {
    for row in table.window_slice(start, count) {
        let title = row.record.get("title").map(|v| v.to_string()).unwrap_or_default();
        let done = row.record.get("done").map(|v| v.to_string()).unwrap_or_default();
        println!("      #{:<3} [{}] {}", row.id, done, title);
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== StreamGrid Basic Table Example ===\n");

    // 1. Create a task table
    println!("1. Creating task table...");
    let mut table = Table::new(vec![
        ColumnDescriptor::new("title").with_title("Task"),
        ColumnDescriptor::new("done").with_title("Done"),
    ]);

    // 2. Append records
    println!("2. Appending tasks...");
    let tasks = [
        ("Drink coffee", true),
        ("Write the report", false),
        ("Review the patch", false),
        ("Meet me at the movies", false),
    ];
    for (title, done) in tasks {
        table.append(Record::new().with("title", title).with("done", done));
    }
    println!("   Table now holds {} records\n", table.len());

    // 3. Read a window of the view
    println!("3. Current view window:");
    print_window(&table, 0, 10);
    println!();

    // 4. Update a record in place
    println!("4. Marking 'Write the report' as done...");
    table
        .update(1, Record::new().with("title", "Write the report").with("done", true))
        .unwrap();
    print_window(&table, 0, 10);
    println!("   Note: the record kept its id and position\n");

    // 5. Remove a record
    println!("5. Removing the first task...");
    let removed = table.remove(0).unwrap();
    println!(
        "   Removed: {}",
        removed.get("title").unwrap()
    );
    print_window(&table, 0, 10);
    println!();

    // 6. Retention limit for streams
    println!("6. Streaming 25 records through a table limited to 10...");
    let mut stream = Table::with_options(
        vec![ColumnDescriptor::new("title"), ColumnDescriptor::new("done")],
        TableOptions {
            limit: Some(10),
            key_field: None,
        },
    );
    for i in 0..25 {
        stream.append(
            Record::new()
                .with("title", format!("event {}", i))
                .with("done", false),
        );
    }
    println!("   Retained {} records (oldest evicted first):", stream.len());
    print_window(&stream, 0, 3);
    println!("      ...");

    println!("\n=== Example Complete ===");
}
