/// Selection Example
///
/// This example demonstrates:
/// - Selecting a single row by view position
/// - Extending the selection over a range without moving the anchor
/// - Selection identity following records through updates and re-sorts
/// - Silent pruning when selected records are removed

use streamgrid::{ColumnDescriptor, Record, SortDirection, Table};

fn task(title: &str, done: bool) -> Record {
    Record::new().with("title", title).with("done", done)
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== StreamGrid Selection Example ===\n");

    // 1. Create a table and report every selection event
    println!("1. Creating table with a selection listener...");
    let mut table = Table::new(vec![
        ColumnDescriptor::new("title"),
        ColumnDescriptor::new("done"),
    ]);
    table.set_selection_listener(|event| {
        let current = event
            .current
            .as_ref()
            .and_then(|r| r.get("title"))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string());
        let selected: Vec<String> = event
            .selected
            .iter()
            .filter_map(|r| r.get("title"))
            .map(|v| v.to_string())
            .collect();
        println!("   [selection] current={} selected={:?}", current, selected);
    });

    for title in ["alpha", "bravo", "charlie", "delta", "echo"] {
        table.append(task(title, false));
    }
    println!("   {} rows\n", table.view_len());

    // 2. Single selection
    println!("2. Selecting view position 2...");
    table.select_item(2);
    println!();

    // 3. Range selection keeps the anchor
    println!("3. Shift-click style: extending over positions 0..=0...");
    table.add_range_to_selection(0, 0);
    println!("   Anchor is still the explicitly selected row: {:?}\n", table.anchor());

    // 4. Selection identity follows the record
    println!("4. Updating the selected 'charlie' row...");
    table.update(2, task("charlie (done)", true)).unwrap();
    println!("   Next selection event reports current contents:");
    table.add_range_to_selection(3, 3);
    println!();

    println!("   Re-sorting does not change what is selected:");
    table.sort_column("title", Some(SortDirection::Descending)).unwrap();
    let selected: Vec<String> = table
        .selected_records()
        .iter()
        .filter_map(|r| r.get("title"))
        .map(|v| v.to_string())
        .collect();
    println!("   Selected (view order): {:?}\n", selected);

    // 5. Removing a selected record prunes silently
    println!("5. Removing 'alpha' from the base store...");
    table.remove(0).unwrap();
    println!("   No selection event fired; {} rows remain selected\n", table.selected_ids().len());

    // 6. Out-of-range selection clears
    println!("6. Selecting a position past the end...");
    table.select_item(999);
    println!();

    println!("=== Example Complete ===");
}
