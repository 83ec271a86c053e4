//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};

/// Prints the ordered batches of a build plan.
pub fn print_batch_table(batches: &[Vec<String>]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Batch").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Workspaces").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for (index, batch) in batches.iter().enumerate() {
        table.add_row(vec![
            Cell::new((index + 1).to_string()).fg(comfy_table::Color::DarkGrey),
            Cell::new(batch.join(", ")).fg(comfy_table::Color::White),
        ]);
    }

    println!("{}", table);
}
