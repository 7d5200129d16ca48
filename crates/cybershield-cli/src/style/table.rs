//! Report tables built on comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::colors::Tint;

fn report_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if super::plain() {
        table.force_no_tty();
    }
    table
}

/// `(N noun)` with the noun agreeing with N.
pub fn count_footer(count: usize, noun: (&str, &str)) -> String {
    let (singular, plural) = noun;
    match count {
        0 => format!("(no {plural})"),
        1 => format!("(1 {singular})"),
        n => format!("({n} {plural})"),
    }
}

/// Prints rows under a bold header, then a count footer.
///
/// `noun` is the singular and plural name of one row.
pub fn print_rows(columns: &[&str], rows: &[Vec<String>], noun: (&str, &str)) {
    if !rows.is_empty() {
        let mut table = report_table();
        table.set_header(
            columns
                .iter()
                .map(|col| Cell::new(col).add_attribute(Attribute::Bold).fg(Color::Cyan)),
        );
        for row in rows {
            table.add_row(row);
        }
        println!("{table}");
    }
    println!("{}", count_footer(rows.len(), noun).muted());
}

/// Prints one fact per row, keys dimmed.
pub fn print_facts(facts: &[(&str, String)]) {
    let mut table = report_table();
    for (key, value) in facts {
        table.add_row(vec![Cell::new(key).fg(Color::DarkGrey), Cell::new(value)]);
    }
    println!("{table}");
}
