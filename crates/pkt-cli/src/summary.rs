use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use pkt_cli::workflow::InspectSummary;
use pkt_model::{FieldHint, FieldMapping, MappingTarget, PdfField};

pub fn print_inspect(summary: &InspectSummary) {
    println!("Rows: {}", summary.rows);
    println!("Recipients: {}", summary.recipients);
    match &summary.display_column {
        Some(column) => println!("Display column: {column}"),
        None => println!("Display column: (none)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Hint"),
        header_cell("Token"),
    ]);
    apply_table_style(&mut table);
    for header in &summary.headers {
        let token = match &header.token {
            Some(token) => Cell::new(format!("{{{{{token}}}}}")),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(&header.name), hint_cell(header.hint), token]);
    }
    println!("{table}");
}

pub fn print_mapping_table(fields: &[PdfField], mapping: &FieldMapping) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Hint"),
        header_cell("Mapped to"),
    ]);
    apply_table_style(&mut table);
    for field in fields {
        let target = match mapping.get(&field.name) {
            Some(value) => target_cell(&MappingTarget::parse(value)),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&field.name),
            hint_cell(field.normalized.hint),
            target,
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn hint_cell(hint: FieldHint) -> Cell {
    match hint {
        FieldHint::Unknown => dim_cell(hint.label()),
        FieldHint::Signature => Cell::new(hint.label()).fg(Color::Red),
        _ => Cell::new(hint.label()).fg(Color::Blue),
    }
}

fn target_cell(target: &MappingTarget) -> Cell {
    if target.is_computed() {
        Cell::new(target.label()).fg(Color::Yellow)
    } else {
        Cell::new(target.label()).fg(Color::Green)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
