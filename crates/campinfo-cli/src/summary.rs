use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use campinfo_cli::pipeline::ConvertResult;
use campinfo_ingest::BomStatus;
use campinfo_transform::RuleKind;

pub fn print_summary(result: &ConvertResult) {
    println!("Template: {}", result.template_file.display());
    println!("Data    : {}", result.data_file.display());
    if result.dry_run {
        println!("Dest.   : {} (dry run)", result.destination.display());
    } else {
        println!("Dest.   : {}", result.destination.display());
    }
    match result.bom {
        Some(BomStatus::Added) => println!("Added UTF-8 BOM to data file"),
        Some(BomStatus::Transcoded { encoding }) => {
            println!("Transcoded data file from {encoding} and added UTF-8 BOM");
        }
        Some(BomStatus::Present) | None => {}
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Rule"), header_cell("Columns applied")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in RuleKind::ALL {
        let count = result.rule_counts.get(&kind).copied().unwrap_or(0);
        table.add_row(vec![Cell::new(kind.as_str()), count_cell(count, Color::Reset)]);
    }
    table.add_row(vec![
        header_cell("Rows"),
        Cell::new(result.rows).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        header_cell("Files written"),
        Cell::new(result.written.len()).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        header_cell("Warnings"),
        count_cell(result.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        header_cell("Elapsed"),
        Cell::new(format!("{} ms", result.elapsed.as_millis())),
    ]);
    println!("{table}");

    if !result.unrecognized_columns.is_empty() {
        eprintln!("Columns not found in template:");
        for column in &result.unrecognized_columns {
            eprintln!("- {column}");
        }
    }
    if !result.missing_companions.is_empty() {
        eprintln!("Columns with a missing Value companion:");
        for column in &result.missing_companions {
            eprintln!("- {column}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
