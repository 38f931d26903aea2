use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mmx_cli::pipeline::{FormulaCheck, TransformReport};

pub fn print_series_table(report: &TransformReport) {
    println!("Rows: {} of {}", report.rows_kept, report.rows_total);

    let mut table = Table::new();
    let mut header = Vec::with_capacity(report.series.len() + 1);
    if report.dates.is_some() {
        header.push(header_cell("Date"));
    }
    header.extend(report.series.iter().map(|s| header_cell(&s.name)));
    table.set_header(header);
    apply_series_table_style(&mut table);

    let offset = usize::from(report.dates.is_some());
    for index in 0..report.series.len() {
        align_column(&mut table, index + offset, CellAlignment::Right);
    }

    for row in 0..report.rows_kept {
        let mut cells = Vec::with_capacity(report.series.len() + offset);
        if let Some(dates) = &report.dates {
            cells.push(Cell::new(dates.get(row).map_or("", String::as_str)));
        }
        for series in &report.series {
            cells.push(value_cell(series.values.get(row).copied()));
        }
        table.add_row(cells);
    }
    println!("{table}");

    if !report.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &report.warnings {
            eprintln!("- {warning}");
        }
    }
}

pub fn print_validation_table(checks: &[FormulaCheck]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Formula"),
        header_cell("Valid"),
        header_cell("Canonical"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for check in checks {
        let valid = if check.validation.valid {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(&check.formula),
            valid,
            check
                .canonical
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            check
                .validation
                .error
                .as_deref()
                .map_or_else(|| dim_cell("-"), |e| Cell::new(e).fg(Color::Red)),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_series_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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

fn value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) if v.is_finite() => Cell::new(format!("{v:.6}")),
        Some(v) => dim_cell(v),
        None => dim_cell("-"),
    }
}
