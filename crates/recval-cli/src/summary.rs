use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recval_model::PipelineState;

use recval_cli::pipeline::{ExportRecord, ExportStatus, RunReport};

pub fn print_summary(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Errors"),
        header_cell("State"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 4, CellAlignment::Center);
    table.add_row(vec![
        Cell::new(report.total).add_attribute(Attribute::Bold),
        count_cell(report.valid, Color::Green),
        count_cell(report.invalid, Color::Red),
        count_cell(report.errors.len(), Color::Red),
        state_cell(report.state),
    ]);
    println!("{table}");
    print_error_table(report);
    print_export_table(&report.exports);
}

fn print_error_table(report: &RunReport) {
    if report.errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in &report.errors {
        table.add_row(vec![
            Cell::new(error.row),
            Cell::new(&error.field).fg(Color::Blue),
            Cell::new(&error.value),
            Cell::new(&error.message).fg(Color::Red),
        ]);
    }
    println!();
    println!("Rejected values:");
    println!("{table}");
}

fn print_export_table(exports: &[ExportRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Format"),
        header_cell("Partition"),
        header_cell("Path"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for export in exports {
        table.add_row(vec![
            Cell::new(export.format.as_str()).add_attribute(Attribute::Bold),
            Cell::new(export.kind.as_str()),
            Cell::new(export.path.display()),
            status_cell(&export.status),
        ]);
    }
    println!();
    println!("Exports:");
    println!("{table}");
    for export in exports {
        if let ExportStatus::Failed { message } = &export.status {
            eprintln!("- {message}");
        }
    }
}

fn status_cell(status: &ExportStatus) -> Cell {
    match status {
        ExportStatus::Written { records } => Cell::new(format!("✓ {records}"))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        ExportStatus::Failed { .. } => Cell::new(status.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        ExportStatus::NotAttempted => Cell::new(status.label()).fg(Color::Yellow),
        ExportStatus::Skipped | ExportStatus::DryRun => dim_cell(status.label()),
    }
}

fn state_cell(state: PipelineState) -> Cell {
    let cell = Cell::new(state.as_str()).add_attribute(Attribute::Bold);
    match state {
        PipelineState::Done => cell.fg(Color::Green),
        PipelineState::Failed => cell.fg(Color::Red),
        _ => cell.fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_width(120);
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
