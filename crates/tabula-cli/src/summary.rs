use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabula_cli::script::ScriptReport;
use tabula_report::ColumnStats;

use crate::commands::RulesOutcome;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn list_cell(items: &[String]) -> Cell {
    if items.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(items.join(", "))
    }
}

fn status_cell(success: bool) -> Cell {
    if success {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{v:.4}")),
        None => dim_cell("-"),
    }
}

pub fn render_script_summary(report: &ScriptReport) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Operation"),
        header_cell("Status"),
        header_cell("Added"),
        header_cell("Removed"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for (index, step) in report.steps.iter().enumerate() {
        let error = match &step.error {
            Some(message) => Cell::new(message).fg(Color::Red),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&step.label),
            status_cell(step.success),
            list_cell(&step.new_columns),
            list_cell(&step.removed_columns),
            error,
        ]);
    }
    let mut out = table.to_string();
    for label in &report.undone {
        out.push_str(&format!("\nUndone: {label}"));
    }
    out.push_str(&format!(
        "\nResult: {} rows, {} columns",
        report.table.len(),
        report.table.columns().len()
    ));
    out
}

pub fn render_stats(stats: &[ColumnStats]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Count"),
        header_cell("Nulls"),
        header_cell("Unique"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
        header_cell("Median"),
        header_cell("Std"),
        header_cell("Top"),
    ]);
    apply_table_style(&mut table);
    for index in 2..10 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in stats {
        let numeric = column.numeric.as_ref();
        let top = match &column.top {
            Some(top) => Cell::new(format!("{} ({})", top.value, top.frequency)),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            Cell::new(column.kind.as_str()),
            Cell::new(column.count),
            Cell::new(column.null_count),
            Cell::new(column.unique_count),
            number_cell(numeric.and_then(|n| n.min)),
            number_cell(numeric.and_then(|n| n.max)),
            number_cell(numeric.and_then(|n| n.mean)),
            number_cell(numeric.and_then(|n| n.median)),
            number_cell(numeric.and_then(|n| n.std)),
            top,
        ]);
    }
    table.to_string()
}

pub fn render_operations(operations: &[&str], numeric: &[&str]) -> String {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Operation"), header_cell("Sub-types")]);
    apply_table_style(&mut table);
    for operation in operations {
        let sub_types = if *operation == "numeric_transform" {
            Cell::new(numeric.join(", "))
        } else {
            dim_cell("-")
        };
        table.add_row(vec![Cell::new(operation), sub_types]);
    }
    table.to_string()
}

pub fn render_rules(outcome: &RulesOutcome) -> String {
    let mut out = String::new();
    if !outcome.violations.is_empty() {
        out.push_str(&format!("Rule set '{}' is invalid:", outcome.name));
        for violation in &outcome.violations {
            out.push_str(&format!("\n- {violation}"));
        }
        return out;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Output"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (value, rows) in &outcome.tally {
        table.add_row(vec![Cell::new(value), Cell::new(rows)]);
    }
    out.push_str(&format!(
        "Rule set '{}' -> column '{}'\n{table}",
        outcome.name, outcome.target
    ));
    if !outcome.failures.is_empty() {
        out.push_str(&format!(
            "\n{} rows fell back to the default value:",
            outcome.failures.len()
        ));
        for failure in &outcome.failures {
            out.push_str(&format!("\n- {failure}"));
        }
    }
    out
}
