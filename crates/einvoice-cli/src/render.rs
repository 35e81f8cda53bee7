//! Table and JSON rendering of engine state.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use einvoice_engine::{DisplayLine, Engine, EngineSummary, FieldView, RemovedField, SettingsStore};
use serde_json::{Value, json};

pub fn fields_table(views: &[FieldView<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Input"),
        header_cell("Required"),
        header_cell("Removable"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for view in views {
        table.add_row(vec![
            Cell::new(view.field_key).add_attribute(Attribute::Bold),
            Cell::new(view.label),
            Cell::new(input_description(view)),
            flag_cell(view.required, Color::Red),
            flag_cell(view.removable, Color::Green),
            match view.value {
                Some(value) => Cell::new(value),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn removed_table(removed: &[RemovedField]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Removed field"), header_cell("Label")]);
    apply_table_style(&mut table);
    for field in removed {
        table.add_row(vec![Cell::new(&field.field_key), Cell::new(&field.label)]);
    }
    table
}

pub fn summary_table(summary: &EngineSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Summary"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in [
        ("Fields", summary.fields),
        ("Required", summary.required),
        ("Removable", summary.removable),
        ("Removed", summary.removed),
        ("Excluded types", summary.excluded_types),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

pub fn errors_table(lines: &[DisplayLine]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Message"), header_cell("Field path")]);
    apply_table_style(&mut table);
    for line in lines {
        table.add_row(vec![
            Cell::new(line).fg(Color::Red),
            dim_cell(line.path.as_str()),
        ]);
    }
    table
}

/// Session state as one JSON document.
pub fn session_json<S: SettingsStore>(engine: &Engine<S>) -> Value {
    json!({
        "country": engine.country().map(ToString::to_string),
        "summary": engine.summary(),
        "fields": engine.field_views(),
        "removed": engine.removed_fields(),
    })
}

fn input_description(view: &FieldView<'_>) -> String {
    if view.options.is_empty() {
        view.kind.to_string()
    } else {
        format!("{} ({})", view.kind, view.options.len())
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
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

fn flag_cell(flag: bool, color: Color) -> Cell {
    if flag {
        Cell::new("yes").fg(color)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
