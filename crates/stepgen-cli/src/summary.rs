use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use stepgen_substeps::SubstepItem;

use crate::types::CompileResult;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_summary(result: &CompileResult) {
    println!("Protocol: {}", result.protocol_name);
    if let Some(path) = &result.output_path {
        println!("Timeline: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Type"),
        header_cell("Commands"),
        header_cell("Warnings"),
        header_cell("Errors"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_commands = 0usize;
    for (step, frame) in result.steps.iter().zip(result.timeline.frames.iter()) {
        total_commands += frame.commands.len();
        table.add_row(vec![
            Cell::new(step.id.as_str()),
            Cell::new(step.args.step_type()),
            Cell::new(frame.commands.len()),
            count_cell(frame.warnings.len(), Color::Yellow),
            count_cell(frame.errors.len(), Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
        Cell::new(total_commands).add_attribute(Attribute::Bold),
        count_cell(result.timeline.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(result.timeline.error_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_issue_table(result);
    print_substeps(result);
}

fn print_issue_table(result: &CompileResult) {
    let mut issues: Vec<(String, &'static str, String)> = Vec::new();
    for frame in &result.timeline.frames {
        for error in &frame.errors {
            issues.push((frame.step_id.to_string(), "ERROR", error.message.clone()));
        }
        for warning in &frame.warnings {
            issues.push((frame.step_id.to_string(), "WARNING", warning.message.clone()));
        }
    }
    if issues.is_empty() {
        return;
    }
    // errors above warnings, then by step id
    issues.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Severity"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for (step, severity, message) in issues {
        let severity_cell = match severity {
            "ERROR" => Cell::new(severity).fg(Color::Red),
            _ => Cell::new(severity).fg(Color::Yellow),
        };
        table.add_row(vec![Cell::new(step), severity_cell, Cell::new(message)]);
    }
    println!("{table}");
}

fn print_substeps(result: &CompileResult) {
    if result.substeps.iter().all(Option::is_none) {
        return;
    }
    for (step, item) in result.steps.iter().zip(result.substeps.iter()) {
        let Some(item) = item else {
            continue;
        };
        println!("Substeps for {} ({}):", step.id, step.args.step_type());
        let mut table = Table::new();
        apply_table_style(&mut table);
        match item {
            SubstepItem::SourceDest { rows } => {
                table.set_header(vec![
                    header_cell("Source"),
                    header_cell("Dest"),
                    header_cell("Volume (µL)"),
                    header_cell("Fresh tip"),
                ]);
                for row in rows {
                    let source = row
                        .source
                        .as_ref()
                        .map(|snapshot| format!("{} {}", snapshot.labware, snapshot.well))
                        .unwrap_or_default();
                    let dest = row
                        .dest
                        .as_ref()
                        .map(|snapshot| format!("{} {}", snapshot.labware, snapshot.well))
                        .unwrap_or_default();
                    table.add_row(vec![
                        Cell::new(source),
                        Cell::new(dest),
                        Cell::new(row.volume_ul),
                        Cell::new(if row.fresh_tip { "yes" } else { "" }),
                    ]);
                }
            }
            SubstepItem::Mix { labware, rows } => {
                table.set_header(vec![
                    header_cell("Well"),
                    header_cell("Volume (µL)"),
                    header_cell("Repetitions"),
                ]);
                for row in rows {
                    table.add_row(vec![
                        Cell::new(format!("{} {}", labware, row.well)),
                        Cell::new(row.volume_ul),
                        Cell::new(row.repetitions),
                    ]);
                }
            }
            SubstepItem::Pause { message, seconds } => {
                table.set_header(vec![header_cell("Wait"), header_cell("Message")]);
                let wait = seconds
                    .map(|s| format!("{s} s"))
                    .unwrap_or_else(|| "until resumed".to_string());
                table.add_row(vec![
                    Cell::new(wait),
                    Cell::new(message.clone().unwrap_or_default()),
                ]);
            }
        }
        println!("{table}");
    }
}
