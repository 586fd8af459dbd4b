//! Reporter — renders the result set as a text table and as an `.xlsx` workbook.
//!
//! Both views show every record and every column in upload order. No sorting,
//! styling or pagination. Only spreadsheet cells are cut, at Excel's string limit.

use std::borrow::Cow;

use chrono::{DateTime, TimeZone};
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::warn;

use crate::models::evaluation::EvaluationRecord;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Sheet1";

/// Longest string Excel accepts in a single cell, in characters.
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// Column headers, in output order.
pub const COLUMNS: [&str; 9] = [
    "archivo",
    "nombre",
    "email",
    "teléfono",
    "sexo",
    "formación",
    "área",
    "puntuación",
    "justificación",
];

fn row_cells(record: &EvaluationRecord) -> [&str; 9] {
    let e = &record.evaluation;
    [
        record.file_name.as_str(),
        e.name.as_str(),
        e.email.as_str(),
        e.phone.as_str(),
        e.sex.as_str(),
        e.education.as_str(),
        e.area.as_str(),
        e.score.as_str(),
        e.justification.as_str(),
    ]
}

/// Download name for an export made at `now`: `resultados_evaluados_YYYYMMDD_HHMMSS.xlsx`.
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("resultados_evaluados_%Y%m%d_%H%M%S.xlsx").to_string()
}

/// Serializes the records into an in-memory workbook with a single sheet.
pub fn export_xlsx(records: &[EvaluationRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in row_cells(record).iter().enumerate() {
            let cell = fit_cell(value);
            if let Cow::Owned(_) = cell {
                warn!(
                    "Truncated '{}' for {} to {XLSX_MAX_CELL_CHARS} characters",
                    COLUMNS[col], record.file_name
                );
            }
            worksheet.write_string(row, col as u16, cell)?;
        }
    }

    workbook.save_to_buffer()
}

fn fit_cell(value: &str) -> Cow<'_, str> {
    match value.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((cut, _)) => Cow::Owned(value[..cut].to_string()),
        None => Cow::Borrowed(value),
    }
}

/// Renders an aligned plain-text table. Embedded newlines are flattened.
pub fn render_table(records: &[EvaluationRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| row_cells(r).iter().map(|c| flatten(c)).collect())
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, COLUMNS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn flatten(cell: &str) -> String {
    cell.split(['\r', '\n'])
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
