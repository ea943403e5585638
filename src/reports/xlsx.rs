//! Single-sheet workbook built with rust_xlsxwriter.

use chrono::SecondsFormat;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::config::REPORT_SHEET_NAME;
use crate::domain::HistoryRecord;
use crate::errors::{AppError, AppResult};

const HEADERS: [&str; 4] = ["Product Name", "Action", "Timestamp", "User"];
const COLUMN_WIDTHS: [f64; 4] = [30.0, 10.0, 26.0, 32.0];
const UNKNOWN_USER: &str = "N/A";

/// Excel refuses cell strings longer than this many characters.
const MAX_CELL_CHARS: usize = 32_767;

impl From<XlsxError> for AppError {
    fn from(err: XlsxError) -> Self {
        AppError::report(format!("XLSX: {}", err))
    }
}

fn cell_text(value: &str) -> String {
    value.chars().take(MAX_CELL_CHARS).collect()
}

/// Cell values for one record, in header order.
fn row_values(record: &HistoryRecord) -> [String; 4] {
    [
        cell_text(&record.product_name),
        record.action.to_string(),
        record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        cell_text(record.user_email().unwrap_or(UNKNOWN_USER)),
    ]
}

/// Render the history report as XLSX bytes. An empty slice yields the header row only.
pub fn render_xlsx(records: &[HistoryRecord]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_SHEET_NAME)?;

    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in row_values(record).iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryAction;
    use crate::reports::fixtures::record;

    #[test]
    fn test_row_values() {
        let values = row_values(&record(
            "Desk Lamp",
            HistoryAction::Delete,
            Some("jane@example.com"),
        ));
        assert_eq!(
            values,
            [
                "Desk Lamp".to_string(),
                "delete".to_string(),
                "2024-03-05T14:30:00.000Z".to_string(),
                "jane@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_user_shows_placeholder() {
        let values = row_values(&record("Desk Lamp", HistoryAction::Add, None));
        assert_eq!(values[3], UNKNOWN_USER);
    }

    #[test]
    fn test_oversized_name_is_clamped_to_cell_limit() {
        let oversized = record(&"x".repeat(40_000), HistoryAction::Add, None);
        assert_eq!(row_values(&oversized)[0].chars().count(), MAX_CELL_CHARS);

        let bytes = render_xlsx(&[oversized]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_render_is_valid_workbook() {
        let bytes = render_xlsx(&[]).unwrap();
        // XLSX is a zip container
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_with_records() {
        let records = vec![record("Mouse", HistoryAction::Update, Some("a@b.c"))];
        let bytes = render_xlsx(&records).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
