//! Report rendering for history exports.
//!
//! Renderers are pure functions from records to file bytes; they never touch
//! the database.

mod pdf;
mod xlsx;

use std::str::FromStr;

use crate::config::{
    CONTENT_TYPE_PDF, CONTENT_TYPE_XLSX, INVALID_EXPORT_TYPE_MESSAGE, REPORT_FILE_STEM,
};
use crate::domain::HistoryRecord;
use crate::errors::{AppError, AppResult};

pub use pdf::render_pdf;
pub use xlsx::render_xlsx;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => CONTENT_TYPE_PDF,
            ExportFormat::Excel => CONTENT_TYPE_XLSX,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", REPORT_FILE_STEM, self.extension())
    }
}

/// `xlsx` is accepted as an alias for `excel`.
impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(AppError::bad_request(INVALID_EXPORT_TYPE_MESSAGE)),
        }
    }
}

/// A rendered report ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Render records in the requested format.
pub fn render(records: &[HistoryRecord], format: ExportFormat) -> AppResult<ExportFile> {
    let bytes = match format {
        ExportFormat::Pdf => render_pdf(records)?,
        ExportFormat::Excel => render_xlsx(records)?,
    };

    Ok(ExportFile {
        bytes,
        content_type: format.content_type(),
        file_name: format.file_name(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{HistoryAction, HistoryRecord, HistoryUser};

    pub fn record(name: &str, action: HistoryAction, email: Option<&str>) -> HistoryRecord {
        let user_id = Uuid::new_v4();
        HistoryRecord {
            id: Uuid::new_v4(),
            action,
            product_name: name.to_string(),
            changes: "Product deleted".to_string(),
            user_id,
            user: email.map(|email| HistoryUser {
                id: user_id,
                full_name: "Jane Doe".to_string(),
                email: email.to_string(),
            }),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryAction;

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = "csv".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == INVALID_EXPORT_TYPE_MESSAGE));
        assert!("".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_render_sets_attachment_metadata() {
        let records = vec![fixtures::record("Mouse", HistoryAction::Add, None)];

        let pdf = render(&records, ExportFormat::Pdf).unwrap();
        assert_eq!(pdf.content_type, CONTENT_TYPE_PDF);
        assert_eq!(pdf.file_name, "product-history-report.pdf");

        let xlsx = render(&records, ExportFormat::Excel).unwrap();
        assert_eq!(xlsx.content_type, CONTENT_TYPE_XLSX);
        assert_eq!(xlsx.file_name, "product-history-report.xlsx");
    }
}
