//! A4 text report built with printpdf's built-in Helvetica.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::config::REPORT_TITLE;
use crate::domain::HistoryRecord;
use crate::errors::{AppError, AppResult};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 10.0;
const MARGIN_BOTTOM_MM: f32 = 20.0;
const TITLE_TOP_MM: f32 = 20.0;
const FIRST_LINE_TOP_MM: f32 = 30.0;
const CONTINUATION_TOP_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const BODY_FONT_SIZE: f32 = 11.0;

/// One positioned line of text; `top` is measured down from the page's top edge.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    top: f32,
}

fn report_line(index: usize, record: &HistoryRecord) -> String {
    format!(
        "{}. {} - {} - {}",
        index + 1,
        record.product_name,
        record.action,
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Split report lines into pages, starting a new page at the bottom margin.
fn paginate(records: &[HistoryRecord]) -> Vec<Vec<Line>> {
    let mut pages = vec![Vec::new()];
    let mut top = FIRST_LINE_TOP_MM;

    for (index, record) in records.iter().enumerate() {
        if top > PAGE_HEIGHT_MM - MARGIN_BOTTOM_MM {
            pages.push(Vec::new());
            top = CONTINUATION_TOP_MM;
        }
        if let Some(page) = pages.last_mut() {
            page.push(Line {
                text: report_line(index, record),
                top,
            });
        }
        top += LINE_HEIGHT_MM;
    }

    pages
}

/// Render the history report as PDF bytes. An empty slice yields a title-only page.
pub fn render_pdf(records: &[HistoryRecord]) -> AppResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::report(format!("PDF font: {}", e)))?;

    for (number, lines) in paginate(records).into_iter().enumerate() {
        let layer = if number == 0 {
            let layer = doc.get_page(first_page).get_layer(first_layer);
            layer.use_text(
                REPORT_TITLE,
                TITLE_FONT_SIZE,
                Mm(MARGIN_LEFT_MM),
                Mm(PAGE_HEIGHT_MM - TITLE_TOP_MM),
                &font,
            );
            layer
        } else {
            let (page, layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        for line in lines {
            layer.use_text(
                line.text,
                BODY_FONT_SIZE,
                Mm(MARGIN_LEFT_MM),
                Mm(PAGE_HEIGHT_MM - line.top),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::report(format!("PDF write: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryAction;
    use crate::reports::fixtures::record;

    #[test]
    fn test_line_format() {
        let line = report_line(0, &record("Desk Lamp", HistoryAction::Update, None));
        assert_eq!(line, "1. Desk Lamp - update - 2024-03-05 14:30:00 UTC");
    }

    #[test]
    fn test_empty_report_has_single_page() {
        let pages = paginate(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_lines_advance_ten_millimetres() {
        let records: Vec<_> = (0..3)
            .map(|i| record(&format!("Item {}", i), HistoryAction::Add, None))
            .collect();
        let pages = paginate(&records);
        let tops: Vec<f32> = pages[0].iter().map(|l| l.top).collect();
        assert_eq!(tops, vec![30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_long_report_spills_onto_new_page() {
        let records: Vec<_> = (0..40)
            .map(|i| record(&format!("Item {}", i), HistoryAction::Add, None))
            .collect();
        let pages = paginate(&records);

        assert!(pages.len() > 1);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 40);
        assert!(pages
            .iter()
            .flatten()
            .all(|l| l.top <= PAGE_HEIGHT_MM - MARGIN_BOTTOM_MM));
        assert_eq!(pages[1][0].top, CONTINUATION_TOP_MM);
        assert!(pages[1][0].text.starts_with(&format!("{}.", pages[0].len() + 1)));
    }

    #[test]
    fn test_empty_render_is_valid_pdf() {
        let bytes = render_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_with_records() {
        let records = vec![
            record("Mouse", HistoryAction::Add, Some("jane@example.com")),
            record("Mouse", HistoryAction::Delete, None),
        ];
        let bytes = render_pdf(&records).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > render_pdf(&[]).unwrap().len());
    }
}
