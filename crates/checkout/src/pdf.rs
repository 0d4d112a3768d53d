//! Built-in PDF renderer.
//!
//! Assembles a single-page PDF 1.4 byte stream directly: uncompressed
//! text content stream, two standard Type1 fonts, cross-reference table.
//! Layout mirrors the billing documents the shop has always produced —
//! title block, date and invoice lines, a four-column item table, totals
//! on the right, footer at the bottom.

use crate::render::{DocumentRenderer, InvoiceDocument, RenderError};

// US Letter, points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_LEFT: f32 = 50.0;

// Column x-positions of the item table.
const COLUMNS: [f32; 4] = [50.0, 290.0, 380.0, 470.0];

/// Renders [`InvoiceDocument`]s to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
        let content = build_content_stream(document);
        Ok(assemble_pdf(&content))
    }
}

/// Escapes a string for a PDF literal string and folds characters the
/// standard fonts cannot encode to `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' | '\t' => out.push(' '),
            c if (c as u32) < 0x20 || (c as u32) > 0xFF => out.push('?'),
            c => out.push(c),
        }
    }
    out
}

struct ContentStream {
    ops: String,
}

impl ContentStream {
    fn new() -> Self {
        Self { ops: String::new() }
    }

    /// Emits one text object at an absolute position.
    fn text(&mut self, x: f32, y: f32, font: &str, size: f32, text: &str) {
        self.ops.push_str(&format!(
            "BT /{font} {size} Tf {x:.1} {y:.1} Td ({}) Tj ET\n",
            escape_text(text)
        ));
    }

    /// Horizontal rule across the table width.
    fn rule(&mut self, y: f32) {
        self.ops.push_str(&format!(
            "{MARGIN_LEFT:.1} {y:.1} m {:.1} {y:.1} l S\n",
            PAGE_WIDTH - MARGIN_LEFT
        ));
    }

    fn finish(self) -> String {
        self.ops
    }
}

fn build_content_stream(document: &InvoiceDocument) -> String {
    let mut stream = ContentStream::new();
    let mut y = PAGE_HEIGHT - 72.0;

    stream.text(MARGIN_LEFT, y, "F2", 24.0, &document.title);
    y -= 36.0;

    for line in &document.meta {
        stream.text(MARGIN_LEFT, y, "F1", 12.0, line);
        y -= 18.0;
    }
    y -= 6.0;

    for line in &document.customer {
        stream.text(MARGIN_LEFT, y, "F1", 12.0, line);
        y -= 18.0;
    }
    y -= 12.0;

    stream.rule(y + 6.0);
    for (column, header) in COLUMNS.iter().zip(document.table_header.iter()) {
        stream.text(*column, y - 8.0, "F2", 12.0, header);
    }
    y -= 22.0;
    stream.rule(y + 4.0);

    for row in &document.rows {
        for (column, cell) in COLUMNS.iter().zip(row.iter()) {
            stream.text(*column, y - 8.0, "F1", 11.0, cell);
        }
        y -= 18.0;
    }
    stream.rule(y + 4.0);
    y -= 10.0;

    for (label, value) in &document.totals {
        stream.text(COLUMNS[2], y - 8.0, "F2", 11.0, label);
        stream.text(COLUMNS[3], y - 8.0, "F2", 11.0, value);
        y -= 18.0;
    }

    let mut footer_y = 50.0;
    for line in &document.footer {
        stream.text(MARGIN_LEFT, footer_y, "F1", 10.0, line);
        footer_y -= 15.0;
    }

    stream.finish()
}

fn assemble_pdf(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
    ];

    let mut buf: Vec<u8> = Vec::with_capacity(content.len() + 1024);
    buf.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain::{DiscountRate, LineItem, Money, Order, PricingResult};

    fn sample_document() -> InvoiceDocument {
        let order = Order {
            invoice_number: "202608-0001".parse().unwrap(),
            order_date: Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
            total_amount: Money::from_cents(10_800),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
        };
        let items = vec![LineItem::with_print(
            "Poster (large)",
            Money::from_dollars(100),
            1,
            Money::from_dollars(20),
        )];
        let pricing = PricingResult::compute(&items, DiscountRate::from_fraction(0.10).unwrap());
        InvoiceDocument::for_checkout(&order, &items, &pricing)
    }

    #[test]
    fn test_output_is_pdf_shaped() {
        let bytes = PdfRenderer::new().render(&sample_document()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_content_embeds_document_text() {
        let bytes = PdfRenderer::new().render(&sample_document()).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("(INVOICE)"));
        assert!(text.contains("Invoice #: 202608-0001"));
        // Parentheses in item names are escaped inside the literal.
        assert!(text.contains("Poster \\(large\\)"));
        assert!(text.contains("$108.00"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = PdfRenderer::new();
        let doc = sample_document();
        assert_eq!(renderer.render(&doc).unwrap(), renderer.render(&doc).unwrap());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_text("tab\there"), "tab here");
        assert_eq!(escape_text("snowman\u{2603}"), "snowman?");
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfRenderer::new().render(&sample_document()).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        // Every xref entry must point at the start of "N 0 obj".
        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3) // "xref", "0 7", free entry
            .take(6)
            .map(|line| line[..10].parse().unwrap())
            .collect();

        for (index, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", index + 1);
            assert!(text[*offset..].starts_with(&expected));
        }
    }
}
