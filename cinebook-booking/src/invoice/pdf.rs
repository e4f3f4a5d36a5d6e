use async_trait::async_trait;
use cinebook_core::invoice::{DocumentEngine, InvoiceLayout, RenderError};
use std::fmt::Write as _;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN_LEFT: u32 = 50;
const VALUE_COLUMN: u32 = 160;
const LINE_HEIGHT: u32 = 22;

/// Writes a single-page PDF 1.4 with the standard Helvetica fonts.
///
/// Streams are left uncompressed. Characters outside WinAnsi print as `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPdfEngine;

impl BuiltinPdfEngine {
    pub fn render_bytes(layout: &InvoiceLayout) -> Vec<u8> {
        let content = page_content(layout);

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out: Vec<u8> = Vec::with_capacity(content.len() + 1024);
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len() + 1);
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
        }

        offsets.push(out.len());
        out.extend_from_slice(
            format!("{} 0 obj\n<< /Length {} >>\nstream\n", objects.len() + 1, content.len())
                .as_bytes(),
        );
        out.extend_from_slice(&content);
        out.extend_from_slice(b"\nendstream\nendobj\n");

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

#[async_trait]
impl DocumentEngine for BuiltinPdfEngine {
    fn name(&self) -> &'static str {
        "builtin"
    }

    async fn convert(&self, layout: &InvoiceLayout) -> Result<Vec<u8>, RenderError> {
        Ok(Self::render_bytes(layout))
    }
}

fn page_content(layout: &InvoiceLayout) -> Vec<u8> {
    let mut stream = Vec::new();
    let top = PAGE_HEIGHT - 62;

    text_op(&mut stream, "F2", 18, MARGIN_LEFT, top, &layout.title);
    for (index, (label, value)) in layout.lines.iter().enumerate() {
        let y = top.saturating_sub(40 + LINE_HEIGHT * index as u32);
        text_op(&mut stream, "F2", 12, MARGIN_LEFT, y, &format!("{label}:"));
        text_op(&mut stream, "F1", 12, VALUE_COLUMN, y, value);
    }
    stream
}

fn text_op(stream: &mut Vec<u8>, font: &str, size: u32, x: u32, y: u32, text: &str) {
    stream.extend_from_slice(format!("BT /{font} {size} Tf {x} {y} Td (").as_bytes());
    stream.extend_from_slice(&encode_text(text));
    stream.extend_from_slice(b") Tj ET\n");
}

/// Encodes a string as the body of a PDF literal string in WinAnsi.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            ' '..='~' => out.push(c as u8),
            // Latin-1 supplement maps 1:1 onto WinAnsi
            '\u{a0}'..='\u{ff}' => out.extend_from_slice(format!("\\{:03o}", c as u32).as_bytes()),
            _ => out.push(b'?'),
        }
    }
    out
}
