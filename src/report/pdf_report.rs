//! A single-page product listing written as a minimal PDF 1.4 file.
//!
//! The page is US Letter with Helvetica text: a title, a column header and
//! one line per product at a fixed step. There is no pagination; rows that
//! would sit below the bottom edge are not drawn.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::CatalogResult;
use crate::models::ProductView;

/// Where the report lands when the caller does not choose a path.
pub(crate) const DEFAULT_PDF_PATH: &str = "relatorio_produtos.pdf";

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const FONT_SIZE: u32 = 12;
const LEFT: i32 = 100;
const TITLE_Y: i32 = 750;
const HEADER_Y: i32 = 730;
const FIRST_ROW_Y: i32 = 710;
const ROW_STEP: i32 = 20;

pub(crate) const TITLE: &str = "Product Report";
pub(crate) const HEADER: &str = "ID    Name    Quantity    Price    Category";

/// Number of product rows that fit on the page.
pub(crate) fn visible_rows() -> usize {
    (FIRST_ROW_Y / ROW_STEP + 1) as usize
}

pub(crate) fn row_line(product: &ProductView) -> String {
    format!(
        "{}    {}    {}    {}    {}",
        product.id,
        product.name,
        product.quantity,
        product.price,
        product.category_or("-")
    )
}

/// Write the report to `path`, returning how many rows made it onto the page.
pub(crate) fn write_pdf(rows: &[ProductView], path: &Path) -> CatalogResult<usize> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    let drawn = write_pdf_to(rows, &mut out)?;
    out.flush()?;
    if drawn < rows.len() {
        log::warn!(
            "PDF report clipped {} of {} products",
            rows.len() - drawn,
            rows.len()
        );
    }
    log::info!("Wrote PDF report with {drawn} products to {}", path.display());
    Ok(drawn)
}

pub(crate) fn write_pdf_to<W: Write>(rows: &[ProductView], out: &mut W) -> CatalogResult<usize> {
    let mut lines: Vec<(i32, String)> = vec![
        (TITLE_Y, TITLE.to_string()),
        (HEADER_Y, HEADER.to_string()),
    ];
    let mut y = FIRST_ROW_Y;
    let drawn = rows.len().min(visible_rows());
    for product in &rows[..drawn] {
        lines.push((y, row_line(product)));
        y -= ROW_STEP;
    }

    let content = content_stream(&lines);
    out.write_all(&assemble(&content))?;
    Ok(drawn)
}

fn content_stream(lines: &[(i32, String)]) -> Vec<u8> {
    let mut stream = Vec::new();
    for (y, text) in lines {
        stream.extend_from_slice(format!("BT\n/F1 {FONT_SIZE} Tf\n{LEFT} {y} Td\n(").as_bytes());
        stream.extend_from_slice(&encode_text(text));
        stream.extend_from_slice(b") Tj\nET\n");
    }
    stream
}

/// Lay out the five objects and the cross-reference table.
fn assemble(content: &[u8]) -> Vec<u8> {
    let objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
        {
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content);
            stream.extend_from_slice(b"\nendstream");
            stream
        },
    ];

    let mut pdf: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        pdf.extend_from_slice(body);
        pdf.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

/// Escape a string for a PDF literal and map it to WinAnsi bytes. Latin-1
/// characters pass through; anything else becomes `?`.
pub(crate) fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                bytes.push(b'\\');
                bytes.push(ch as u8);
            }
            c if c.is_control() => bytes.push(b' '),
            c if (c as u32) < 0x80 => bytes.push(c as u8),
            c if (0xA0..=0xFF).contains(&(c as u32)) => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}
