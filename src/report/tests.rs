#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::csv_report::write_csv_to;
use super::pdf_report::{encode_text, row_line, visible_rows, write_pdf_to, HEADER, TITLE};
use super::*;
use crate::models::{NewProduct, ProductView};

fn view(id: i64, name: &str, qty: i64, category: Option<&str>) -> ProductView {
    ProductView {
        id,
        name: name.into(),
        quantity: qty,
        price: dec!(19.99),
        category: category.map(String::from),
    }
}

fn stocked_db() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    db.add_category("Tools").unwrap();
    db.add_category("Garden").unwrap();
    db.add_product(&NewProduct::new("Hammer", 10, dec!(19.99), "Tools"))
        .unwrap();
    db.add_product(&NewProduct::new("Rake", 0, dec!(8), "Garden"))
        .unwrap();
    db.add_product(&NewProduct::new("Shovel", 4, dec!(22.50), "Garden"))
        .unwrap();
    db
}

// ── CSV ───────────────────────────────────────────────────────

#[test]
fn test_csv_lines_match_listing() {
    let rows = vec![view(1, "Hammer", 10, Some("Tools")), view(2, "Loose", 1, None)];
    let mut buf = Vec::new();
    let count = write_csv_to(&rows, &mut buf).unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "1,Hammer,10,19.99,Tools\n2,Loose,1,19.99,\n"
    );
}

#[test]
fn test_csv_roundtrip_by_splitting_on_commas() {
    let db = stocked_db();
    let listing = db.list_products().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.csv");

    let written = export_csv(&db, Some(&path)).unwrap();
    assert_eq!(written, Some(3));

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<Vec<String>> = text
        .lines()
        .map(|l| l.split(',').map(String::from).collect())
        .collect();
    let expected: Vec<Vec<String>> = listing
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.quantity.to_string(),
                p.price.to_string(),
                p.category.clone().unwrap_or_default(),
            ]
        })
        .collect();
    assert_eq!(parsed, expected);
}

#[test]
fn test_csv_quotes_embedded_commas() {
    let rows = vec![view(1, "Nails, box of 100", 5, Some("Tools"))];
    let mut buf = Vec::new();
    write_csv_to(&rows, &mut buf).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "1,\"Nails, box of 100\",5,19.99,Tools\n"
    );
}

#[test]
fn test_csv_without_path_writes_nothing() {
    let db = stocked_db();
    assert_eq!(export_csv(&db, None).unwrap(), None);
    assert_eq!(write_csv(&[view(1, "A", 1, None)], None).unwrap(), None);
}

#[test]
fn test_csv_empty_listing_creates_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(write_csv(&[], Some(&path)).unwrap(), Some(0));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_csv_bad_path_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.csv");
    let err = write_csv(&[view(1, "A", 1, None)], Some(&path)).unwrap_err();
    assert!(matches!(err, crate::error::CatalogError::Storage(_)));
}

// ── PDF ───────────────────────────────────────────────────────

#[test]
fn test_pdf_structure() {
    let mut buf = Vec::new();
    let drawn = write_pdf_to(&[view(1, "Hammer", 10, Some("Tools"))], &mut buf).unwrap();
    assert_eq!(drawn, 1);

    let text = String::from_utf8_lossy(&buf);
    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.contains("/MediaBox [0 0 612 792]"));
    assert!(text.contains("/BaseFont /Helvetica"));
    assert!(text.contains(&format!("100 750 Td\n({TITLE}) Tj")));
    assert!(text.contains(&format!("100 730 Td\n({HEADER}) Tj")));
    assert!(text.contains("100 710 Td\n(1    Hammer    10    19.99    Tools) Tj"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_pdf_xref_offsets_point_at_objects() {
    let mut buf = Vec::new();
    write_pdf_to(&[view(1, "Hammer", 10, Some("Tools"))], &mut buf).unwrap();
    let text = String::from_utf8_lossy(&buf).into_owned();

    let xref_at: usize = text
        .rsplit("startxref\n")
        .next()
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert!(buf[xref_at..].starts_with(b"xref"));

    let table = String::from_utf8(buf[xref_at..].to_vec()).unwrap();
    let entries: Vec<usize> = table
        .lines()
        .skip(3)
        .take(5)
        .map(|l| l[..10].parse().unwrap())
        .collect();
    for (i, offset) in entries.iter().enumerate() {
        let expected = format!("{} 0 obj", i + 1);
        assert!(buf[*offset..].starts_with(expected.as_bytes()));
    }
}

#[test]
fn test_pdf_rows_step_down_the_page() {
    let rows = vec![view(1, "A", 1, None), view(2, "B", 2, None)];
    let mut buf = Vec::new();
    write_pdf_to(&rows, &mut buf).unwrap();
    let text = String::from_utf8_lossy(&buf);
    assert!(text.contains("100 710 Td\n(1    A    1    19.99    -) Tj"));
    assert!(text.contains("100 690 Td\n(2    B    2    19.99    -) Tj"));
}

#[test]
fn test_pdf_clips_rows_past_page_bottom() {
    let rows: Vec<ProductView> = (1..=50).map(|i| view(i, "Item", 1, None)).collect();
    let mut buf = Vec::new();
    let drawn = write_pdf_to(&rows, &mut buf).unwrap();
    assert_eq!(drawn, visible_rows());
    assert_eq!(drawn, 36);
    let text = String::from_utf8_lossy(&buf);
    assert!(text.contains("100 10 Td"));
    assert!(!text.contains("100 -10 Td"));
}

#[test]
fn test_pdf_written_to_file() {
    let db = stocked_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_PDF_PATH);
    assert_eq!(export_pdf(&db, &path).unwrap(), 3);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
}

#[test]
fn test_encode_text_escapes_and_maps() {
    assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
    assert_eq!(encode_text("Preço"), b"Pre\xE7o".to_vec());
    assert_eq!(encode_text("日本"), b"??".to_vec());
    assert_eq!(encode_text("a\nb"), b"a b".to_vec());
}

#[test]
fn test_row_line_format() {
    assert_eq!(
        row_line(&view(7, "Drill", 3, Some("Tools"))),
        "7    Drill    3    19.99    Tools"
    );
}
