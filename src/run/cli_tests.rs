#![allow(clippy::unwrap_used)]

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("stocktui")
        .chain(list.iter().copied())
        .map(String::from)
        .collect()
}

fn run(db: &mut Database, list: &[&str]) -> Result<String> {
    let mut out = Vec::new();
    run_command(&args(list), db, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn seeded() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    db.add_category("Tools").unwrap();
    db.add_product(&NewProduct::new("Hammer", 10, rust_decimal_macros::dec!(19.99), "Tools"))
        .unwrap();
    db
}

#[test]
fn test_list_empty() {
    let mut db = Database::open_in_memory().unwrap();
    assert_eq!(run(&mut db, &["list"]).unwrap(), "No products\n");
}

#[test]
fn test_list_prints_rows() {
    let mut db = seeded();
    let out = run(&mut db, &["list"]).unwrap();
    assert!(out.contains("Hammer"));
    assert!(out.contains("19.99"));
    assert!(out.contains("Tools"));
}

#[test]
fn test_add_category_then_product() {
    let mut db = Database::open_in_memory().unwrap();
    let out = run(&mut db, &["add-category", "Garden"]).unwrap();
    assert!(out.starts_with("Added category 'Garden'"));

    let out = run(&mut db, &["add", "Rake", "3", "$1,024.50", "Garden"]).unwrap();
    assert!(out.starts_with("Added product 'Rake'"));

    let rows = db.list_products().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price, rust_decimal_macros::dec!(1024.50));
}

#[test]
fn test_add_unknown_category_fails() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["add", "Rake", "3", "9.99", "Garden"]).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(db.list_products().unwrap().is_empty());
}

#[test]
fn test_add_wrong_arity_fails() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["add", "Rake", "3"]).unwrap_err();
    assert!(err.to_string().starts_with("Usage:"));
}

#[test]
fn test_update_and_delete() {
    let mut db = seeded();
    run(&mut db, &["update", "1", "Mallet", "4", "12", "Tools"]).unwrap();
    let row = db.get_product(1).unwrap().unwrap();
    assert_eq!(row.name, "Mallet");
    assert_eq!(row.quantity, 4);

    run(&mut db, &["delete", "1"]).unwrap();
    assert!(db.list_products().unwrap().is_empty());
}

#[test]
fn test_delete_bad_id() {
    let mut db = seeded();
    let err = run(&mut db, &["delete", "one"]).unwrap_err();
    assert!(err.to_string().contains("Invalid product ID"));
    assert_eq!(db.product_count().unwrap(), 1);
}

#[test]
fn test_delete_all_keeps_categories() {
    let mut db = seeded();
    run(&mut db, &["delete-all"]).unwrap();
    assert!(db.list_products().unwrap().is_empty());
    let out = run(&mut db, &["categories"]).unwrap();
    assert!(out.contains("Tools"));
}

#[test]
fn test_search_outcomes() {
    let mut db = seeded();
    assert!(run(&mut db, &["search", "Ham"]).unwrap().contains("Hammer"));
    assert_eq!(run(&mut db, &["search", "42"]).unwrap(), "No products found.\n");
    assert!(run(&mut db, &["search"]).unwrap().contains("Hammer"));
}

#[test]
fn test_export_csv() {
    let mut db = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let out = run(&mut db, &["export-csv", path.to_str().unwrap()]).unwrap();
    assert!(out.starts_with("Exported 1 products"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "1,Hammer,10,19.99,Tools\n"
    );
}

#[test]
fn test_export_csv_without_path_writes_nothing() {
    let mut db = seeded();
    let out = run(&mut db, &["export-csv"]).unwrap();
    assert!(out.contains("nothing exported"));
}

#[test]
fn test_export_pdf_to_path() {
    let mut db = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    run(&mut db, &["export-pdf", path.to_str().unwrap()]).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
}

#[test]
fn test_unknown_command() {
    let mut db = Database::open_in_memory().unwrap();
    let mut out = Vec::new();
    let err = run_command(&args(&["frobnicate"]), &mut db, &mut out).unwrap_err();
    assert_eq!(err.to_string(), "Unknown command: frobnicate");
    assert!(String::from_utf8(out).unwrap().contains("Usage:"));
}

#[test]
fn test_version() {
    let mut db = Database::open_in_memory().unwrap();
    let out = run(&mut db, &["--version"]).unwrap();
    assert!(out.starts_with("stocktui "));
}

#[test]
fn test_schema_failure_prints_warning_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE t(a); CREATE INDEX categorias ON t(a);")
        .unwrap();
    let mut db = Database::open(&path).unwrap();

    let mut out = Vec::new();
    let err = run_command(&args(&["categories"]), &mut db, &mut out).unwrap_err();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Warning: Failed to create tables:"), "{out}");
    assert!(err.to_string().contains("categorias"), "{err}");
}
