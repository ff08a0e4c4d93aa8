#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::*;
use crate::db::Database;
use crate::models::{NewProduct, ProductForm};

fn setup() -> (App, Database) {
    let mut db = Database::open_in_memory().unwrap();
    db.add_category("Tools").unwrap();
    db.add_product(&NewProduct::new("Hammer", 10, dec!(19.99), "Tools"))
        .unwrap();
    db.add_product(&NewProduct::new("Wrench", 0, dec!(7.25), "Tools"))
        .unwrap();
    let mut app = App::new();
    app.refresh_all(&db).unwrap();
    (app, db)
}

fn notice(app: &App) -> (String, String) {
    let n = app.notice.clone().unwrap();
    (n.title, n.message)
}

// ── Registry ──────────────────────────────────────────────────

#[test]
fn test_registry_has_core_commands() {
    for name in [
        "add",
        "update",
        "delete",
        "delete-all",
        "category",
        "csv",
        "pdf",
        "search",
        "clear",
        "products",
        "categories",
        "help",
        "quit",
    ] {
        assert!(COMMANDS.contains_key(name), "missing :{name}");
    }
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut db) = setup();
    handle_command("serch Hammer", &mut app, &mut db).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :serch. Did you mean :search?"
    );
}

#[test]
fn test_quit_and_help() {
    let (mut app, mut db) = setup();
    handle_command("help", &mut app, &mut db).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app, &mut db).unwrap();
    assert!(!app.running);
}

// ── Product actions ───────────────────────────────────────────

#[test]
fn test_add_command_uses_form() {
    let (mut app, mut db) = setup();
    app.form = ProductForm {
        name: "Saw".into(),
        quantity: "3".into(),
        price: "$1,250".into(),
        category: "Tools".into(),
        ..ProductForm::default()
    };
    handle_command("add", &mut app, &mut db).unwrap();
    assert_eq!(notice(&app).0, "Success");
    assert_eq!(app.products.len(), 3);
    assert_eq!(app.products[2].price, dec!(1250));
    assert_eq!(app.product_count, 3);
}

#[test]
fn test_add_negative_quantity_rejected() {
    let (mut app, mut db) = setup();
    app.form = ProductForm {
        name: "Saw".into(),
        quantity: "-1".into(),
        price: "5".into(),
        category: "Tools".into(),
        ..ProductForm::default()
    };
    add_product(&mut app, &mut db);
    assert_eq!(notice(&app).0, "Error");
    assert_eq!(db.product_count().unwrap(), 2);
}

#[test]
fn test_update_requires_id() {
    let (mut app, mut db) = setup();
    app.form = ProductForm {
        name: "Saw".into(),
        quantity: "3".into(),
        price: "5".into(),
        category: "Tools".into(),
        ..ProductForm::default()
    };
    update_product(&mut app, &mut db);
    assert_eq!(
        notice(&app),
        ("Error".to_string(), "Please fill in all fields.".to_string())
    );
}

#[test]
fn test_update_missing_id_is_silent_success() {
    let (mut app, mut db) = setup();
    app.form = ProductForm {
        id: "99".into(),
        name: "Ghost".into(),
        quantity: "1".into(),
        price: "1".into(),
        category: "Tools".into(),
    };
    update_product(&mut app, &mut db);
    assert_eq!(notice(&app).0, "Success");
    let names: Vec<_> = db.list_products().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Hammer", "Wrench"]);
}

#[test]
fn test_delete_command_goes_through_confirm() {
    let (mut app, mut db) = setup();
    app.product_index = 1;
    handle_command("delete", &mut app, &mut db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteProduct {
            id: 2,
            name: "Wrench".into()
        })
    );

    confirm_pending(&mut app, &mut db);
    assert_eq!(app.products.len(), 1);
    assert_eq!(app.product_index, 0);
    assert_eq!(notice(&app).1, "Product deleted successfully.");
}

#[test]
fn test_delete_all_then_confirm() {
    let (mut app, mut db) = setup();
    request_delete_all(&mut app);
    confirm_pending(&mut app, &mut db);
    assert!(app.products.is_empty());
    assert_eq!(app.product_count, 0);
    assert_eq!(notice(&app).1, "All products have been deleted.");
}

#[test]
fn test_confirm_without_pending_is_noop() {
    let (mut app, mut db) = setup();
    confirm_pending(&mut app, &mut db);
    assert!(app.notice.is_none());
    assert_eq!(db.product_count().unwrap(), 2);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_command_with_argument() {
    let (mut app, mut db) = setup();
    handle_command("category Paint & Supplies", &mut app, &mut db).unwrap();
    assert_eq!(notice(&app).1, "Category added successfully.");
    assert!(app.categories.iter().any(|c| c.name == "Paint & Supplies"));
}

#[test]
fn test_category_command_empty_form_field() {
    let (mut app, mut db) = setup();
    handle_command("category", &mut app, &mut db).unwrap();
    assert_eq!(
        notice(&app),
        (
            "Error".to_string(),
            "Please fill in the category field.".to_string()
        )
    );
}

// ── Search ────────────────────────────────────────────────────

#[test]
fn test_search_by_id() {
    let (mut app, mut db) = setup();
    handle_command("search 2", &mut app, &mut db).unwrap();
    assert_eq!(app.products.len(), 1);
    assert_eq!(app.products[0].name, "Wrench");
    assert_eq!(app.active_search.as_deref(), Some("2"));
}

#[test]
fn test_search_from_categories_switches_screen() {
    let (mut app, mut db) = setup();
    app.screen = Screen::Categories;
    run_search("Ham", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Products);
    assert_eq!(app.products.len(), 1);
}

#[test]
fn test_search_case_sensitive_not_found() {
    let (mut app, mut db) = setup();
    run_search("hammer", &mut app, &mut db);
    assert_eq!(
        notice(&app),
        ("Search Result".to_string(), "No products found.".to_string())
    );
    assert_eq!(app.products.len(), 2);
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn test_csv_command_writes_file() {
    let (mut app, mut db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    handle_command(&format!("csv {}", path.display()), &mut app, &mut db).unwrap();
    assert_eq!(notice(&app).1, "CSV file generated successfully.");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "1,Hammer,10,19.99,Tools\n2,Wrench,0,7.25,Tools\n"
    );
}

#[test]
fn test_csv_without_path_is_not_an_error() {
    let (mut app, mut db) = setup();
    handle_command("csv", &mut app, &mut db).unwrap();
    assert!(app.notice.is_none());
    assert!(app.status_message.starts_with("No file given"));
}

#[test]
fn test_csv_bad_path_shows_error() {
    let (mut app, mut db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("stock.csv");
    export_csv(Some(&path), &mut app, &mut db);
    assert_eq!(notice(&app).0, "Error");
}

#[test]
fn test_pdf_command_with_path() {
    let (mut app, mut db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    handle_command(&format!("pdf {}", path.display()), &mut app, &mut db).unwrap();
    assert_eq!(notice(&app).1, "PDF report generated successfully.");
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

// ── Form ──────────────────────────────────────────────────────

#[test]
fn test_load_selected_and_clear() {
    let (mut app, mut db) = setup();
    load_selected(&mut app, &db);
    assert_eq!(app.form.id, "1");
    assert_eq!(app.form.category, "Tools");

    handle_command("clear", &mut app, &mut db).unwrap();
    assert_eq!(app.form, ProductForm::default());
    assert_eq!(app.status_message, "Form cleared");
}

#[test]
fn test_load_selected_row_deleted_elsewhere() {
    let (mut app, mut db) = setup();
    db.delete_product(1).unwrap();
    load_selected(&mut app, &db);
    assert_eq!(
        notice(&app),
        ("Error".to_string(), "Product 1 no longer exists.".to_string())
    );
    assert_eq!(app.form, ProductForm::default());
}
