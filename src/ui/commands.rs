use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::error::{CatalogError, CatalogResult};
use crate::models::ProductForm;
use crate::report;
use crate::search::{search, SearchOutcome};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit StockTUI", cmd_quit, r);
    register_command!("quit", "Quit StockTUI", cmd_quit, r);
    register_command!("p", "Go to Products", cmd_products, r);
    register_command!("products", "Go to Products", cmd_products, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("add", "Add the product in the form", cmd_add, r);
    register_command!(
        "update",
        "Replace the product whose ID is in the form",
        cmd_update,
        r
    );
    register_command!("delete", "Delete selected product", cmd_delete, r);
    register_command!("delete-all", "Delete every product", cmd_delete_all, r);
    register_command!(
        "category",
        "Create category (e.g. :category Tools, default: form field)",
        cmd_category,
        r
    );
    register_command!(
        "csv",
        "Export products to CSV (e.g. :csv ~/stock.csv)",
        cmd_csv,
        r
    );
    register_command!(
        "pdf",
        "Write the PDF report (default: relatorio_produtos.pdf)",
        cmd_pdf,
        r
    );
    register_command!(
        "search",
        "Search by ID or name (e.g. :search Hammer)",
        cmd_search,
        r
    );
    register_command!("s", "Search by ID or name", cmd_search, r);
    register_command!("clear", "Clear the form", cmd_clear, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_products(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Products;
    if let Err(e) = app.refresh_products(db) {
        show_error(app, &e);
    }
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    if let Err(e) = app.refresh_categories(db) {
        show_error(app, &e);
    }
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    add_product(app, db);
    Ok(())
}

fn cmd_update(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    update_product(app, db);
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    request_delete(app);
    Ok(())
}

fn cmd_delete_all(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    request_delete_all(app);
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let name = if args.is_empty() {
        app.form.category.clone()
    } else {
        args.to_string()
    };
    add_category(&name, app, db);
    Ok(())
}

fn cmd_csv(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = (!args.is_empty()).then(|| PathBuf::from(crate::run::shellexpand(args)));
    export_csv(path.as_deref(), app, db);
    Ok(())
}

fn cmd_pdf(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        PathBuf::from(report::DEFAULT_PDF_PATH)
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };
    export_pdf(&path, app, db);
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    run_search(args, app, db);
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    clear_form(app);
    Ok(())
}

// ── Actions ──────────────────────────────────────────────────
//
// Every catalog failure ends up in an "Error" notice; none of them stop
// the event loop.

fn show_error(app: &mut App, err: &CatalogError) {
    log::warn!("{err}");
    app.notify("Error", err.to_string());
}

fn report_outcome(app: &mut App, outcome: CatalogResult<String>) {
    match outcome {
        Ok(msg) => app.notify("Success", msg),
        Err(e) => show_error(app, &e),
    }
}

pub(crate) fn add_product(app: &mut App, db: &mut Database) {
    let outcome = try_add_product(app, db);
    report_outcome(app, outcome);
}

fn try_add_product(app: &mut App, db: &mut Database) -> CatalogResult<String> {
    let product = app.form.to_new_product()?;
    db.add_product(&product)?;
    app.refresh_products(db)?;
    app.form.clear();
    Ok("Product added successfully.".into())
}

pub(crate) fn update_product(app: &mut App, db: &mut Database) {
    let outcome = try_update_product(app, db);
    report_outcome(app, outcome);
}

fn try_update_product(app: &mut App, db: &mut Database) -> CatalogResult<String> {
    let id = app.form.parse_id()?;
    let product = app.form.to_new_product()?;
    db.update_product(id, &product)?;
    app.refresh_products(db)?;
    app.form.clear();
    Ok("Product updated successfully.".into())
}

/// Ask before deleting the product under the cursor.
pub(crate) fn request_delete(app: &mut App) {
    let Some(product) = app.selected_product() else {
        show_error(
            app,
            &CatalogError::NothingSelected("Please select a product to delete.".into()),
        );
        return;
    };
    let (id, name) = (product.id, product.name.clone());
    app.confirm_message = format!("Delete product {id} '{name}'?");
    app.pending_action = Some(PendingAction::DeleteProduct { id, name });
    app.input_mode = InputMode::Confirm;
}

pub(crate) fn request_delete_all(app: &mut App) {
    app.confirm_message = format!("Delete all {} products?", app.product_count);
    app.pending_action = Some(PendingAction::DeleteAll);
    app.input_mode = InputMode::Confirm;
}

/// Carry out the action the user just confirmed.
pub(crate) fn confirm_pending(app: &mut App, db: &mut Database) {
    let Some(action) = app.pending_action.take() else {
        return;
    };
    let outcome = match action {
        PendingAction::DeleteProduct { id, .. } => db
            .delete_product(id)
            .and_then(|()| app.refresh_products(db))
            .map(|()| "Product deleted successfully.".to_string()),
        PendingAction::DeleteAll => db
            .delete_all_products()
            .and_then(|()| app.refresh_products(db))
            .map(|()| "All products have been deleted.".to_string()),
    };
    report_outcome(app, outcome);
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.pending_action = None;
    app.set_status("Cancelled");
}

pub(crate) fn add_category(name: &str, app: &mut App, db: &mut Database) {
    let outcome = db
        .add_category(name)
        .and_then(|_| app.refresh_categories(db))
        .map(|()| "Category added successfully.".to_string());
    report_outcome(app, outcome);
}

/// Filter the product table. An empty term shows everything again; a term
/// with no matches leaves the table as it was.
pub(crate) fn run_search(term: &str, app: &mut App, db: &mut Database) {
    app.search_input = term.trim().to_string();
    let outcome = match search(db, term) {
        Ok(outcome) => outcome,
        Err(e) => return show_error(app, &e),
    };

    if outcome.is_not_found() {
        app.notify("Search Result", "No products found.");
        return;
    }

    app.screen = Screen::Products;
    app.product_index = 0;
    app.product_scroll = 0;
    match outcome {
        SearchOutcome::Matches(rows) => {
            app.set_status(format!("{} matching '{}'", rows.len(), app.search_input));
            app.active_search = Some(app.search_input.clone());
            app.show_products(rows);
        }
        other => {
            app.set_status("Search cleared");
            app.active_search = None;
            app.show_products(other.into_rows());
        }
    }
}

pub(crate) fn export_csv(path: Option<&Path>, app: &mut App, db: &mut Database) {
    match report::export_csv(db, path) {
        Ok(Some(_)) => app.notify("Success", "CSV file generated successfully."),
        Ok(None) => app.set_status("No file given; CSV not written. Usage: :csv <path>"),
        Err(e) => show_error(app, &e),
    }
}

pub(crate) fn export_pdf(path: &Path, app: &mut App, db: &mut Database) {
    match report::export_pdf(db, path) {
        Ok(drawn) => {
            let mut msg = String::from("PDF report generated successfully.");
            let total = usize::try_from(app.product_count).unwrap_or(0);
            if drawn < total {
                msg.push_str(&format!(" Only {drawn} of {total} products fit on the page."));
            }
            app.set_status(format!("Wrote {}", path.display()));
            app.notify("Success", msg);
        }
        Err(e) => show_error(app, &e),
    }
}

/// Copy the row under the cursor into the form, re-read from the store so
/// the form never starts from a stale row.
pub(crate) fn load_selected(app: &mut App, db: &Database) {
    let Some(id) = app.selected_product().map(|p| p.id) else {
        return;
    };
    match db.get_product(id) {
        Ok(Some(product)) => {
            app.form = ProductForm::from_view(&product);
            app.set_status(format!("Loaded product {id} into the form"));
        }
        Ok(None) => show_error(
            app,
            &CatalogError::NothingSelected(format!("Product {id} no longer exists.")),
        ),
        Err(e) => show_error(app, &e),
    }
}

pub(crate) fn clear_form(app: &mut App) {
    app.form.clear();
    app.form_field = 0;
    app.set_status("Form cleared");
}
