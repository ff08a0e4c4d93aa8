use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::models::{NewProduct, ProductView};
use crate::report;
use crate::search::search;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(args, db, &mut out)
}

pub(crate) fn run_command(args: &[String], db: &mut Database, out: &mut dyn Write) -> Result<()> {
    if let Some(msg) = db.schema_error() {
        writeln!(out, "Warning: {msg}")?;
    }

    match args[1].as_str() {
        "list" | "ls" => cli_list(db, out),
        "search" | "s" => cli_search(&args[2..], db, out),
        "categories" => cli_categories(db, out),
        "add-category" => cli_add_category(&args[2..], db, out),
        "add" => cli_add(&args[2..], db, out),
        "update" => cli_update(&args[2..], db, out),
        "delete" => cli_delete(&args[2..], db, out),
        "delete-all" => cli_delete_all(db, out),
        "export-csv" => cli_export_csv(&args[2..], db, out),
        "export-pdf" => cli_export_pdf(&args[2..], db, out),
        "--help" | "-h" | "help" => {
            print_usage(out)?;
            Ok(())
        }
        "--version" | "-V" | "version" => {
            writeln!(out, "stocktui {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "StockTUI — local-only inventory manager")?;
    writeln!(out)?;
    writeln!(out, "Usage: stocktui [--db <path>] [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                                Launch interactive TUI")?;
    writeln!(out, "  list                                  List all products")?;
    writeln!(out, "  search <term>                         Search by ID or name")?;
    writeln!(out, "  categories                            List all categories")?;
    writeln!(out, "  add-category <name>                   Create a category")?;
    writeln!(out, "  add <name> <qty> <price> <category>   Add a product")?;
    writeln!(out, "  update <id> <name> <qty> <price> <category>")?;
    writeln!(out, "                                        Replace a product")?;
    writeln!(out, "  delete <id>                           Delete a product")?;
    writeln!(out, "  delete-all                            Delete every product")?;
    writeln!(out, "  export-csv <file.csv>                 Export products to CSV")?;
    writeln!(
        out,
        "  export-pdf [file.pdf]                 Write the PDF report (default: {})",
        report::DEFAULT_PDF_PATH
    )?;
    writeln!(out, "  --help, -h                            Show this help")?;
    writeln!(out, "  --version, -V                         Show version")?;
    writeln!(out)?;
    writeln!(
        out,
        "The database defaults to the user data directory; override it with --db or ${}.",
        crate::config::DB_ENV_VAR
    )?;
    Ok(())
}

fn cli_list(db: &Database, out: &mut dyn Write) -> Result<()> {
    let products = db.list_products()?;
    if products.is_empty() {
        writeln!(out, "No products")?;
        return Ok(());
    }
    print_products(&products, out)
}

fn cli_search(args: &[String], db: &Database, out: &mut dyn Write) -> Result<()> {
    let term = args.join(" ");
    let outcome = search(db, &term)?;
    if outcome.is_not_found() {
        writeln!(out, "No products found.")?;
    } else if outcome.rows().is_empty() {
        writeln!(out, "No products")?;
    } else {
        print_products(outcome.rows(), out)?;
    }
    Ok(())
}

fn cli_categories(db: &Database, out: &mut dyn Write) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }
    writeln!(out, "{:<4} Name", "ID")?;
    writeln!(out, "{}", "─".repeat(30))?;
    for cat in &categories {
        writeln!(out, "{:<4} {}", cat.id.unwrap_or(0), cat.name)?;
    }
    Ok(())
}

fn cli_add_category(args: &[String], db: &mut Database, out: &mut dyn Write) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: stocktui add-category <name>");
    }
    let name = args.join(" ");
    let id = db.add_category(&name)?;
    writeln!(out, "Added category '{}' (id {id})", name.trim())?;
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database, out: &mut dyn Write) -> Result<()> {
    let [name, qty, price, category] = args else {
        anyhow::bail!("Usage: stocktui add <name> <qty> <price> <category>");
    };
    let product = NewProduct::parse(name, qty, price, category)?;
    let id = db.add_product(&product)?;
    writeln!(out, "Added product '{}' (id {id})", product.name)?;
    Ok(())
}

fn cli_update(args: &[String], db: &mut Database, out: &mut dyn Write) -> Result<()> {
    let [id, name, qty, price, category] = args else {
        anyhow::bail!("Usage: stocktui update <id> <name> <qty> <price> <category>");
    };
    let id = parse_id(id)?;
    let product = NewProduct::parse(name, qty, price, category)?;
    db.update_product(id, &product)?;
    writeln!(out, "Updated product {id}")?;
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database, out: &mut dyn Write) -> Result<()> {
    let [id] = args else {
        anyhow::bail!("Usage: stocktui delete <id>");
    };
    let id = parse_id(id)?;
    db.delete_product(id)?;
    writeln!(out, "Deleted product {id}")?;
    Ok(())
}

fn cli_delete_all(db: &mut Database, out: &mut dyn Write) -> Result<()> {
    db.delete_all_products()?;
    writeln!(out, "All products deleted")?;
    Ok(())
}

fn cli_export_csv(args: &[String], db: &Database, out: &mut dyn Write) -> Result<()> {
    let Some(arg) = args.first() else {
        writeln!(out, "No output file given; nothing exported")?;
        return Ok(());
    };
    let path = PathBuf::from(super::shellexpand(arg));
    if let Some(count) = report::export_csv(db, Some(&path))? {
        writeln!(out, "Exported {count} products to {}", path.display())?;
    }
    Ok(())
}

fn cli_export_pdf(args: &[String], db: &Database, out: &mut dyn Write) -> Result<()> {
    let path = args
        .first()
        .map(|a| super::shellexpand(a))
        .unwrap_or_else(|| report::DEFAULT_PDF_PATH.to_string());
    let drawn = report::export_pdf(db, Path::new(&path))?;
    writeln!(out, "Wrote PDF report with {drawn} products to {path}")?;
    Ok(())
}

fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .with_context(|| format!("Invalid product ID: {s}"))
}

fn print_products(products: &[ProductView], out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{:<5} {:<24} {:>8} {:>10}  Category",
        "ID", "Name", "Qty", "Price"
    )?;
    writeln!(out, "{}", "─".repeat(62))?;
    for p in products {
        writeln!(
            out,
            "{:<5} {:<24} {:>8} {:>10}  {}",
            p.id,
            p.name,
            p.quantity,
            format!("{:.2}", p.price),
            p.category_or("-"),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
