mod schema;

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CatalogError, CatalogResult};
use crate::models::*;

const PRODUCT_VIEW_SELECT: &str = "
    SELECT p.id, p.nome, p.quantidade, CAST(p.preco AS TEXT), c.nome
    FROM produtos p
    LEFT JOIN categorias c ON p.categoria_id = c.id";

/// The catalog store. Owns the one SQLite connection for the process; every
/// screen, command and report borrows it.
pub(crate) struct Database {
    conn: Connection,
    schema_error: Option<String>,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        log::info!("Opened database at {}", path.display());
        Ok(Self::init(conn))
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self::init(conn))
    }

    /// A schema failure does not stop the store from opening; it is kept so
    /// the UI can report it, and later statements fail on their own.
    fn init(conn: Connection) -> Self {
        let schema_error = match schema::ensure_schema(&conn) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to create tables: {e}");
                Some(format!("Failed to create tables: {e}"))
            }
        };
        Self { conn, schema_error }
    }

    pub(crate) fn schema_error(&self) -> Option<&str> {
        self.schema_error.as_deref()
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, name: &str) -> CatalogResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::validation("Please fill in the category field."));
        }

        let tx = self.conn.transaction()?;
        match tx.execute("INSERT INTO categorias (nome) VALUES (?1)", params![name]) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                log::warn!("Rejected duplicate category '{name}'");
                return Err(CatalogError::DuplicateCategory(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;
        log::info!("Added category '{name}' (id {id})");
        Ok(id)
    }

    pub(crate) fn get_categories(&self) -> CatalogResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, nome FROM categorias ORDER BY nome")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Exact-match lookup of a category id by name.
    pub(crate) fn resolve_category(&self, name: &str) -> CatalogResult<i64> {
        resolve_category_in(&self.conn, name)
    }

    // ── Products ──────────────────────────────────────────────

    pub(crate) fn add_product(&mut self, product: &NewProduct) -> CatalogResult<i64> {
        product.validate()?;

        let tx = self.conn.transaction()?;
        let category_id = resolve_category_in(&tx, &product.category)?;
        tx.execute(
            "INSERT INTO produtos (nome, quantidade, preco, categoria_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                product.name,
                product.quantity,
                product.price.to_string(),
                category_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        log::info!("Added product '{}' (id {id})", product.name);
        Ok(id)
    }

    /// Replaces every column of product `id`. An id that matches nothing is
    /// not an error.
    pub(crate) fn update_product(&mut self, id: i64, product: &NewProduct) -> CatalogResult<()> {
        product.validate()?;

        let tx = self.conn.transaction()?;
        let category_id = resolve_category_in(&tx, &product.category)?;
        let changed = tx.execute(
            "UPDATE produtos
             SET nome = ?1, quantidade = ?2, preco = ?3, categoria_id = ?4
             WHERE id = ?5",
            params![
                product.name,
                product.quantity,
                product.price.to_string(),
                category_id,
                id,
            ],
        )?;
        tx.commit()?;
        if changed == 0 {
            log::debug!("Update matched no product with id {id}");
        } else {
            log::info!("Updated product {id}");
        }
        Ok(())
    }

    pub(crate) fn delete_product(&mut self, id: i64) -> CatalogResult<()> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM produtos WHERE id = ?1", params![id])?;
        tx.commit()?;
        log::info!("Deleted product {id} ({removed} row(s))");
        Ok(())
    }

    pub(crate) fn delete_all_products(&mut self) -> CatalogResult<()> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM produtos", [])?;
        tx.commit()?;
        log::info!("Deleted all products ({removed} row(s))");
        Ok(())
    }

    pub(crate) fn list_products(&self) -> CatalogResult<Vec<ProductView>> {
        let sql = format!("{PRODUCT_VIEW_SELECT} ORDER BY p.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_product_view)?;
        let products = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        log::debug!("Listed {} products", products.len());
        Ok(products)
    }

    /// Products whose id equals `id` or whose name contains `fragment`
    /// (case-sensitive).
    pub(crate) fn find_products(
        &self,
        id: Option<i64>,
        fragment: &str,
    ) -> CatalogResult<Vec<ProductView>> {
        let sql = format!(
            "{PRODUCT_VIEW_SELECT}
             WHERE p.id = ?1 OR instr(p.nome, ?2) > 0
             ORDER BY p.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![id, fragment], map_product_view)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_product(&self, id: i64) -> CatalogResult<Option<ProductView>> {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], map_product_view)
            .optional()?)
    }

    pub(crate) fn product_count(&self) -> CatalogResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM produtos", [], |row| row.get(0))?)
    }
}

fn resolve_category_in(conn: &Connection, name: &str) -> CatalogResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::validation("Please fill in the category field."));
    }
    conn.query_row(
        "SELECT id FROM categorias WHERE nome = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| CatalogError::UnknownCategory(name.to_string()))
}

fn map_product_view(row: &rusqlite::Row) -> rusqlite::Result<ProductView> {
    let price_str: String = row.get(3)?;
    Ok(ProductView {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        price: parse_stored_price(&price_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        category: row.get(4)?,
    })
}

/// SQLite renders large or tiny REALs in exponent form. Text another tool
/// wrote into `preco` is an error, not a zero price.
fn parse_stored_price(s: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))
}
