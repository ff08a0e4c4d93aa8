mod csv_report;
mod pdf_report;

use std::path::Path;

use crate::db::Database;
use crate::error::CatalogResult;

use csv_report::write_csv;
use pdf_report::write_pdf;

pub(crate) use pdf_report::DEFAULT_PDF_PATH;

/// Export the current listing to CSV. `None` means the user chose no file.
pub(crate) fn export_csv(db: &Database, path: Option<&Path>) -> CatalogResult<Option<usize>> {
    if path.is_none() {
        return Ok(None);
    }
    let rows = db.list_products()?;
    write_csv(&rows, path)
}

/// Export the current listing to the single-page PDF report.
pub(crate) fn export_pdf(db: &Database, path: &Path) -> CatalogResult<usize> {
    let rows = db.list_products()?;
    write_pdf(&rows, path)
}

#[cfg(test)]
mod tests;
