use std::io::Write;
use std::path::Path;

use crate::error::CatalogResult;
use crate::models::ProductView;

/// Export the listing as CSV: one line per product, columns
/// `id,name,quantity,price,category`, no header. Fields are only quoted when
/// they contain a delimiter, quote or newline. A missing category is an
/// empty field.
///
/// With no `path` nothing is written and `Ok(None)` is returned.
pub(crate) fn write_csv(rows: &[ProductView], path: Option<&Path>) -> CatalogResult<Option<usize>> {
    let Some(path) = path else {
        log::info!("CSV export skipped: no output path");
        return Ok(None);
    };
    let file = std::fs::File::create(path)?;
    let count = write_csv_to(rows, file)?;
    log::info!("Exported {count} products to {}", path.display());
    Ok(Some(count))
}

pub(crate) fn write_csv_to<W: Write>(rows: &[ProductView], out: W) -> CatalogResult<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    for product in rows {
        wtr.write_record([
            product.id.to_string(),
            product.name.clone(),
            product.quantity.to_string(),
            product.price.to_string(),
            product.category.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
