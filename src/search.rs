use crate::db::Database;
use crate::error::CatalogResult;
use crate::models::ProductView;

/// Result of a product search. `NotFound` is kept apart from an empty
/// listing so the caller can tell the user nothing matched instead of
/// blanking the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// No term was given; the full listing.
    All(Vec<ProductView>),
    Matches(Vec<ProductView>),
    NotFound,
}

impl SearchOutcome {
    pub(crate) fn rows(&self) -> &[ProductView] {
        match self {
            Self::All(rows) | Self::Matches(rows) => rows,
            Self::NotFound => &[],
        }
    }

    pub(crate) fn into_rows(self) -> Vec<ProductView> {
        match self {
            Self::All(rows) | Self::Matches(rows) => rows,
            Self::NotFound => Vec::new(),
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Match products by exact id (when `term` is an integer) or by
/// case-sensitive substring of the name. Only a blank term is special; any
/// other term is matched as typed, surrounding spaces included.
pub(crate) fn search(db: &Database, term: &str) -> CatalogResult<SearchOutcome> {
    if term.trim().is_empty() {
        return Ok(SearchOutcome::All(db.list_products()?));
    }

    let id = term.parse::<i64>().ok();
    let rows = db.find_products(id, term)?;
    log::debug!("Search '{term}' matched {} products", rows.len());
    if rows.is_empty() {
        Ok(SearchOutcome::NotFound)
    } else {
        Ok(SearchOutcome::Matches(rows))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
