use thiserror::Error;

/// Failures surfaced by the catalog store, the search service and the
/// report generators. The UI turns every variant into a notice; none of
/// them end the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CatalogError {
    /// A required field is missing, blank or not a valid number.
    #[error("{0}")]
    Validation(String),

    #[error("Category '{0}' does not exist. Add the category first.")]
    UnknownCategory(String),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    /// Anything the database or filesystem rejected.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An action needs a selected row and none is selected.
    #[error("{0}")]
    NothingSelected(String),
}

impl CatalogError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn storage(msg: impl std::fmt::Display) -> Self {
        Self::Storage(msg.to_string())
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        Self::storage(e)
    }
}

pub(crate) type CatalogResult<T> = std::result::Result<T, CatalogError>;
