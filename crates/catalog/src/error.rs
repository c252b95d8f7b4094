use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("IATA codes must be exactly three letters, got {0:?}")]
    InvalidIata(String),
    #[error("prices must be greater than zero")]
    NonPositivePrice,
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("catalog data corrupt: {0}")]
    Corrupt(String),
}
