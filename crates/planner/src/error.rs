use catalog::{AlertId, CatalogError, SearchError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("no trip with id {0:?}")]
    UnknownTrip(String),
    #[error("no alert with id {0}")]
    UnknownAlert(AlertId),
}
