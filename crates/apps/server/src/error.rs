use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::{CatalogError, SearchError};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("provider task failed: {0}")]
    Provider(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Catalog(CatalogError::Corrupt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Catalog(_) => StatusCode::BAD_REQUEST,
            ApiError::Search(SearchError::MissingParameters) => StatusCode::BAD_REQUEST,
            ApiError::Search(SearchError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        api_error(self.status(), self.to_string()).into_response()
    }
}
