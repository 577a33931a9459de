// Request-level error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::storage::StoreError;

pub const MISSING_BUCKET_MESSAGE: &str =
    "Empty bucket provided, expecting '?bucket=your-bucket-name'";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Empty bucket provided, expecting '?bucket=your-bucket-name'")]
    MissingBucket,

    #[error("Client error setup: {0}")]
    ClientSetup(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingBucket => StatusCode::BAD_REQUEST,
            AppError::ClientSetup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Client(msg) => AppError::ClientSetup(msg),
            e @ StoreError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e => AppError::Upstream(e.to_string()),
        }
    }
}

// Upstream failures answer with an empty body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::MissingBucket | AppError::ClientSetup(_) => {
                (status, self.to_string()).into_response()
            }
            AppError::NotFound(_) | AppError::Upstream(_) => status.into_response(),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
