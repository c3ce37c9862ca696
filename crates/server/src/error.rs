use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rolodex_core::DomainError;
use rolodex_db::repositories::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";
pub const ADDRESS_NOT_FOUND: &str = "Address not found";
pub const PHONE_NUMBER_TAKEN: &str = "A customer with this phone number already exists";
const STORE_FAILURE: &str = "an internal storage error occurred";

/// Failure of an API request. Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("storage failure: {0}")]
    Store(#[source] RepositoryError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Store(source) => {
                error!(
                    event_name = "api.store.error",
                    error = %source,
                    "storage operation failed"
                );
                STORE_FAILURE.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            // phoneNumber is the only unique column and customer_id the only foreign key.
            RepositoryError::UniqueViolation(_) => Self::Conflict(PHONE_NUMBER_TAKEN),
            RepositoryError::MissingReference(_) => Self::NotFound(CUSTOMER_NOT_FOUND),
            other => Self::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
