//! Error responses.
//!
//! Storage failures of any kind become `500 {"message":"Database error"}`,
//! unmatched requests become `404 {"message":"Endpoint not found"}` and a
//! stats read past the request timeout becomes
//! `408 {"message":"Request timed out"}`. The underlying cause is logged,
//! never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StorageError;

pub const DATABASE_ERROR: &str = "Database error";
pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";
pub const REQUEST_TIMED_OUT: &str = "Request timed out";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("no endpoint for request")]
    NotFound,

    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::Storage(_) => DATABASE_ERROR,
            ApiError::NotFound => ENDPOINT_NOT_FOUND,
            ApiError::Timeout => REQUEST_TIMED_OUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_share_one_status() {
        let errors = [
            ApiError::Storage(StorageError::MissingCursor),
            ApiError::Storage(StorageError::UnknownColor("#000".into())),
            ApiError::Storage(StorageError::Poisoned),
        ];
        for err in errors {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.message(), DATABASE_ERROR);
        }
    }

    #[test]
    fn test_not_found() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_timeout() {
        let err = ApiError::Timeout;
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.message(), REQUEST_TIMED_OUT);
    }
}
