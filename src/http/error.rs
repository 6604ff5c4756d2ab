//! Mapping from crate errors to `{error}` responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::types::{Envelope, ErrorBody};
use crate::error::Error;

pub const NOT_FOUND_MESSAGE: &str = "Student not found";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => Self::not_found(NOT_FOUND_MESSAGE),
            Error::Validation { message } => Self::bad_request(message),
            other => {
                // Detail stays in the log; callers only see the generic message.
                tracing::error!(error = %other, "request failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            ),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

pub fn ok<T: Serialize>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: message.to_string(),
        data,
    })
}
