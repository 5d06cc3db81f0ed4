//! JSON error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use formgen_core::Error;
use serde_json::json;

/// An API failure rendered as `{"error": ...}` with a matching status
#[derive(Debug)]
pub enum ApiError {
    /// The generation round trip failed
    Generation(Error),
    /// The request body was not a usable JSON document
    Body(JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Generation(Error::EmptyQuery) => StatusCode::BAD_REQUEST,
            ApiError::Generation(Error::MalformedOutput(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Generation(Error::Transport(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Generation(Error::GenerationInProgress) => StatusCode::CONFLICT,
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Generation(e) => e.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Generation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
