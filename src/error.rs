//! API error taxonomy.
//!
//! Every failure on the `/ocr` path maps to a JSON `{"error": "..."}` body
//! with a status that tells the client whose fault it was. Classification
//! itself never fails; errors come only from the surrounding upload and
//! engine plumbing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    MissingFile,
    #[error("No selected file")]
    EmptyFilename,
    #[error("Invalid file type. Only jpg, jpeg, and png allowed.")]
    UnsupportedType,
    #[error("Malformed multipart request: {0}")]
    BadMultipart(String),
    #[error("Could not decode uploaded image: {0}")]
    BadImage(String),
    #[error("Unknown recognition engine: {0}")]
    UnknownEngine(String),
    #[error("Recognition failed: {0}")]
    Recognition(anyhow::Error),
    #[error("Storage failed: {0}")]
    Storage(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::EmptyFilename
            | Self::UnsupportedType
            | Self::BadMultipart(_)
            | Self::UnknownEngine(_) => StatusCode::BAD_REQUEST,
            Self::BadImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Recognition(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
