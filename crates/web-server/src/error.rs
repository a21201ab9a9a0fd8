use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ingest error: {0}")]
    Ingest(#[from] ingest::IngestError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid API key")]
    Unauthorized,
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Ingest(err) => {
                tracing::error!(error = ?err, "Failed to read the CSV source.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read the data source".to_string(),
                )
            }
            AppError::Io(err) => {
                tracing::error!(error = ?err, "I/O error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal I/O error occurred".to_string(),
                )
            }
            AppError::Multipart(err) => {
                (StatusCode::BAD_REQUEST, format!("Invalid upload: {}", err))
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Invalid API key".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
