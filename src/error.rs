use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Recipe parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filesystem errors may leak absolute paths of the document root
    pub fn log_safe(&self) -> String {
        match self {
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Json(_) => "JSON serialization failed".to_string(),
            Error::Source(_) => "Document source unavailable".to_string(),
            Error::Parse(e) => format!("Recipe parsing error: {e}"),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Internal(msg) => format!("Internal error: {msg}"),
        }
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Parse(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_hides_paths() {
        let err = Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "/home/someone/dishes/secret.md",
        ));
        assert!(!err.log_safe().contains("/home"));
    }

    #[test]
    fn test_status_mapping() {
        let response = Error::NotFound("菜谱不存在".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::Validation("empty query".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
