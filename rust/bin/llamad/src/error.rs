use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Errors surfaced by the entity routes.
///
/// Rendered as a failed envelope:
///
/// ```json
/// {"success": false, "code": "NOT_FOUND", "error": "llamas 'abc' not found"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Record does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Payload is not a JSON object, or seed data repeats an id. HTTP 400.
    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "success": false,
            "code": self.error_code(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
