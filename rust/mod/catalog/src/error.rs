use llama_client::ApiError;
use thiserror::Error;

use crate::form::FormField;
use crate::state::Phase;

/// Form input that cannot be submitted or applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields left blank. Listed in form order.
    #[error("missing required field(s): {}", list_fields(.0))]
    MissingFields(Vec<FormField>),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: FormField, min: u32, max: u32 },

    #[error("{field}: {reason}")]
    Invalid { field: FormField, reason: String },
}

fn list_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure of a catalog operation.
///
/// The catalog itself recovers from every variant (state returns to
/// `Ready`); the error is reported so callers can tell what happened.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("cannot {request} while {phase}")]
    InvalidTransition { phase: Phase, request: &'static str },

    #[error("llama '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
