//! `llamad`: in-memory entity collection server.
//!
//! Serves any number of named collections under `/entities/{collection}`.
//! Records are free-form JSON objects; the server only owns the `_id`
//! field. Every response is a `{success, data, error}` envelope.
//!
//! There is no DELETE route: records live until the process exits.

pub mod error;
pub mod routes;
pub mod store;

pub use error::ServiceError;
pub use routes::build_router;
pub use store::EntityStore;
