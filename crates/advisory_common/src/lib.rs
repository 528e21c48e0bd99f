// --- File: crates/advisory_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod handlers;  // HTTP request handlers
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod routes;    // Route definitions
pub mod services;  // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    conflict, external_service_error, internal_error, not_found, unprocessable,
    validation_error, AdvisoryError, Context, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::IntoHttpResponse;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};

pub use services::{BoxFuture, BoxedError};
