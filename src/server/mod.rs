//! HTTP server relaying chat completions.
//!
//! - [`api`]: request/response types, router and handlers
//! - [`error`]: error-to-response mapping
//! - [`streaming`]: fragment stream to response body

pub mod api;
pub mod error;
pub mod streaming;

pub use api::{build_router, AppState};
