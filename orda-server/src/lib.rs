//! HTTP API for Orda.
//!
//! Handlers are thin: they pull shared services from [`AppState`], call
//! into the domain crates and map failures to `{"detail": ...}` bodies.

pub mod detail;
mod error;
mod routes;
mod serve;
mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use serve::{serve, shutdown_signal};
pub use state::AppState;
