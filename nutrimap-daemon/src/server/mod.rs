//! HTTP server for the nutrimap daemon.
//!
//! Provides REST API for:
//! - Health and status checks
//! - Ingredient text mapping and user corrections
//! - Single-ingredient and recipe nutrition facts

mod error;
mod http;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use state::AppState;
