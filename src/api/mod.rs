//! HTTP API module for the PAYE Engine.
//!
//! This module exposes the service surface: a liveness message, a health
//! check, and the two calculation endpoints.

mod handlers;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, ApiErrorResponse, DetailedCalculationResponse};
pub use state::AppState;
