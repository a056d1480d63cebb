//! HTTP request handlers for the PAYE Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::pipeline::PipelineOutcome;

use super::response::{ApiErrorResponse, DetailedCalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/perform-calculations", post(perform_calculations_handler))
        .route("/calculate", post(calculate_handler))
        .with_state(state)
}

/// Handler for GET /.
async fn root_handler() -> impl IntoResponse {
    Json(json!({"message": "PAYE calculation service is running successfully!"}))
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "OK"}))
}

/// Handler for POST /perform-calculations endpoint.
///
/// Fetches the user input, resolves tax details and returns the payroll
/// figures with their audit trace.
async fn perform_calculations_handler(State(state): State<AppState>) -> Response {
    match run_pipeline(&state, "/perform-calculations").await {
        Ok(outcome) => json_response(outcome.calculation),
        Err(response) => response,
    }
}

/// Handler for POST /calculate endpoint.
///
/// Same as `/perform-calculations`, but also echoes the tax details, the
/// intermediate income and the original user input.
async fn calculate_handler(State(state): State<AppState>) -> Response {
    match run_pipeline(&state, "/calculate").await {
        Ok(outcome) => json_response(DetailedCalculationResponse::from(outcome)),
        Err(response) => response,
    }
}

/// Runs the pipeline, logging and converting any failure into a response.
async fn run_pipeline(state: &AppState, route: &'static str) -> Result<PipelineOutcome, Response> {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, route, "Processing calculation request");

    match state.pipeline().run().await {
        Ok(mut outcome) => {
            outcome.mark_responded();
            let calculation = &outcome.calculation;
            info!(
                correlation_id = %correlation_id,
                calculation_id = %calculation.calculation_id,
                total_tax = %calculation.result.total_tax,
                total_nett_salary = %calculation.result.total_nett_salary,
                warnings = calculation.audit_trace.warnings.len(),
                duration_us = calculation.audit_trace.duration_us,
                "Calculation completed successfully"
            );
            state
                .feedback()
                .send_feedback(calculation.calculation_id, &calculation.result);
            Ok(outcome)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                stage = %err.stage,
                error = %err.error,
                "Calculation failed"
            );
            Err(ApiErrorResponse::from(err).into_response())
        }
    }
}

fn json_response<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
