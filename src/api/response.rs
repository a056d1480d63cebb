//! Response types for the PAYE Engine API.
//!
//! This module defines the error body, the mapping from engine errors to
//! HTTP statuses, and the detailed response returned by `/calculate`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Collaborator, EngineError};
use crate::models::{CalculationResult, IntermediateIncome, TaxDetails};
use crate::pipeline::{PipelineError, PipelineOutcome};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Fields a collaborator failed to supply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
            missing_fields: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, error)
        }
    }

    /// Creates an incomplete input error listing the missing fields.
    pub fn input_incomplete(origin: Collaborator, missing: Vec<String>) -> Self {
        let error = match origin {
            Collaborator::UserInput => "User input is incomplete.".to_string(),
            other => format!("Incomplete data from {}.", other),
        };
        Self {
            details: Some(format!("Missing fields: {}", missing.join(", "))),
            missing_fields: missing,
            ..Self::new("INPUT_INCOMPLETE", error)
        }
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { key, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Invalid value for '{}': {}", key, message),
                ),
            },
            EngineError::InputIncomplete { origin, missing } => ApiErrorResponse {
                status: match origin {
                    Collaborator::UserInput => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                },
                error: ApiError::input_incomplete(origin, missing),
            },
            EngineError::InputInvalid {
                origin: Collaborator::UserInput,
                field,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INPUT_INVALID",
                    format!("Invalid value for '{}'", field),
                    message,
                ),
            },
            EngineError::InputInvalid {
                origin,
                field,
                message,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "INPUT_INVALID",
                    format!("Invalid value for '{}' from {}", field, origin),
                    message,
                ),
            },
            EngineError::AmountOutOfRange { quantity } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "AMOUNT_OUT_OF_RANGE",
                    "Calculation failed",
                    format!("Amount out of range while computing '{}'", quantity),
                ),
            },
            EngineError::CollaboratorUnavailable { service, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "SERVICE_UNAVAILABLE",
                    format!("Connection to {} failed", service),
                    message,
                ),
            },
            EngineError::CollaboratorDataAbsent { service, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("DATA_UNAVAILABLE", message, service.as_str()),
            },
        }
    }
}

impl From<PipelineError> for ApiErrorResponse {
    fn from(error: PipelineError) -> Self {
        error.error.into()
    }
}

/// Response body for `POST /calculate`.
///
/// Carries everything `/perform-calculations` returns plus the inputs that
/// produced it.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedCalculationResponse {
    /// The calculation result, flattened to the top level.
    #[serde(flatten)]
    pub calculation: CalculationResult,
    /// The tax details returned by the Tax Table Service.
    pub tax_details: TaxDetails,
    /// The rebate applied, repeated at the top level.
    #[serde(with = "rust_decimal::serde::float")]
    pub rebate_value: Decimal,
    /// The income aggregates sent to the Tax Table Service.
    pub intermediate_income: IntermediateIncome,
    /// The payload received from the User Input Service.
    pub user_input: Value,
}

impl From<PipelineOutcome> for DetailedCalculationResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        Self {
            rebate_value: outcome.tax_details.rebate_value,
            calculation: outcome.calculation,
            tax_details: outcome.tax_details,
            intermediate_income: outcome.intermediate_income,
            user_input: outcome.user_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"error\":\"Test message\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("missing_fields"));
    }

    #[test]
    fn test_incomplete_user_input_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InputIncomplete {
            origin: Collaborator::UserInput,
            missing: vec!["month".to_string(), "age".to_string()],
        }
        .into();

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INPUT_INCOMPLETE");
        assert_eq!(api_error.error.error, "User input is incomplete.");
        assert_eq!(api_error.error.missing_fields, vec!["month", "age"]);
    }

    #[test]
    fn test_incomplete_tax_details_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::InputIncomplete {
            origin: Collaborator::TaxTable,
            missing: vec!["rebate_value".to_string()],
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.error, "Incomplete data from Tax Table Service.");
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::invalid(
            Collaborator::UserInput,
            "month",
            "Month must be between 1 and 12, got 13",
        )
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INPUT_INVALID");
        assert_eq!(
            api_error.error.details.as_deref(),
            Some("Month must be between 1 and 12, got 13")
        );
    }

    #[test]
    fn test_invalid_tax_details_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::invalid(
            Collaborator::TaxTable,
            "tax_details_excluding_bonus_and_leave.tax_percentage",
            "expected a number, got a string",
        )
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "INPUT_INVALID");
        assert_eq!(
            api_error.error.error,
            "Invalid value for 'tax_details_excluding_bonus_and_leave.tax_percentage' from Tax Table Service"
        );
    }

    #[test]
    fn test_amount_out_of_range_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::AmountOutOfRange {
            quantity: "annual_tax".to_string(),
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "AMOUNT_OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_into_response_writes_json_body() {
        let response = ApiErrorResponse::from(EngineError::CollaboratorDataAbsent {
            service: Collaborator::UserInput,
            message: "User input is unavailable.".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "DATA_UNAVAILABLE");
    }

    #[test]
    fn test_data_absent_has_distinct_code() {
        let api_error: ApiErrorResponse = EngineError::CollaboratorDataAbsent {
            service: Collaborator::TaxTable,
            message: "No tax bracket found".to_string(),
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "DATA_UNAVAILABLE");
        assert_eq!(api_error.error.error, "No tax bracket found");
        assert_eq!(api_error.error.details.as_deref(), Some("Tax Table Service"));
    }

    #[test]
    fn test_unavailable_collaborator_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::CollaboratorUnavailable {
            service: Collaborator::UserInput,
            message: "GET /get-user-input timed out".to_string(),
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "SERVICE_UNAVAILABLE");
        assert_eq!(api_error.error.error, "Connection to User Input Service failed");
    }
}
