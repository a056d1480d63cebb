//! HTTP clients for the upstream collaborators.
//!
//! The pipeline depends only on the [`UserInputService`] and
//! [`TaxTableService`] traits; the `Http*` types are the production
//! implementations backed by `reqwest`.

mod feedback;
mod tax_table;
mod user_input;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{Collaborator, EngineError, EngineResult};
use crate::models::TaxDetailsRequest;

pub use feedback::FeedbackClient;
pub use tax_table::HttpTaxTableClient;
pub use user_input::HttpUserInputClient;

/// Source of the employee's salary components.
#[async_trait]
pub trait UserInputService: Send + Sync {
    /// Fetches the raw user input payload.
    async fn fetch_user_input(&self) -> EngineResult<Value>;

    /// Succeeds if the service answers at all.
    async fn check_health(&self) -> EngineResult<()>;
}

/// Source of tax brackets and rebates.
#[async_trait]
pub trait TaxTableService: Send + Sync {
    /// Resolves the brackets and rebate for the projected incomes in `request`.
    async fn fetch_tax_details(&self, request: &TaxDetailsRequest) -> EngineResult<Value>;

    /// Succeeds if the service's health endpoint returns 200.
    async fn check_health(&self) -> EngineResult<()>;
}

pub(crate) fn build_http_client(
    service: Collaborator,
    timeout_secs: u64,
) -> EngineResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| EngineError::CollaboratorUnavailable {
            service,
            message: format!("failed to build HTTP client: {}", e),
        })
}

pub(crate) fn endpoint_url(base_url: &Url, path: &str) -> String {
    format!("{}/{}", base_url.as_str().trim_end_matches('/'), path)
}

pub(crate) fn transport_error(
    service: Collaborator,
    endpoint: &str,
    error: reqwest::Error,
) -> EngineError {
    let message = if error.is_timeout() {
        format!("{} timed out", endpoint)
    } else {
        format!("{} failed: {}", endpoint, error)
    };
    EngineError::CollaboratorUnavailable { service, message }
}

/// Pulls the `error` string out of a JSON error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
