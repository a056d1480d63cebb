//! Client for the Tax Table Service.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/get-tax-details` | Brackets and rebate for projected incomes |
//! | GET    | `/health` | Liveness |

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Collaborator, EngineError, EngineResult};
use crate::models::TaxDetailsRequest;

use super::{TaxTableService, build_http_client, endpoint_url, error_message, transport_error};

const SERVICE: Collaborator = Collaborator::TaxTable;

/// `reqwest` implementation of [`TaxTableService`].
#[derive(Debug, Clone)]
pub struct HttpTaxTableClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTaxTableClient {
    /// Creates a client with the given request timeout.
    pub fn new(base_url: Url, timeout_secs: u64) -> EngineResult<Self> {
        Ok(Self {
            http: build_http_client(SERVICE, timeout_secs)?,
            base_url,
        })
    }
}

#[async_trait]
impl TaxTableService for HttpTaxTableClient {
    /// Calls `POST {base_url}/get-tax-details`.
    ///
    /// 404 means no bracket matched and maps to `CollaboratorDataAbsent`
    /// carrying the service's own error message.
    async fn fetch_tax_details(&self, request: &TaxDetailsRequest) -> EngineResult<Value> {
        let endpoint = "POST /get-tax-details";
        let url = endpoint_url(&self.base_url, "get-tax-details");
        debug!(
            month = request.month,
            year = request.year,
            projected_annual_income = %request.projected_annual_income,
            "Requesting tax details"
        );

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            let message = error_message(&body);
            warn!(status = status.as_u16(), error = %message, "Tax Table Service returned an error");

            if status == StatusCode::NOT_FOUND {
                return Err(EngineError::CollaboratorDataAbsent {
                    service: SERVICE,
                    message: if message.is_empty() {
                        "No tax bracket found".to_string()
                    } else {
                        message
                    },
                });
            }
            return Err(EngineError::CollaboratorUnavailable {
                service: SERVICE,
                message: format!("{} returned status {}: {}", endpoint, status.as_u16(), message),
            });
        }

        resp.json()
            .await
            .map_err(|e| EngineError::CollaboratorUnavailable {
                service: SERVICE,
                message: format!("Invalid JSON response from {}: {}", endpoint, e),
            })
    }

    /// Calls `GET {base_url}/health`; only 200 counts as healthy.
    async fn check_health(&self) -> EngineResult<()> {
        let endpoint = "GET /health";
        let url = endpoint_url(&self.base_url, "health");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, endpoint, e))?;

        if resp.status() != StatusCode::OK {
            return Err(EngineError::CollaboratorUnavailable {
                service: SERVICE,
                message: format!("{} returned status {}", endpoint, resp.status().as_u16()),
            });
        }
        Ok(())
    }
}
