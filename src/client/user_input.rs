//! Client for the User Input Service.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/get-user-input` | Latest salary components for the employee |

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Collaborator, EngineError, EngineResult};

use super::{
    UserInputService, build_http_client, endpoint_url, error_message, transport_error,
};

const SERVICE: Collaborator = Collaborator::UserInput;

/// `reqwest` implementation of [`UserInputService`].
#[derive(Debug, Clone)]
pub struct HttpUserInputClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpUserInputClient {
    /// Creates a client with the given request timeout.
    pub fn new(base_url: Url, timeout_secs: u64) -> EngineResult<Self> {
        Ok(Self {
            http: build_http_client(SERVICE, timeout_secs)?,
            base_url,
        })
    }
}

#[async_trait]
impl UserInputService for HttpUserInputClient {
    /// Calls `GET {base_url}/get-user-input`.
    ///
    /// 400, 404 and an empty 200 body mean no input has been captured yet and
    /// map to `CollaboratorDataAbsent`. Other failures map to
    /// `CollaboratorUnavailable`.
    async fn fetch_user_input(&self) -> EngineResult<Value> {
        let endpoint = "GET /get-user-input";
        let url = endpoint_url(&self.base_url, "get-user-input");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, endpoint, e))?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), "No user input available");
            return Err(EngineError::CollaboratorDataAbsent {
                service: SERVICE,
                message: "User input is unavailable.".to_string(),
            });
        }

        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(EngineError::CollaboratorUnavailable {
                service: SERVICE,
                message: format!(
                    "{} returned status {}: {}",
                    endpoint,
                    status.as_u16(),
                    error_message(&body)
                ),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| transport_error(SERVICE, endpoint, e))?;
        if body.is_empty() {
            return Err(EngineError::CollaboratorDataAbsent {
                service: SERVICE,
                message: "User input is unavailable.".to_string(),
            });
        }

        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| EngineError::CollaboratorUnavailable {
                service: SERVICE,
                message: format!("Invalid JSON response from {}: {}", endpoint, e),
            })?;
        debug!(payload = %payload, "User input fetched");
        Ok(payload)
    }

    /// Any HTTP response counts as healthy; only transport failures do not.
    async fn check_health(&self) -> EngineResult<()> {
        let endpoint = "GET /get-user-input";
        let url = endpoint_url(&self.base_url, "get-user-input");

        self.http
            .get(&url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| transport_error(SERVICE, endpoint, e))
    }
}
