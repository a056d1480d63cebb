//! Feedback sink.
//!
//! Calculated results can be forwarded to a feedback service. The service
//! has no agreed contract yet, so sending only records the hand-off in the
//! logs.

use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::models::FinalResult;

/// Hands finished calculations to the feedback service.
#[derive(Debug, Clone, Default)]
pub struct FeedbackClient {
    endpoint: Option<Url>,
}

impl FeedbackClient {
    /// Creates a sink for the given feedback service, if any.
    pub fn new(endpoint: Option<Url>) -> Self {
        Self { endpoint }
    }

    /// Returns true when a feedback service URL was configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Records that `result` was produced. Nothing is sent over the network.
    pub fn send_feedback(&self, calculation_id: Uuid, result: &FinalResult) {
        debug!(
            calculation_id = %calculation_id,
            feedback_service = self.endpoint.as_ref().map(Url::as_str).unwrap_or("<none>"),
            total_nett_salary = %result.total_nett_salary,
            "Feedback hand-off skipped"
        );
    }
}
