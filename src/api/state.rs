//! Application state for the PAYE Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::client::{FeedbackClient, HttpTaxTableClient, HttpUserInputClient};
use crate::config::ServiceConfig;
use crate::error::EngineResult;
use crate::pipeline::Pipeline;

/// Shared application state.
///
/// Holds the pipeline and the feedback sink. Nothing in it is mutated
/// after start-up.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    feedback: FeedbackClient,
}

impl AppState {
    /// Creates a new application state around an existing pipeline.
    pub fn new(pipeline: Pipeline, feedback: FeedbackClient) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            feedback,
        }
    }

    /// Builds the HTTP collaborators described by `config`.
    pub fn from_config(config: &ServiceConfig) -> EngineResult<Self> {
        let user_input = HttpUserInputClient::new(
            config.user_input_service_url.clone(),
            config.request_timeout_secs,
        )?;
        let tax_table =
            HttpTaxTableClient::new(config.tax_service_url.clone(), config.request_timeout_secs)?;

        Ok(Self::new(
            Pipeline::new(Arc::new(user_input), Arc::new(tax_table)),
            FeedbackClient::new(config.feedback_service_url.clone()),
        ))
    }

    /// Returns a reference to the pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns a reference to the feedback sink.
    pub fn feedback(&self) -> &FeedbackClient {
        &self.feedback
    }
}
