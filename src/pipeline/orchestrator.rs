//! Pipeline orchestration.
//!
//! A [`Pipeline`] runs one calculation request end to end: fetch user input,
//! normalize it, fetch tax details, then compute the payroll figures. The
//! steps are strictly sequential and are never retried.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{normalize_income, perform_calculations};
use crate::client::{TaxTableService, UserInputService};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, CalculationResult, IncomeSource, IntermediateIncome, TaxDetails,
    TaxDetailsRequest, UserInput,
};

use super::adapter::{parse_tax_details, parse_user_input};
use super::stage::PipelineStage;

/// A pipeline failure and the stage at which it happened.
#[derive(Debug, Error)]
#[error("pipeline failed while {stage}: {error}")]
pub struct PipelineError {
    /// The last stage entered before the failure.
    pub stage: PipelineStage,
    /// The underlying error.
    #[source]
    pub error: EngineError,
    /// Stages visited, ending in `Failed`.
    pub stages: Vec<PipelineStage>,
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The payload returned by the User Input Service, unmodified.
    pub user_input: Value,
    /// The income aggregates sent to the Tax Table Service.
    pub intermediate_income: IntermediateIncome,
    /// The canonical tax details.
    pub tax_details: TaxDetails,
    /// The calculation result, including the audit trace.
    pub calculation: CalculationResult,
}

impl PipelineOutcome {
    /// Records the `Responded` stage once the HTTP layer turns the outcome
    /// into a response body. Has no effect if the trace is not at `Computed`.
    pub fn mark_responded(&mut self) {
        let stages = &mut self.calculation.audit_trace.stages;
        if stages.last().and_then(|stage| stage.next()) == Some(PipelineStage::Responded) {
            stages.push(PipelineStage::Responded);
        }
    }
}

/// Sequences the collaborators and the calculator for one request.
#[derive(Clone)]
pub struct Pipeline {
    user_input: Arc<dyn UserInputService>,
    tax_table: Arc<dyn TaxTableService>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

/// Tracks the current stage and the stages visited so far.
struct StageTracker {
    current: PipelineStage,
    visited: Vec<PipelineStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: PipelineStage::AwaitingInput,
            visited: vec![PipelineStage::AwaitingInput],
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.current.next() {
            debug!(from = %self.current, to = %next, "Pipeline stage transition");
            self.current = next;
            self.visited.push(next);
        }
    }

    fn fail(&mut self, error: EngineError) -> PipelineError {
        let stage = self.current;
        debug!(from = %stage, to = %PipelineStage::Failed, "Pipeline stage transition");
        self.current = PipelineStage::Failed;
        self.visited.push(PipelineStage::Failed);
        PipelineError {
            stage,
            error,
            stages: std::mem::take(&mut self.visited),
        }
    }
}

impl Pipeline {
    /// Creates a pipeline over the given collaborators.
    pub fn new(
        user_input: Arc<dyn UserInputService>,
        tax_table: Arc<dyn TaxTableService>,
    ) -> Self {
        Self {
            user_input,
            tax_table,
        }
    }

    /// Runs a full calculation.
    ///
    /// On success the trace's stages end in `Computed`; the HTTP layer adds
    /// `Responded` via [`PipelineOutcome::mark_responded`]. Any failure is
    /// returned together with the stage that was active when it happened.
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        let start_time = Instant::now();
        let mut stages = StageTracker::new();
        let mut audit_steps: Vec<AuditStep> = Vec::new();
        let mut step_number: u32 = 1;

        let payload = self
            .user_input
            .fetch_user_input()
            .await
            .map_err(|e| stages.fail(e))?;
        let user_input = parse_user_input(&payload).map_err(|e| stages.fail(e))?;
        let intermediate_income = match &user_input.income {
            IncomeSource::Components(raw) => {
                let normalized = normalize_income(raw, step_number).map_err(|e| stages.fail(e))?;
                audit_steps.push(normalized.audit_step);
                step_number += 1;
                normalized.income
            }
            IncomeSource::Precomputed(income) => income.clone(),
        };
        stages.advance();

        stages.advance();
        let tax_payload = self
            .fetch_tax_details(&user_input, &intermediate_income)
            .await
            .map_err(|e| stages.fail(e))?;
        let tax_details = parse_tax_details(&tax_payload).map_err(|e| stages.fail(e))?;
        stages.advance();

        let payroll = perform_calculations(&intermediate_income, &tax_details, step_number)
            .map_err(|e| stages.fail(e))?;
        audit_steps.extend(payroll.audit_steps);
        stages.advance();

        let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);
        info!(
            total_income = %intermediate_income.total_income,
            total_tax = %payroll.result.total_tax,
            total_nett_salary = %payroll.result.total_nett_salary,
            warnings = payroll.warnings.len(),
            duration_us,
            "Pipeline completed"
        );

        Ok(PipelineOutcome {
            user_input: payload,
            intermediate_income,
            tax_details,
            calculation: CalculationResult {
                calculation_id: Uuid::new_v4(),
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                result: payroll.result,
                audit_trace: AuditTrace {
                    steps: audit_steps,
                    warnings: payroll.warnings,
                    stages: stages.visited,
                    duration_us,
                },
            },
        })
    }

    /// Checks both collaborators, tax table first.
    pub async fn verify_dependencies(&self) -> EngineResult<()> {
        self.tax_table.check_health().await?;
        self.user_input.check_health().await?;
        Ok(())
    }

    async fn fetch_tax_details(
        &self,
        user_input: &UserInput,
        income: &IntermediateIncome,
    ) -> EngineResult<Value> {
        let request = TaxDetailsRequest::new(user_input, income);
        self.tax_table.fetch_tax_details(&request).await
    }
}
