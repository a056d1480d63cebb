//! Calculation result models for the PAYE Engine.
//!
//! This module contains the [`FinalResult`] produced by the payroll
//! calculator and the [`CalculationResult`] envelope returned by the API,
//! together with the audit trace that explains every figure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::PipelineStage;

/// The monthly payroll figures for one employee.
///
/// # Example
///
/// ```
/// use paye_engine::models::FinalResult;
/// use rust_decimal::Decimal;
///
/// let result = FinalResult {
///     uif: Decimal::new(17712, 2),
///     annual_tax_excluding_bonus_and_leave: Decimal::new(60000, 0),
///     monthly_tax_excluding_bonus_and_leave: Decimal::new(5000, 0),
///     tax_on_bonus_and_leave: Decimal::ZERO,
///     total_tax: Decimal::new(5000, 0),
///     total_deductions: Decimal::new(517712, 2),
///     total_nett_salary: Decimal::new(2482288, 2),
/// };
/// assert_eq!(result.total_deductions, result.total_tax + result.uif);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    /// Unemployment Insurance Fund contribution.
    #[serde(with = "rust_decimal::serde::float")]
    pub uif: Decimal,
    /// Annual tax on projected income excluding bonus and leave pay.
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_tax_excluding_bonus_and_leave: Decimal,
    /// One twelfth of the annual tax excluding bonus and leave pay.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_tax_excluding_bonus_and_leave: Decimal,
    /// Marginal tax attributable to bonus and leave pay.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_on_bonus_and_leave: Decimal,
    /// Tax withheld this month.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
    /// `total_tax + uif`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_deductions: Decimal,
    /// `total_income - total_deductions`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_nett_salary: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate figures that are arithmetically correct but likely to
/// surprise a payroll reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use paye_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     stages: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// Pipeline stages visited, in order.
    pub stages: Vec<PipelineStage>,
    /// The total pipeline duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a payroll calculation as returned by the API.
///
/// The [`FinalResult`] fields are flattened into the top-level JSON object,
/// so clients that only know the plain result shape keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The payroll figures.
    #[serde(flatten)]
    pub result: FinalResult,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
