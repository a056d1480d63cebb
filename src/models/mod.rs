//! Core data models for the PAYE Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod income;
mod tax_details;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, FinalResult,
};
pub use income::{AgeGroup, IncomeSource, IntermediateIncome, RawIncomeInput, UserInput};
pub use tax_details::{TaxBracketInfo, TaxDetails, TaxDetailsRequest};
