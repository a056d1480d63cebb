//! Income models and related types.
//!
//! This module defines the raw salary components supplied by the User Input
//! Service, the aggregates derived from them, and the age groups used to pick
//! the applicable rebate.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Age classification used by the Tax Table Service to resolve the rebate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// Under 65.
    #[serde(rename = "Primary")]
    Primary,
    /// 65 to 74 inclusive.
    #[serde(rename = "Secondary (65 and older)")]
    Secondary,
    /// 75 and older.
    #[serde(rename = "Tertiary (75 and older)")]
    Tertiary,
}

impl AgeGroup {
    /// Returns the label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Primary => "Primary",
            AgeGroup::Secondary => "Secondary (65 and older)",
            AgeGroup::Tertiary => "Tertiary (75 and older)",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The monthly salary components for one employee.
///
/// Absent components are treated as zero when the payload is parsed.
///
/// # Example
///
/// ```
/// use paye_engine::models::RawIncomeInput;
/// use rust_decimal::Decimal;
///
/// let input = RawIncomeInput {
///     basic_salary: Decimal::new(25000, 0),
///     commission: Decimal::new(2000, 0),
///     bonus: Decimal::ZERO,
///     overtime: Decimal::new(500, 0),
///     leave_pay: Decimal::ZERO,
///     age: Some(40),
/// };
/// assert_eq!(input.basic_salary + input.overtime, Decimal::new(25500, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIncomeInput {
    /// Basic monthly salary.
    #[serde(with = "rust_decimal::serde::float")]
    pub basic_salary: Decimal,
    /// Commission earned this month.
    #[serde(with = "rust_decimal::serde::float")]
    pub commission: Decimal,
    /// Bonus paid this month.
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus: Decimal,
    /// Overtime paid this month.
    #[serde(with = "rust_decimal::serde::float")]
    pub overtime: Decimal,
    /// Leave pay paid this month.
    #[serde(with = "rust_decimal::serde::float")]
    pub leave_pay: Decimal,
    /// The employee's age in years, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

/// Income aggregates derived from [`RawIncomeInput`].
///
/// These are the values sent to the Tax Table Service and consumed by the
/// payroll calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateIncome {
    /// Sum of all monthly components.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    /// Sum of all monthly components except commission.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income_excluding_commission: Decimal,
    /// `total_income * 12`.
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_annual_income: Decimal,
    /// `(total_income + bonus + leave_pay) * 12`.
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_annual_income_plus_bonus_leave: Decimal,
    /// Age group, when the employee's age was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
}

/// Where the income figures for a calculation came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeSource {
    /// Raw components that still need normalizing.
    Components(RawIncomeInput),
    /// Aggregates already computed by the User Input Service.
    Precomputed(IntermediateIncome),
}

/// Validated user input for a single calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    /// Calendar month of the payslip (1-12).
    pub month: u32,
    /// Calendar year of the payslip.
    pub year: i32,
    /// The income figures.
    pub income: IncomeSource,
}

impl UserInput {
    /// Returns the employee's age if the raw components carried one.
    pub fn age(&self) -> Option<i32> {
        match &self.income {
            IncomeSource::Components(raw) => raw.age,
            IncomeSource::Precomputed(_) => None,
        }
    }
}
