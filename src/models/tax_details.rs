//! Tax table models.
//!
//! The Tax Table Service resolves brackets and rebates; this module holds the
//! canonical shapes the calculator consumes and the request the engine sends.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AgeGroup, IntermediateIncome, UserInput};

/// One row of the tax table, resolved for a given projected income.
///
/// # Example
///
/// ```
/// use paye_engine::models::TaxBracketInfo;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracketInfo {
///     min_income: Decimal::new(400000, 0),
///     tax_on_previous_brackets: Decimal::new(50000, 0),
///     tax_percentage: Decimal::new(25, 0),
/// };
/// assert_eq!(bracket.marginal_rate(), Decimal::new(25, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketInfo {
    /// Bracket floor (annual income).
    #[serde(with = "rust_decimal::serde::float")]
    pub min_income: Decimal,
    /// Tax accumulated on all lower brackets.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_on_previous_brackets: Decimal,
    /// Marginal rate for income above the floor, as a percentage.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_percentage: Decimal,
}

impl TaxBracketInfo {
    /// Returns the marginal rate as a fraction (`tax_percentage / 100`).
    pub fn marginal_rate(&self) -> Decimal {
        self.tax_percentage / Decimal::ONE_HUNDRED
    }
}

/// Bracket and rebate data for both income scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetails {
    /// Bracket for projected annual income excluding bonus and leave pay.
    pub tax_details_excluding_bonus_and_leave: TaxBracketInfo,
    /// Bracket for projected annual income including bonus and leave pay.
    pub tax_details_including_bonus_and_leave: TaxBracketInfo,
    /// Annual rebate subtracted from both scenarios.
    #[serde(with = "rust_decimal::serde::float")]
    pub rebate_value: Decimal,
}

/// Payload posted to the Tax Table Service's `/get-tax-details` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetailsRequest {
    /// Calendar month of the payslip.
    pub month: u32,
    /// Calendar year of the payslip.
    pub year: i32,
    /// Projected annual income excluding bonus and leave pay.
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_annual_income: Decimal,
    /// Projected annual income including bonus and leave pay.
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_annual_income_plus_bonus_leave: Decimal,
    /// Total monthly income.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_income: Option<Decimal>,
    /// Total monthly income excluding commission.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_income_excluding_commission: Option<Decimal>,
    /// The employee's age, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// The employee's age group, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
}

impl TaxDetailsRequest {
    /// Builds the lookup request from validated input and derived income.
    pub fn new(user_input: &UserInput, income: &IntermediateIncome) -> Self {
        Self {
            month: user_input.month,
            year: user_input.year,
            projected_annual_income: income.projected_annual_income,
            projected_annual_income_plus_bonus_leave: income
                .projected_annual_income_plus_bonus_leave,
            total_income: Some(income.total_income),
            total_income_excluding_commission: Some(income.total_income_excluding_commission),
            age: user_input.age(),
            age_group: income.age_group,
        }
    }
}
