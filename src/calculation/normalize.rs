//! Income normalization functionality.
//!
//! This module derives the income aggregates the Tax Table Service and the
//! payroll calculator work with from the raw monthly salary components, and
//! classifies the employee's age for rebate purposes.

use rust_decimal::Decimal;

use crate::error::{Collaborator, EngineError, EngineResult};
use crate::models::{AgeGroup, AuditStep, IntermediateIncome, RawIncomeInput};

use super::{checked, checked_sum};

/// Number of pay periods used to project monthly income onto a tax year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// First age that falls in the secondary rebate group.
pub const SECONDARY_AGE_THRESHOLD: i32 = 65;

/// First age that falls in the tertiary rebate group.
pub const TERTIARY_AGE_THRESHOLD: i32 = 75;

/// The result of normalizing raw income, including the audit step.
#[derive(Debug, Clone)]
pub struct NormalizationResult {
    /// The derived income aggregates.
    pub income: IntermediateIncome,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Classifies an age into its rebate group.
///
/// # Errors
///
/// Returns `InputInvalid` for a negative age.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::classify_age;
/// use paye_engine::models::AgeGroup;
///
/// assert_eq!(classify_age(64).unwrap(), AgeGroup::Primary);
/// assert_eq!(classify_age(65).unwrap(), AgeGroup::Secondary);
/// assert_eq!(classify_age(75).unwrap(), AgeGroup::Tertiary);
/// assert!(classify_age(-1).is_err());
/// ```
pub fn classify_age(age: i32) -> EngineResult<AgeGroup> {
    match age {
        a if a < 0 => Err(EngineError::invalid(
            Collaborator::UserInput,
            "age",
            format!("Invalid age value provided: {}", a),
        )),
        a if a < SECONDARY_AGE_THRESHOLD => Ok(AgeGroup::Primary),
        a if a < TERTIARY_AGE_THRESHOLD => Ok(AgeGroup::Secondary),
        _ => Ok(AgeGroup::Tertiary),
    }
}

/// Derives the income aggregates from raw salary components.
///
/// - `total_income` is the sum of every component
/// - `total_income_excluding_commission` drops commission
/// - `projected_annual_income` is `total_income * 12`
/// - `projected_annual_income_plus_bonus_leave` is
///   `(total_income + bonus + leave_pay) * 12`
///
/// The age group is only resolved when the input carries an age.
///
/// # Errors
///
/// Returns `InputInvalid` if the age is negative, and `AmountOutOfRange` if
/// an aggregate does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::normalize_income;
/// use paye_engine::models::RawIncomeInput;
/// use rust_decimal::Decimal;
///
/// let raw = RawIncomeInput {
///     basic_salary: Decimal::new(20000, 0),
///     commission: Decimal::new(3000, 0),
///     bonus: Decimal::new(1000, 0),
///     overtime: Decimal::ZERO,
///     leave_pay: Decimal::ZERO,
///     age: None,
/// };
///
/// let result = normalize_income(&raw, 1).unwrap();
/// assert_eq!(result.income.total_income, Decimal::new(24000, 0));
/// assert_eq!(result.income.projected_annual_income, Decimal::new(288000, 0));
/// assert_eq!(result.income.age_group, None);
/// ```
pub fn normalize_income(raw: &RawIncomeInput, step_number: u32) -> EngineResult<NormalizationResult> {
    let age_group = raw.age.map(classify_age).transpose()?;

    let total_income = checked_sum(
        &[raw.basic_salary, raw.commission, raw.bonus, raw.overtime, raw.leave_pay],
        "total_income",
    )?;
    let total_income_excluding_commission = checked_sum(
        &[raw.basic_salary, raw.bonus, raw.overtime, raw.leave_pay],
        "total_income_excluding_commission",
    )?;
    let projected_annual_income = checked(
        total_income.checked_mul(MONTHS_PER_YEAR),
        "projected_annual_income",
    )?;
    let projected_annual_income_plus_bonus_leave = checked(
        checked_sum(
            &[total_income, raw.bonus, raw.leave_pay],
            "projected_annual_income_plus_bonus_leave",
        )?
        .checked_mul(MONTHS_PER_YEAR),
        "projected_annual_income_plus_bonus_leave",
    )?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_normalization".to_string(),
        rule_name: "Income Normalization".to_string(),
        input: serde_json::json!({
            "basic_salary": raw.basic_salary.normalize().to_string(),
            "commission": raw.commission.normalize().to_string(),
            "bonus": raw.bonus.normalize().to_string(),
            "overtime": raw.overtime.normalize().to_string(),
            "leave_pay": raw.leave_pay.normalize().to_string(),
            "age": raw.age
        }),
        output: serde_json::json!({
            "total_income": total_income.normalize().to_string(),
            "total_income_excluding_commission": total_income_excluding_commission.normalize().to_string(),
            "projected_annual_income": projected_annual_income.normalize().to_string(),
            "projected_annual_income_plus_bonus_leave": projected_annual_income_plus_bonus_leave.normalize().to_string(),
            "age_group": age_group.map(|g| g.as_str())
        }),
        reasoning: format!(
            "Total income R{} (R{} excluding commission), projected annually as R{} and R{} including bonus and leave pay",
            total_income.normalize(),
            total_income_excluding_commission.normalize(),
            projected_annual_income.normalize(),
            projected_annual_income_plus_bonus_leave.normalize()
        ),
    };

    Ok(NormalizationResult {
        income: IntermediateIncome {
            total_income,
            total_income_excluding_commission,
            projected_annual_income,
            projected_annual_income_plus_bonus_leave,
            age_group,
        },
        audit_step,
    })
}
