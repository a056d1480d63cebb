//! Income tax calculation functionality.
//!
//! Tax is computed twice per payslip: once on projected annual income
//! excluding bonus and leave pay, and once including them. The difference
//! between the two annual figures is the tax attributable to bonus and leave
//! pay, which is withheld in full in the month it is paid.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, TaxBracketInfo};

use super::checked;
use super::normalize::MONTHS_PER_YEAR;

/// The result of calculating tax excluding bonus and leave pay.
#[derive(Debug, Clone)]
pub struct TaxExcludingBonusLeaveResult {
    /// Annual tax after the rebate.
    pub annual_tax: Decimal,
    /// `annual_tax / 12`.
    pub monthly_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of calculating tax on bonus and leave pay.
#[derive(Debug, Clone)]
pub struct BonusLeaveTaxResult {
    /// Annual tax after the rebate on income including bonus and leave pay.
    pub annual_tax_including: Decimal,
    /// `annual_tax_including - annual_tax_excluding`.
    pub tax_on_bonus_and_leave: Decimal,
    /// Tax withheld this month.
    pub total_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies a bracket and rebate to an annual income.
///
/// `tax_on_previous_brackets + (income - min_income) * tax_percentage / 100 - rebate`
///
/// The result may be negative when the rebate exceeds the bracket tax; it is
/// not clamped.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if an intermediate amount overflows.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::annual_tax_for_bracket;
/// use paye_engine::models::TaxBracketInfo;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracketInfo {
///     min_income: Decimal::new(400000, 0),
///     tax_on_previous_brackets: Decimal::new(50000, 0),
///     tax_percentage: Decimal::new(25, 0),
/// };
/// let tax = annual_tax_for_bracket(Decimal::new(500000, 0), &bracket, Decimal::new(15000, 0));
/// assert_eq!(tax.unwrap(), Decimal::new(60000, 0));
/// ```
pub fn annual_tax_for_bracket(
    annual_income: Decimal,
    bracket: &TaxBracketInfo,
    rebate_value: Decimal,
) -> EngineResult<Decimal> {
    let taxable = checked(annual_income.checked_sub(bracket.min_income), "taxable_income")?;
    let marginal_tax = checked(taxable.checked_mul(bracket.marginal_rate()), "marginal_tax")?;
    checked(
        bracket
            .tax_on_previous_brackets
            .checked_add(marginal_tax)
            .and_then(|tax| tax.checked_sub(rebate_value)),
        "annual_tax",
    )
}

/// Calculates annual and monthly tax on income excluding bonus and leave pay.
///
/// # Arguments
///
/// * `projected_annual_income` - Monthly income excluding bonus/leave, times 12
/// * `bracket` - The bracket resolved for `projected_annual_income`
/// * `rebate_value` - The annual rebate
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_tax_excluding_bonus_leave;
/// use paye_engine::models::TaxBracketInfo;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracketInfo {
///     min_income: Decimal::new(400000, 0),
///     tax_on_previous_brackets: Decimal::new(50000, 0),
///     tax_percentage: Decimal::new(25, 0),
/// };
/// let result = calculate_tax_excluding_bonus_leave(
///     Decimal::new(500000, 0),
///     &bracket,
///     Decimal::new(15000, 0),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.annual_tax, Decimal::new(60000, 0));
/// assert_eq!(result.monthly_tax, Decimal::new(5000, 0));
/// ```
pub fn calculate_tax_excluding_bonus_leave(
    projected_annual_income: Decimal,
    bracket: &TaxBracketInfo,
    rebate_value: Decimal,
    step_number: u32,
) -> EngineResult<TaxExcludingBonusLeaveResult> {
    let annual_tax = annual_tax_for_bracket(projected_annual_income, bracket, rebate_value)?;
    let monthly_tax = annual_tax / MONTHS_PER_YEAR;

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_excluding_bonus_and_leave".to_string(),
        rule_name: "Tax Excluding Bonus and Leave Pay".to_string(),
        input: bracket_input(projected_annual_income, bracket, rebate_value),
        output: serde_json::json!({
            "annual_tax": annual_tax.normalize().to_string(),
            "monthly_tax": monthly_tax.normalize().to_string()
        }),
        reasoning: format!(
            "R{} + (R{} - R{}) x {}% - R{} = R{} per year, R{} per month",
            bracket.tax_on_previous_brackets.normalize(),
            projected_annual_income.normalize(),
            bracket.min_income.normalize(),
            bracket.tax_percentage.normalize(),
            rebate_value.normalize(),
            annual_tax.normalize(),
            monthly_tax.round_dp(2).normalize()
        ),
    };

    Ok(TaxExcludingBonusLeaveResult {
        annual_tax,
        monthly_tax,
        audit_step,
    })
}

/// Calculates the tax attributable to bonus and leave pay and the month's total tax.
///
/// `total_tax = tax_on_bonus_and_leave + annual_tax_excluding / 12`
///
/// # Arguments
///
/// * `projected_annual_income_plus_bonus_leave` - Projected income including bonus/leave
/// * `bracket` - The bracket resolved for that income
/// * `rebate_value` - The annual rebate
/// * `annual_tax_excluding` - Result of [`calculate_tax_excluding_bonus_leave`]
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_tax_on_bonus_and_leave;
/// use paye_engine::models::TaxBracketInfo;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracketInfo {
///     min_income: Decimal::new(400000, 0),
///     tax_on_previous_brackets: Decimal::new(50000, 0),
///     tax_percentage: Decimal::new(30, 0),
/// };
/// let result = calculate_tax_on_bonus_and_leave(
///     Decimal::new(600000, 0),
///     &bracket,
///     Decimal::new(15000, 0),
///     Decimal::new(60000, 0),
///     2,
/// )
/// .unwrap();
/// assert_eq!(result.tax_on_bonus_and_leave, Decimal::new(35000, 0));
/// assert_eq!(result.total_tax, Decimal::new(40000, 0));
/// ```
pub fn calculate_tax_on_bonus_and_leave(
    projected_annual_income_plus_bonus_leave: Decimal,
    bracket: &TaxBracketInfo,
    rebate_value: Decimal,
    annual_tax_excluding: Decimal,
    step_number: u32,
) -> EngineResult<BonusLeaveTaxResult> {
    let annual_tax_including =
        annual_tax_for_bracket(projected_annual_income_plus_bonus_leave, bracket, rebate_value)?;
    let tax_on_bonus_and_leave = checked(
        annual_tax_including.checked_sub(annual_tax_excluding),
        "tax_on_bonus_and_leave",
    )?;
    let total_tax = checked(
        tax_on_bonus_and_leave.checked_add(annual_tax_excluding / MONTHS_PER_YEAR),
        "total_tax",
    )?;

    let mut input = bracket_input(projected_annual_income_plus_bonus_leave, bracket, rebate_value);
    input["annual_tax_excluding_bonus_and_leave"] =
        serde_json::Value::String(annual_tax_excluding.normalize().to_string());

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_on_bonus_and_leave".to_string(),
        rule_name: "Tax on Bonus and Leave Pay".to_string(),
        input,
        output: serde_json::json!({
            "annual_tax_including_bonus_and_leave": annual_tax_including.normalize().to_string(),
            "tax_on_bonus_and_leave": tax_on_bonus_and_leave.normalize().to_string(),
            "total_tax": total_tax.normalize().to_string()
        }),
        reasoning: format!(
            "R{} - R{} = R{} on bonus and leave pay; plus R{} / 12 gives R{} total tax",
            annual_tax_including.normalize(),
            annual_tax_excluding.normalize(),
            tax_on_bonus_and_leave.normalize(),
            annual_tax_excluding.normalize(),
            total_tax.round_dp(2).normalize()
        ),
    };

    Ok(BonusLeaveTaxResult {
        annual_tax_including,
        tax_on_bonus_and_leave,
        total_tax,
        audit_step,
    })
}

fn bracket_input(
    annual_income: Decimal,
    bracket: &TaxBracketInfo,
    rebate_value: Decimal,
) -> serde_json::Value {
    serde_json::json!({
        "annual_income": annual_income.normalize().to_string(),
        "min_income": bracket.min_income.normalize().to_string(),
        "tax_on_previous_brackets": bracket.tax_on_previous_brackets.normalize().to_string(),
        "tax_percentage": bracket.tax_percentage.normalize().to_string(),
        "rebate_value": rebate_value.normalize().to_string()
    })
}
