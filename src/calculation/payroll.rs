//! Payroll calculation composition.
//!
//! [`perform_calculations`] is the only place the individual calculation
//! steps are chained together. Every entry point that produces a
//! [`FinalResult`] goes through it.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, FinalResult, IntermediateIncome, TaxDetails};

use super::income_tax::{calculate_tax_excluding_bonus_leave, calculate_tax_on_bonus_and_leave};
use super::nett_salary::{calculate_nett_salary, calculate_total_deductions};
use super::uif::calculate_uif;

/// Warning code raised when the rebate exceeds the bracket tax.
pub const NEGATIVE_TAX_WARNING: &str = "NEGATIVE_TAX";

/// Warning code raised when deductions exceed income.
pub const NEGATIVE_NETT_SALARY_WARNING: &str = "NEGATIVE_NETT_SALARY";

/// The outcome of a full payroll calculation.
#[derive(Debug, Clone)]
pub struct PayrollCalculation {
    /// The payroll figures.
    pub result: FinalResult,
    /// Audit steps, one per calculation, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Non-fatal anomalies found along the way.
    pub warnings: Vec<AuditWarning>,
}

/// Computes the month's payroll figures from income aggregates and tax details.
///
/// Steps are numbered from `start_step` so callers can prepend their own
/// audit steps (for example income normalization).
///
/// # Errors
///
/// Returns `AmountOutOfRange` if any figure overflows `Decimal`. No partial
/// result is produced.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::perform_calculations;
/// use paye_engine::models::{IntermediateIncome, TaxBracketInfo, TaxDetails};
/// use rust_decimal::Decimal;
///
/// let income = IntermediateIncome {
///     total_income: Decimal::new(30000, 0),
///     total_income_excluding_commission: Decimal::new(28000, 0),
///     projected_annual_income: Decimal::new(500000, 0),
///     projected_annual_income_plus_bonus_leave: Decimal::new(600000, 0),
///     age_group: None,
/// };
/// let tax_details = TaxDetails {
///     tax_details_excluding_bonus_and_leave: TaxBracketInfo {
///         min_income: Decimal::new(400000, 0),
///         tax_on_previous_brackets: Decimal::new(50000, 0),
///         tax_percentage: Decimal::new(25, 0),
///     },
///     tax_details_including_bonus_and_leave: TaxBracketInfo {
///         min_income: Decimal::new(400000, 0),
///         tax_on_previous_brackets: Decimal::new(50000, 0),
///         tax_percentage: Decimal::new(30, 0),
///     },
///     rebate_value: Decimal::new(15000, 0),
/// };
///
/// let calculation = perform_calculations(&income, &tax_details, 1).unwrap();
/// assert_eq!(calculation.result.total_deductions, Decimal::new(4017712, 2));
/// ```
pub fn perform_calculations(
    income: &IntermediateIncome,
    tax_details: &TaxDetails,
    start_step: u32,
) -> EngineResult<PayrollCalculation> {
    let mut audit_steps = Vec::with_capacity(5);
    let mut warnings = Vec::new();
    let mut step_number = start_step;

    let uif_result = calculate_uif(income.total_income_excluding_commission, step_number);
    audit_steps.push(uif_result.audit_step);
    step_number += 1;

    let excluding = calculate_tax_excluding_bonus_leave(
        income.projected_annual_income,
        &tax_details.tax_details_excluding_bonus_and_leave,
        tax_details.rebate_value,
        step_number,
    )?;
    audit_steps.push(excluding.audit_step);
    step_number += 1;

    if excluding.annual_tax < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: NEGATIVE_TAX_WARNING.to_string(),
            message: format!(
                "Rebate of R{} exceeds bracket tax; annual tax is R{}",
                tax_details.rebate_value.normalize(),
                excluding.annual_tax.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    let including = calculate_tax_on_bonus_and_leave(
        income.projected_annual_income_plus_bonus_leave,
        &tax_details.tax_details_including_bonus_and_leave,
        tax_details.rebate_value,
        excluding.annual_tax,
        step_number,
    )?;
    audit_steps.push(including.audit_step);
    step_number += 1;

    let deductions =
        calculate_total_deductions(including.total_tax, uif_result.uif, step_number)?;
    audit_steps.push(deductions.audit_step);
    step_number += 1;

    let nett =
        calculate_nett_salary(income.total_income, deductions.total_deductions, step_number)?;
    audit_steps.push(nett.audit_step);

    if nett.total_nett_salary < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: NEGATIVE_NETT_SALARY_WARNING.to_string(),
            message: format!(
                "Deductions of R{} exceed income of R{}",
                deductions.total_deductions.round_dp(2).normalize(),
                income.total_income.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    Ok(PayrollCalculation {
        result: FinalResult {
            uif: uif_result.uif,
            annual_tax_excluding_bonus_and_leave: excluding.annual_tax,
            monthly_tax_excluding_bonus_and_leave: excluding.monthly_tax,
            tax_on_bonus_and_leave: including.tax_on_bonus_and_leave,
            total_tax: including.total_tax,
            total_deductions: deductions.total_deductions,
            total_nett_salary: nett.total_nett_salary,
        },
        audit_steps,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::TaxBracketInfo;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(min_income: &str, tax_on_previous: &str, percentage: &str) -> TaxBracketInfo {
        TaxBracketInfo {
            min_income: dec(min_income),
            tax_on_previous_brackets: dec(tax_on_previous),
            tax_percentage: dec(percentage),
        }
    }

    fn reference_income() -> IntermediateIncome {
        IntermediateIncome {
            total_income: dec("30000"),
            total_income_excluding_commission: dec("28000"),
            projected_annual_income: dec("500000"),
            projected_annual_income_plus_bonus_leave: dec("600000"),
            age_group: None,
        }
    }

    fn reference_tax_details() -> TaxDetails {
        TaxDetails {
            tax_details_excluding_bonus_and_leave: bracket("400000", "50000", "25"),
            tax_details_including_bonus_and_leave: bracket("400000", "50000", "30"),
            rebate_value: dec("15000"),
        }
    }

    #[test]
    fn test_reference_end_to_end_figures() {
        let calculation = perform_calculations(&reference_income(), &reference_tax_details(), 1).unwrap();
        let result = calculation.result;

        assert_eq!(result.uif, dec("177.12"));
        assert_eq!(result.annual_tax_excluding_bonus_and_leave, dec("60000"));
        assert_eq!(result.monthly_tax_excluding_bonus_and_leave, dec("5000"));
        assert_eq!(result.tax_on_bonus_and_leave, dec("35000"));
        assert_eq!(result.total_tax, dec("40000"));
        assert_eq!(result.total_deductions, dec("40177.12"));
        assert_eq!(result.total_nett_salary, dec("-10177.12"));
    }

    #[test]
    fn test_negative_nett_salary_raises_warning() {
        let calculation = perform_calculations(&reference_income(), &reference_tax_details(), 1).unwrap();

        assert_eq!(calculation.warnings.len(), 1);
        assert_eq!(calculation.warnings[0].code, NEGATIVE_NETT_SALARY_WARNING);
        assert_eq!(calculation.warnings[0].severity, "high");
    }

    #[test]
    fn test_realistic_salary_has_no_warnings() {
        // R25 000 per month, no bonus or leave pay.
        let income = IntermediateIncome {
            total_income: dec("25000"),
            total_income_excluding_commission: dec("25000"),
            projected_annual_income: dec("300000"),
            projected_annual_income_plus_bonus_leave: dec("300000"),
            age_group: None,
        };
        let tax_details = TaxDetails {
            tax_details_excluding_bonus_and_leave: bracket("237101", "42678", "26"),
            tax_details_including_bonus_and_leave: bracket("237101", "42678", "26"),
            rebate_value: dec("17235"),
        };

        let calculation = perform_calculations(&income, &tax_details, 1).unwrap();

        // 42678 + 62899 * 0.26 - 17235 = 41796.74
        assert_eq!(
            calculation.result.annual_tax_excluding_bonus_and_leave,
            dec("41796.74")
        );
        assert_eq!(calculation.result.tax_on_bonus_and_leave, Decimal::ZERO);
        assert!(calculation.result.total_nett_salary > Decimal::ZERO);
        assert!(calculation.warnings.is_empty());
    }

    #[test]
    fn test_rebate_above_bracket_tax_raises_negative_tax_warning() {
        let income = IntermediateIncome {
            total_income: dec("5000"),
            total_income_excluding_commission: dec("5000"),
            projected_annual_income: dec("60000"),
            projected_annual_income_plus_bonus_leave: dec("60000"),
            age_group: None,
        };
        let tax_details = TaxDetails {
            tax_details_excluding_bonus_and_leave: bracket("0", "0", "18"),
            tax_details_including_bonus_and_leave: bracket("0", "0", "18"),
            rebate_value: dec("17235"),
        };

        let calculation = perform_calculations(&income, &tax_details, 1).unwrap();

        assert_eq!(
            calculation.result.annual_tax_excluding_bonus_and_leave,
            dec("-6435")
        );
        assert!(
            calculation
                .warnings
                .iter()
                .any(|w| w.code == NEGATIVE_TAX_WARNING)
        );
    }

    #[test]
    fn test_audit_steps_are_numbered_from_start_step() {
        let calculation = perform_calculations(&reference_income(), &reference_tax_details(), 2).unwrap();

        let numbers: Vec<u32> = calculation.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6]);

        let rule_ids: Vec<&str> = calculation
            .audit_steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "uif_contribution",
                "tax_excluding_bonus_and_leave",
                "tax_on_bonus_and_leave",
                "total_deductions",
                "nett_salary",
            ]
        );
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let first = perform_calculations(&reference_income(), &reference_tax_details(), 1).unwrap();
        let second = perform_calculations(&reference_income(), &reference_tax_details(), 1).unwrap();

        assert_eq!(first.result, second.result);
        assert_eq!(first.audit_steps, second.audit_steps);
    }

    #[test]
    fn test_deductions_and_nett_salary_invariants() {
        let calculation = perform_calculations(&reference_income(), &reference_tax_details(), 1).unwrap();
        let result = calculation.result;

        assert_eq!(result.total_deductions, result.total_tax + result.uif);
        assert_eq!(
            result.total_nett_salary,
            reference_income().total_income - result.total_deductions
        );
        assert_eq!(
            result.total_tax,
            result.tax_on_bonus_and_leave + result.monthly_tax_excluding_bonus_and_leave
        );
    }
    #[test]
    fn test_overflow_yields_error_not_partial_result() {
        let income = IntermediateIncome {
            projected_annual_income: Decimal::MAX,
            ..reference_income()
        };
        let tax_details = TaxDetails {
            tax_details_excluding_bonus_and_leave: bracket("0", "1", "100"),
            ..reference_tax_details()
        };

        match perform_calculations(&income, &tax_details, 1) {
            Err(EngineError::AmountOutOfRange { quantity }) => assert_eq!(quantity, "annual_tax"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
    }
}
