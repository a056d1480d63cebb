//! Deductions and nett salary.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::AuditStep;

use super::checked;

/// The result of summing deductions, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// `total_tax + uif`.
    pub total_deductions: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of calculating nett salary, including the audit step.
#[derive(Debug, Clone)]
pub struct NettSalaryResult {
    /// `total_income - total_deductions`. May be negative.
    pub total_nett_salary: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums tax and UIF into the month's total deductions.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_total_deductions;
/// use rust_decimal::Decimal;
///
/// let result =
///     calculate_total_deductions(Decimal::new(5000, 0), Decimal::new(17712, 2), 1).unwrap();
/// assert_eq!(result.total_deductions, Decimal::new(517712, 2));
/// ```
pub fn calculate_total_deductions(
    total_tax: Decimal,
    uif: Decimal,
    step_number: u32,
) -> EngineResult<DeductionsResult> {
    let total_deductions = checked(total_tax.checked_add(uif), "total_deductions")?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "total_deductions".to_string(),
        rule_name: "Total Deductions".to_string(),
        input: serde_json::json!({
            "total_tax": total_tax.normalize().to_string(),
            "uif": uif.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.normalize().to_string()
        }),
        reasoning: format!(
            "R{} tax + R{} UIF = R{}",
            total_tax.round_dp(2).normalize(),
            uif.round_dp(2).normalize(),
            total_deductions.round_dp(2).normalize()
        ),
    };

    Ok(DeductionsResult {
        total_deductions,
        audit_step,
    })
}

/// Subtracts total deductions from the month's total income.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_nett_salary;
/// use rust_decimal::Decimal;
///
/// let result =
///     calculate_nett_salary(Decimal::new(30000, 0), Decimal::new(517712, 2), 1).unwrap();
/// assert_eq!(result.total_nett_salary, Decimal::new(2482288, 2));
/// ```
pub fn calculate_nett_salary(
    total_income: Decimal,
    total_deductions: Decimal,
    step_number: u32,
) -> EngineResult<NettSalaryResult> {
    let total_nett_salary = checked(
        total_income.checked_sub(total_deductions),
        "total_nett_salary",
    )?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "nett_salary".to_string(),
        rule_name: "Nett Salary".to_string(),
        input: serde_json::json!({
            "total_income": total_income.normalize().to_string(),
            "total_deductions": total_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_nett_salary": total_nett_salary.normalize().to_string()
        }),
        reasoning: format!(
            "R{} - R{} = R{}",
            total_income.round_dp(2).normalize(),
            total_deductions.round_dp(2).normalize(),
            total_nett_salary.round_dp(2).normalize()
        ),
    };

    Ok(NettSalaryResult {
        total_nett_salary,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deductions_are_tax_plus_uif() {
        let result = calculate_total_deductions(dec("40000"), dec("177.12"), 1).unwrap();
        assert_eq!(result.total_deductions, dec("40177.12"));
    }

    #[test]
    fn test_negative_tax_reduces_deductions() {
        let result = calculate_total_deductions(dec("-536.25"), dec("60"), 1).unwrap();
        assert_eq!(result.total_deductions, dec("-476.25"));
    }

    #[test]
    fn test_nett_salary_is_income_minus_deductions() {
        let result = calculate_nett_salary(dec("30000"), dec("5177.12"), 1).unwrap();
        assert_eq!(result.total_nett_salary, dec("24822.88"));
    }

    #[test]
    fn test_nett_salary_may_be_negative() {
        let result = calculate_nett_salary(dec("30000"), dec("40177.12"), 1).unwrap();
        assert_eq!(result.total_nett_salary, dec("-10177.12"));
    }

    #[test]
    fn test_audit_steps() {
        let deductions = calculate_total_deductions(dec("40000"), dec("177.12"), 5).unwrap();
        assert_eq!(deductions.audit_step.step_number, 5);
        assert_eq!(deductions.audit_step.rule_id, "total_deductions");
        assert_eq!(
            deductions.audit_step.reasoning,
            "R40000 tax + R177.12 UIF = R40177.12"
        );

        let nett = calculate_nett_salary(dec("30000"), dec("40177.12"), 6).unwrap();
        assert_eq!(nett.audit_step.rule_id, "nett_salary");
        assert_eq!(
            nett.audit_step.output["total_nett_salary"].as_str().unwrap(),
            "-10177.12"
        );
        assert_eq!(nett.audit_step.reasoning, "R30000 - R40177.12 = R-10177.12");
    }
    #[test]
    fn test_overflowing_deductions_are_reported() {
        let result = calculate_nett_salary(Decimal::MIN, Decimal::MAX, 1);
        assert!(matches!(
            result,
            Err(EngineError::AmountOutOfRange { ref quantity }) if quantity == "total_nett_salary"
        ));
    }
}
