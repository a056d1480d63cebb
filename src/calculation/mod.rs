//! Calculation logic for the PAYE Engine.
//!
//! This module contains the payroll arithmetic: income normalization and age
//! classification, UIF, tax excluding bonus and leave pay, tax on bonus and
//! leave pay, total deductions and nett salary. [`perform_calculations`]
//! chains the steps together.
//!
//! Arithmetic is checked: an amount outside the range of `Decimal` yields
//! [`EngineError::AmountOutOfRange`] instead of a panic.

mod income_tax;
mod nett_salary;
mod normalize;
mod payroll;
mod uif;

pub use income_tax::{
    BonusLeaveTaxResult, TaxExcludingBonusLeaveResult, annual_tax_for_bracket,
    calculate_tax_excluding_bonus_leave, calculate_tax_on_bonus_and_leave,
};
pub use nett_salary::{
    DeductionsResult, NettSalaryResult, calculate_nett_salary, calculate_total_deductions,
};
pub use normalize::{
    MONTHS_PER_YEAR, NormalizationResult, SECONDARY_AGE_THRESHOLD, TERTIARY_AGE_THRESHOLD,
    classify_age, normalize_income,
};
pub use payroll::{
    NEGATIVE_NETT_SALARY_WARNING, NEGATIVE_TAX_WARNING, PayrollCalculation, perform_calculations,
};
pub use uif::{UIF_MONTHLY_CAP, UIF_RATE, UifResult, calculate_uif};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Unwraps the result of a `checked_*` operation.
pub(crate) fn checked(value: Option<Decimal>, quantity: &str) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::AmountOutOfRange {
        quantity: quantity.to_string(),
    })
}

/// Sums `amounts`, failing rather than overflowing.
pub(crate) fn checked_sum(amounts: &[Decimal], quantity: &str) -> EngineResult<Decimal> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |total, amount| {
            checked(total.checked_add(*amount), quantity)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sum_adds_amounts() {
        let total = checked_sum(&[Decimal::new(150, 2), Decimal::new(2, 0)], "total").unwrap();
        assert_eq!(total, Decimal::new(350, 2));
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        match checked_sum(&[Decimal::MAX, Decimal::ONE], "total_income") {
            Err(EngineError::AmountOutOfRange { quantity }) => assert_eq!(quantity, "total_income"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
    }
}
