//! Unemployment Insurance Fund contribution.
//!
//! The employee contributes 1% of remuneration excluding commission, capped
//! at a fixed monthly maximum.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The UIF contribution rate (1%).
pub const UIF_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The maximum monthly UIF contribution.
pub const UIF_MONTHLY_CAP: Decimal = Decimal::from_parts(17712, 0, 0, false, 2);

/// The result of calculating UIF, including the audit step.
#[derive(Debug, Clone)]
pub struct UifResult {
    /// The contribution after applying the cap.
    pub uif: Decimal,
    /// Whether the cap was applied.
    pub capped: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the UIF contribution for a month.
///
/// `uif = min(income_excluding_commission * 0.01, 177.12)`
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_uif;
/// use rust_decimal::Decimal;
///
/// let result = calculate_uif(Decimal::new(10000, 0), 1);
/// assert_eq!(result.uif, Decimal::new(100, 0));
/// assert!(!result.capped);
///
/// let result = calculate_uif(Decimal::new(20000, 0), 1);
/// assert_eq!(result.uif, Decimal::new(17712, 2));
/// assert!(result.capped);
/// ```
pub fn calculate_uif(income_excluding_commission: Decimal, step_number: u32) -> UifResult {
    let uncapped = income_excluding_commission * UIF_RATE;
    let capped = uncapped > UIF_MONTHLY_CAP;
    let uif = if capped { UIF_MONTHLY_CAP } else { uncapped };

    let reasoning = if capped {
        format!(
            "R{} x {} = R{} exceeds the monthly cap, contribution limited to R{}",
            income_excluding_commission.normalize(),
            UIF_RATE.normalize(),
            uncapped.normalize(),
            UIF_MONTHLY_CAP.normalize()
        )
    } else {
        format!(
            "R{} x {} = R{}",
            income_excluding_commission.normalize(),
            UIF_RATE.normalize(),
            uif.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "uif_contribution".to_string(),
        rule_name: "UIF Contribution".to_string(),
        input: serde_json::json!({
            "total_income_excluding_commission": income_excluding_commission.normalize().to_string(),
            "rate": UIF_RATE.normalize().to_string(),
            "monthly_cap": UIF_MONTHLY_CAP.normalize().to_string()
        }),
        output: serde_json::json!({
            "uif": uif.normalize().to_string(),
            "capped": capped
        }),
        reasoning,
    };

    UifResult {
        uif,
        capped,
        audit_step,
    }
}
