//! Collaborator payload adapters.
//!
//! The User Input Service and the Tax Table Service have both shipped more
//! than one response shape. The functions here accept every known shape and
//! translate it into the canonical [`UserInput`] and [`TaxDetails`] types,
//! reporting all missing fields at once rather than stopping at the first.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::calculation::classify_age;
use crate::error::{Collaborator, EngineError, EngineResult};
use crate::models::{
    AgeGroup, IncomeSource, IntermediateIncome, RawIncomeInput, TaxBracketInfo, TaxDetails,
    UserInput,
};

const INCOME_COMPONENTS: [&str; 5] = ["basic_salary", "commission", "bonus", "overtime", "leave_pay"];

const PRECOMPUTED_AGGREGATES: [&str; 4] = [
    "total_income",
    "total_income_excluding_commission",
    "projected_annual_income",
    "projected_annual_income_plus_bonus_leave",
];

/// Largest magnitude accepted for any amount (R1 quadrillion). Keeps every
/// downstream product well inside the range of `Decimal`.
const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);

const MAX_TAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

const NESTED_EXCLUDING: &str = "tax_details_excluding_bonus_and_leave";
const NESTED_INCLUDING: &str = "tax_details_including_bonus_and_leave";

/// Parses a User Input Service payload.
///
/// The payload may be wrapped in a `data` object. When it carries
/// `total_income` it is treated as precomputed aggregates; otherwise as raw
/// salary components, where `month` and `year` are required and an absent
/// `age` or salary component defaults to zero.
///
/// # Errors
///
/// - `InputIncomplete` listing every missing required field
/// - `InputInvalid` for a wrongly typed value, a month outside 1 to 12, or an
///   amount that is negative or above R1 quadrillion
///
/// # Examples
///
/// ```
/// use paye_engine::pipeline::parse_user_input;
/// use paye_engine::models::IncomeSource;
/// use serde_json::json;
///
/// let payload = json!({
///     "data": {"basic_salary": 25000, "commission": 2000, "month": 3, "year": 2025, "age": 40}
/// });
/// let input = parse_user_input(&payload).unwrap();
/// assert_eq!(input.month, 3);
/// assert!(matches!(input.income, IncomeSource::Components(_)));
/// ```
pub fn parse_user_input(payload: &Value) -> EngineResult<UserInput> {
    let fields = payload_fields(payload, Collaborator::UserInput)?;
    let mut reader = PayloadReader::new(Collaborator::UserInput);

    let month = reader.required_integer(fields, "month")?;
    let year = reader.required_integer(fields, "year")?;

    let income = if fields.contains_key("total_income") {
        let mut amounts = [Decimal::ZERO; 4];
        for (amount, key) in amounts.iter_mut().zip(PRECOMPUTED_AGGREGATES) {
            *amount = reader.required_decimal(fields, key)?;
        }
        reader.finish()?;
        for (amount, key) in amounts.iter().zip(PRECOMPUTED_AGGREGATES) {
            ensure_not_negative(*amount, key)?;
        }

        let age_group = match lookup(fields, "age_group") {
            Some(value) => Some(to_age_group(value)?),
            None => match lookup(fields, "age") {
                Some(value) => Some(classify_age(to_age(value)?)?),
                None => None,
            },
        };

        let [
            total_income,
            total_income_excluding_commission,
            projected_annual_income,
            projected_annual_income_plus_bonus_leave,
        ] = amounts;

        IncomeSource::Precomputed(IntermediateIncome {
            total_income,
            total_income_excluding_commission,
            projected_annual_income,
            projected_annual_income_plus_bonus_leave,
            age_group,
        })
    } else {
        reader.finish()?;
        let age = match lookup(fields, "age") {
            Some(value) => to_age(value)?,
            None => 0,
        };

        let mut components = [Decimal::ZERO; 5];
        for (component, key) in components.iter_mut().zip(INCOME_COMPONENTS) {
            if let Some(value) = lookup(fields, key) {
                let amount = to_decimal(value, key, Collaborator::UserInput)?;
                ensure_not_negative(amount, key)?;
                *component = amount;
            }
        }
        let [basic_salary, commission, bonus, overtime, leave_pay] = components;

        IncomeSource::Components(RawIncomeInput {
            basic_salary,
            commission,
            bonus,
            overtime,
            leave_pay,
            age: Some(age),
        })
    };

    let month = u32::try_from(month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| {
            EngineError::invalid(
                Collaborator::UserInput,
                "month",
                format!("Month must be between 1 and 12, got {}", month),
            )
        })?;

    Ok(UserInput {
        month,
        year: narrow(year, "year")?,
        income,
    })
}

/// Parses a Tax Table Service payload.
///
/// Accepts the nested shape (two objects of `min_income`,
/// `tax_on_previous_brackets` and `tax_percentage`) and the flat shape
/// (`projected_annual_income_*` and `income_tax_*` fields). `rebate_value` is
/// required in both. Missing nested fields are reported with dotted names,
/// e.g. `tax_details_including_bonus_and_leave.tax_percentage`.
///
/// # Errors
///
/// - `InputIncomplete` listing every missing field
/// - `InputInvalid` for a wrongly typed value, an amount above R1
///   quadrillion, or a tax percentage outside 0 to 100
///
/// # Examples
///
/// ```
/// use paye_engine::pipeline::parse_tax_details;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let payload = json!({
///     "projected_annual_income_min_income": 237101,
///     "projected_annual_income_tax_on_previous_brackets": 42678,
///     "projected_annual_income_tax_percentage": 26,
///     "income_tax_min_income": 370501,
///     "income_tax_on_previous_brackets": 77362,
///     "income_tax_percentage": 31,
///     "rebate_value": 17235
/// });
/// let details = parse_tax_details(&payload).unwrap();
/// assert_eq!(details.tax_details_including_bonus_and_leave.tax_percentage, Decimal::new(31, 0));
/// ```
pub fn parse_tax_details(payload: &Value) -> EngineResult<TaxDetails> {
    let fields = payload_fields(payload, Collaborator::TaxTable)?;
    let mut reader = PayloadReader::new(Collaborator::TaxTable);

    let (excluding, including) = if fields.contains_key(NESTED_EXCLUDING) {
        (
            reader.nested_bracket(fields, NESTED_EXCLUDING)?,
            reader.nested_bracket(fields, NESTED_INCLUDING)?,
        )
    } else {
        (
            reader.flat_bracket(
                fields,
                [
                    "projected_annual_income_min_income",
                    "projected_annual_income_tax_on_previous_brackets",
                    "projected_annual_income_tax_percentage",
                ],
            )?,
            reader.flat_bracket(
                fields,
                [
                    "income_tax_min_income",
                    "income_tax_on_previous_brackets",
                    "income_tax_percentage",
                ],
            )?,
        )
    };
    let rebate_value = reader.required_decimal(fields, "rebate_value")?;
    reader.finish()?;

    Ok(TaxDetails {
        tax_details_excluding_bonus_and_leave: excluding,
        tax_details_including_bonus_and_leave: including,
        rebate_value,
    })
}

/// Collects missing fields while reading a payload.
///
/// Absent values yield a zero placeholder so reading can continue; the
/// placeholders must not be used unless [`PayloadReader::finish`] succeeds.
struct PayloadReader {
    origin: Collaborator,
    section: Option<&'static str>,
    missing: Vec<String>,
}

impl PayloadReader {
    fn new(origin: Collaborator) -> Self {
        Self {
            origin,
            section: None,
            missing: Vec::new(),
        }
    }

    fn label(&self, key: &str) -> String {
        match self.section {
            Some(section) => format!("{}.{}", section, key),
            None => key.to_string(),
        }
    }

    fn required_decimal(&mut self, fields: &Map<String, Value>, key: &str) -> EngineResult<Decimal> {
        let label = self.label(key);
        match lookup(fields, key) {
            Some(value) => to_decimal(value, &label, self.origin),
            None => {
                self.missing.push(label);
                Ok(Decimal::ZERO)
            }
        }
    }

    fn required_integer(&mut self, fields: &Map<String, Value>, key: &str) -> EngineResult<i64> {
        let label = self.label(key);
        match lookup(fields, key) {
            Some(value) => to_integer(value, &label, self.origin),
            None => {
                self.missing.push(label);
                Ok(0)
            }
        }
    }

    fn nested_bracket(
        &mut self,
        fields: &Map<String, Value>,
        section: &'static str,
    ) -> EngineResult<TaxBracketInfo> {
        let placeholder = TaxBracketInfo {
            min_income: Decimal::ZERO,
            tax_on_previous_brackets: Decimal::ZERO,
            tax_percentage: Decimal::ZERO,
        };

        let nested = match lookup(fields, section) {
            Some(Value::Object(nested)) => nested,
            Some(other) => {
                return Err(EngineError::invalid(
                    self.origin,
                    section,
                    format!("expected an object, got {}", type_name(other)),
                ));
            }
            None => {
                self.missing.push(section.to_string());
                return Ok(placeholder);
            }
        };

        self.section = Some(section);
        let bracket = self.flat_bracket(
            nested,
            ["min_income", "tax_on_previous_brackets", "tax_percentage"],
        );
        self.section = None;
        bracket
    }

    fn flat_bracket(
        &mut self,
        fields: &Map<String, Value>,
        [min_income, tax_on_previous_brackets, tax_percentage]: [&str; 3],
    ) -> EngineResult<TaxBracketInfo> {
        let bracket = TaxBracketInfo {
            min_income: self.required_decimal(fields, min_income)?,
            tax_on_previous_brackets: self.required_decimal(fields, tax_on_previous_brackets)?,
            tax_percentage: self.required_decimal(fields, tax_percentage)?,
        };

        if bracket.tax_percentage < Decimal::ZERO || bracket.tax_percentage > MAX_TAX_PERCENTAGE {
            return Err(EngineError::invalid(
                self.origin,
                self.label(tax_percentage),
                format!(
                    "must be between 0 and 100, got {}",
                    bracket.tax_percentage.normalize()
                ),
            ));
        }
        Ok(bracket)
    }

    fn finish(&mut self) -> EngineResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InputIncomplete {
                origin: self.origin,
                missing: std::mem::take(&mut self.missing),
            })
        }
    }
}

fn payload_fields(payload: &Value, origin: Collaborator) -> EngineResult<&Map<String, Value>> {
    let object = payload.as_object().ok_or_else(|| {
        EngineError::invalid(
            origin,
            "payload",
            format!("{} returned {}, expected an object", origin, type_name(payload)),
        )
    })?;

    match object.get("data") {
        Some(Value::Object(inner)) => Ok(inner),
        _ => Ok(object),
    }
}

/// Null is treated the same as an absent key.
fn lookup<'v>(fields: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn to_decimal(value: &Value, label: &str, origin: Collaborator) -> EngineResult<Decimal> {
    let amount = match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| {
                    EngineError::invalid(
                        origin,
                        label,
                        format!("{} is not a representable amount", text),
                    )
                })?
        }
        other => {
            return Err(EngineError::invalid(
                origin,
                label,
                format!("expected a number, got {}", type_name(other)),
            ));
        }
    };

    if amount.abs() > MAX_AMOUNT {
        return Err(EngineError::invalid(
            origin,
            label,
            format!("{} exceeds the maximum supported amount of {}", amount, MAX_AMOUNT),
        ));
    }
    Ok(amount)
}

fn to_integer(value: &Value, label: &str, origin: Collaborator) -> EngineResult<i64> {
    match value {
        Value::Number(number) => number.as_i64().ok_or_else(|| {
            EngineError::invalid(origin, label, format!("expected an integer, got {}", number))
        }),
        other => Err(EngineError::invalid(
            origin,
            label,
            format!("expected an integer, got {}", type_name(other)),
        )),
    }
}

fn to_age(value: &Value) -> EngineResult<i32> {
    narrow(to_integer(value, "age", Collaborator::UserInput)?, "age")
}

fn to_age_group(value: &Value) -> EngineResult<AgeGroup> {
    serde_json::from_value(value.clone()).map_err(|_| {
        EngineError::invalid(
            Collaborator::UserInput,
            "age_group",
            format!("unknown age group {}", value),
        )
    })
}

fn narrow(value: i64, label: &str) -> EngineResult<i32> {
    i32::try_from(value).map_err(|_| {
        EngineError::invalid(
            Collaborator::UserInput,
            label,
            format!("{} is out of range", value),
        )
    })
}

fn ensure_not_negative(amount: Decimal, label: &str) -> EngineResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::invalid(
            Collaborator::UserInput,
            label,
            format!("must not be negative, got {}", amount),
        ));
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn raw_components(input: &UserInput) -> &RawIncomeInput {
        match &input.income {
            IncomeSource::Components(raw) => raw,
            other => panic!("Expected components, got {:?}", other),
        }
    }

    fn missing_fields(error: EngineError) -> (Collaborator, Vec<String>) {
        match error {
            EngineError::InputIncomplete { origin, missing } => (origin, missing),
            other => panic!("Expected InputIncomplete, got {:?}", other),
        }
    }

    // ==========================================================================
    // User input
    // ==========================================================================

    #[test]
    fn test_raw_components_parsed() {
        let payload = json!({
            "basic_salary": 25000,
            "commission": 2000.50,
            "bonus": 1500,
            "overtime": 750,
            "leave_pay": 500,
            "age": 42,
            "month": 6,
            "year": 2025
        });

        let input = parse_user_input(&payload).unwrap();
        let raw = raw_components(&input);

        assert_eq!(input.month, 6);
        assert_eq!(input.year, 2025);
        assert_eq!(raw.basic_salary, dec("25000"));
        assert_eq!(raw.commission, dec("2000.5"));
        assert_eq!(raw.age, Some(42));
    }

    #[test]
    fn test_data_wrapper_is_unwrapped() {
        let payload = json!({"data": {"basic_salary": 10000, "age": 30, "month": 1, "year": 2025}});
        let input = parse_user_input(&payload).unwrap();
        assert_eq!(raw_components(&input).basic_salary, dec("10000"));
    }

    #[test]
    fn test_absent_components_default_to_zero() {
        let payload = json!({"basic_salary": 10000, "bonus": null, "age": 30, "month": 1, "year": 2025});
        let input = parse_user_input(&payload).unwrap();
        let raw = raw_components(&input);

        assert_eq!(raw.bonus, Decimal::ZERO);
        assert_eq!(raw.commission, Decimal::ZERO);
        assert_eq!(raw.leave_pay, Decimal::ZERO);
    }

    #[test]
    fn test_zero_values_count_as_present() {
        let payload = json!({"basic_salary": 0, "age": 0, "month": 1, "year": 2025});
        let input = parse_user_input(&payload).unwrap();
        assert_eq!(raw_components(&input).age, Some(0));
    }

    #[test]
    fn test_every_missing_required_field_is_listed() {
        let payload = json!({"basic_salary": 10000, "month": null});
        let (origin, missing) = missing_fields(parse_user_input(&payload).unwrap_err());

        assert_eq!(origin, Collaborator::UserInput);
        assert_eq!(missing, vec!["month", "year"]);
    }

    #[test]
    fn test_absent_age_defaults_to_zero() {
        for payload in [
            json!({"basic_salary": 10000, "month": 1, "year": 2025}),
            json!({"basic_salary": 10000, "age": null, "month": 1, "year": 2025}),
        ] {
            let input = parse_user_input(&payload).unwrap();
            assert_eq!(raw_components(&input).age, Some(0));
        }
    }

    #[test]
    fn test_huge_amount_is_invalid() {
        let payload = json!({"basic_salary": 1e28, "age": 30, "month": 1, "year": 2025});
        match parse_user_input(&payload).unwrap_err() {
            EngineError::InputInvalid { origin, field, message } => {
                assert_eq!(origin, Collaborator::UserInput);
                assert_eq!(field, "basic_salary");
                assert!(message.contains("exceeds the maximum supported amount"));
            }
            other => panic!("Expected InputInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_at_maximum_is_accepted() {
        let payload = json!({"basic_salary": 1e15, "age": 30, "month": 1, "year": 2025});
        let input = parse_user_input(&payload).unwrap();
        assert_eq!(raw_components(&input).basic_salary, MAX_AMOUNT);
    }

    #[test]
    fn test_string_amount_is_invalid() {
        let payload = json!({"basic_salary": "10000", "age": 30, "month": 1, "year": 2025});
        match parse_user_input(&payload).unwrap_err() {
            EngineError::InputInvalid { origin, field, message } => {
                assert_eq!(origin, Collaborator::UserInput);
                assert_eq!(field, "basic_salary");
                assert_eq!(message, "expected a number, got a string");
            }
            other => panic!("Expected InputInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_month_is_invalid() {
        let payload = json!({"age": 30, "month": 1.5, "year": 2025});
        assert!(matches!(
            parse_user_input(&payload),
            Err(EngineError::InputInvalid { ref field, .. }) if field == "month"
        ));
    }

    #[test]
    fn test_month_out_of_range_is_invalid() {
        for month in [0, 13] {
            let payload = json!({"age": 30, "month": month, "year": 2025});
            assert!(matches!(
                parse_user_input(&payload),
                Err(EngineError::InputInvalid { ref field, .. }) if field == "month"
            ));
        }
    }

    #[test]
    fn test_negative_component_is_invalid() {
        let payload = json!({"basic_salary": 10000, "overtime": -1, "age": 30, "month": 1, "year": 2025});
        assert!(matches!(
            parse_user_input(&payload),
            Err(EngineError::InputInvalid { ref field, .. }) if field == "overtime"
        ));
    }

    #[test]
    fn test_non_object_payload_is_invalid() {
        assert!(matches!(
            parse_user_input(&json!([1, 2, 3])),
            Err(EngineError::InputInvalid { ref field, .. }) if field == "payload"
        ));
    }

    #[test]
    fn test_precomputed_aggregates_parsed() {
        let payload = json!({
            "total_income": 30000,
            "total_income_excluding_commission": 28000,
            "projected_annual_income": 360000,
            "projected_annual_income_plus_bonus_leave": 384000,
            "age_group": "Secondary (65 and older)",
            "month": 2,
            "year": 2025
        });

        let input = parse_user_input(&payload).unwrap();
        match input.income {
            IncomeSource::Precomputed(income) => {
                assert_eq!(income.total_income_excluding_commission, dec("28000"));
                assert_eq!(income.age_group, Some(AgeGroup::Secondary));
            }
            other => panic!("Expected precomputed, got {:?}", other),
        }
    }

    #[test]
    fn test_precomputed_age_group_derived_from_age() {
        let payload = json!({
            "total_income": 30000,
            "total_income_excluding_commission": 28000,
            "projected_annual_income": 360000,
            "projected_annual_income_plus_bonus_leave": 384000,
            "age": 80,
            "month": 2,
            "year": 2025
        });

        match parse_user_input(&payload).unwrap().income {
            IncomeSource::Precomputed(income) => {
                assert_eq!(income.age_group, Some(AgeGroup::Tertiary))
            }
            other => panic!("Expected precomputed, got {:?}", other),
        }
    }

    #[test]
    fn test_precomputed_missing_aggregates_listed() {
        let payload = json!({"total_income": 30000, "month": 2, "year": 2025});
        let (_, missing) = missing_fields(parse_user_input(&payload).unwrap_err());
        assert_eq!(
            missing,
            vec![
                "total_income_excluding_commission",
                "projected_annual_income",
                "projected_annual_income_plus_bonus_leave",
            ]
        );
    }

    #[test]
    fn test_precomputed_unknown_age_group_is_invalid() {
        let payload = json!({
            "total_income": 30000,
            "total_income_excluding_commission": 28000,
            "projected_annual_income": 360000,
            "projected_annual_income_plus_bonus_leave": 384000,
            "age_group": "Quaternary",
            "month": 2,
            "year": 2025
        });
        assert!(matches!(
            parse_user_input(&payload),
            Err(EngineError::InputInvalid { ref field, .. }) if field == "age_group"
        ));
    }

    // ==========================================================================
    // Tax details
    // ==========================================================================

    fn nested_payload() -> Value {
        json!({
            "tax_details_excluding_bonus_and_leave": {
                "min_income": 400000,
                "tax_on_previous_brackets": 50000,
                "tax_percentage": 25
            },
            "tax_details_including_bonus_and_leave": {
                "min_income": 400000,
                "tax_on_previous_brackets": 50000,
                "tax_percentage": 30
            },
            "rebate_value": 15000
        })
    }

    #[test]
    fn test_nested_tax_details_parsed() {
        let details = parse_tax_details(&nested_payload()).unwrap();

        assert_eq!(
            details.tax_details_excluding_bonus_and_leave.tax_percentage,
            dec("25")
        );
        assert_eq!(
            details.tax_details_including_bonus_and_leave.tax_percentage,
            dec("30")
        );
        assert_eq!(details.rebate_value, dec("15000"));
    }

    #[test]
    fn test_flat_tax_details_parsed() {
        let payload = json!({
            "projected_annual_income_min_income": 237101,
            "projected_annual_income_tax_on_previous_brackets": 42678,
            "projected_annual_income_tax_percentage": 26,
            "income_tax_min_income": 370501,
            "income_tax_on_previous_brackets": 77362,
            "income_tax_percentage": 31,
            "rebate_value": 17235
        });

        let details = parse_tax_details(&payload).unwrap();
        assert_eq!(
            details.tax_details_excluding_bonus_and_leave.min_income,
            dec("237101")
        );
        assert_eq!(
            details.tax_details_including_bonus_and_leave.tax_on_previous_brackets,
            dec("77362")
        );
    }

    #[test]
    fn test_nested_missing_fields_use_dotted_names() {
        let mut payload = nested_payload();
        payload[NESTED_INCLUDING]
            .as_object_mut()
            .unwrap()
            .remove("tax_percentage");
        payload.as_object_mut().unwrap().remove("rebate_value");

        let (origin, missing) = missing_fields(parse_tax_details(&payload).unwrap_err());
        assert_eq!(origin, Collaborator::TaxTable);
        assert_eq!(
            missing,
            vec![
                "tax_details_including_bonus_and_leave.tax_percentage",
                "rebate_value",
            ]
        );
    }

    #[test]
    fn test_nested_missing_section_listed_by_name() {
        let mut payload = nested_payload();
        payload.as_object_mut().unwrap().remove(NESTED_INCLUDING);

        let (_, missing) = missing_fields(parse_tax_details(&payload).unwrap_err());
        assert_eq!(missing, vec!["tax_details_including_bonus_and_leave"]);
    }

    #[test]
    fn test_empty_tax_payload_lists_flat_fields() {
        let (_, missing) = missing_fields(parse_tax_details(&json!({})).unwrap_err());
        assert_eq!(missing.len(), 7);
        assert_eq!(missing[0], "projected_annual_income_min_income");
        assert_eq!(missing[6], "rebate_value");
    }

    #[test]
    fn test_zero_rebate_is_present() {
        let mut payload = nested_payload();
        payload["rebate_value"] = json!(0);
        let details = parse_tax_details(&payload).unwrap();
        assert_eq!(details.rebate_value, Decimal::ZERO);
    }

    #[test]
    fn test_wrongly_typed_tax_field_is_attributed_to_tax_table() {
        let mut payload = nested_payload();
        payload[NESTED_EXCLUDING]["tax_percentage"] = json!("25");

        match parse_tax_details(&payload).unwrap_err() {
            EngineError::InputInvalid { origin, field, .. } => {
                assert_eq!(origin, Collaborator::TaxTable);
                assert_eq!(field, "tax_details_excluding_bonus_and_leave.tax_percentage");
            }
            other => panic!("Expected InputInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_tax_percentage_above_100_is_invalid() {
        let mut payload = nested_payload();
        payload[NESTED_INCLUDING]["tax_percentage"] = json!(145);

        assert!(matches!(
            parse_tax_details(&payload),
            Err(EngineError::InputInvalid { origin: Collaborator::TaxTable, ref field, .. })
                if field == "tax_details_including_bonus_and_leave.tax_percentage"
        ));
    }

    #[test]
    fn test_huge_rebate_is_invalid() {
        let mut payload = nested_payload();
        payload["rebate_value"] = json!(1e20);

        assert!(matches!(
            parse_tax_details(&payload),
            Err(EngineError::InputInvalid { origin: Collaborator::TaxTable, ref field, .. })
                if field == "rebate_value"
        ));
    }

    #[test]
    fn test_scientific_notation_amount() {
        let mut payload = nested_payload();
        payload["rebate_value"] = json!(1.5e4);
        let details = parse_tax_details(&payload).unwrap();
        assert_eq!(details.rebate_value, dec("15000"));
    }
}
