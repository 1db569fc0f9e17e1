//! Runtime-configurable record validation.
//!
//! Rules are authored per column against the column's coarse
//! [`DataClass`](crate::schema::DataClass) and
//! persisted as [`ConditionRule`]s. [`ConditionSet::compile`] parses every rule
//! payload once into a typed [`Condition`]; [`ConditionSet::validate`] then
//! evaluates a payload against all of them.
//!
//! Evaluation is total: every rule runs and every violation is reported, so a
//! single submission surfaces all of its problems at once.
//!
//! Per field:
//! - A missing, null or blank value fails `required` (if set) and skips every
//!   other check on that field. Without `required` it is skipped silently.
//! - Numeric checks first need the value to parse as a number (`not_a_number`,
//!   reported once per field).
//! - Date checks first need a day-first date (`date_format`, reported once per
//!   field); range checks are skipped when it fails.
//!
//! # Example
//!
//! ```ignore
//! use tablegate::{ConditionRule, DataClass, Record, validate};
//!
//! let rules = vec![ConditionRule::new("Price", DataClass::Numeric, "range", r#"{"max":1000}"#)];
//! let mut payload = Record::new();
//! payload.insert("Price".into(), 1500.into());
//!
//! let verdict = validate(&rules, &payload)?;
//! assert!(!verdict.is_valid);
//! ```

mod rule;
mod verdict;


pub use rule::{Condition, ConditionRule};
pub use verdict::{RowVerdict, ValidationVerdict, Violation, ViolationCode};

use chrono::NaiveDateTime;

use crate::date;
use crate::error::GateResult;
use crate::mutation::record_get;
use crate::value::{Record, Value};

/// Compile `rules` and validate `payload` in one call.
pub fn validate(rules: &[ConditionRule], payload: &Record) -> GateResult<ValidationVerdict> {
    Ok(ConditionSet::compile(rules)?.validate(payload))
}

/// All compiled conditions on one column.
#[derive(Debug, Clone)]
struct FieldRules {
    column: String,
    required: bool,
    conditions: Vec<Condition>,
}

impl FieldRules {
    fn needs_number(&self) -> bool {
        self.conditions.iter().any(Condition::needs_number)
    }

    fn needs_date(&self) -> bool {
        self.conditions.iter().any(Condition::needs_date)
    }
}

/// A compiled, immutable set of condition rules for one table.
#[derive(Debug, Clone, Default)]
pub struct ConditionSet {
    fields: Vec<FieldRules>,
}

impl ConditionSet {
    /// Compile raw rules. Rules on the same column (case-insensitive) are grouped.
    ///
    /// Fails with [`crate::GateError::MalformedCondition`] on the first rule whose
    /// payload cannot be interpreted.
    pub fn compile(rules: &[ConditionRule]) -> GateResult<Self> {
        let mut fields: Vec<FieldRules> = Vec::new();

        for rule in rules {
            let condition = rule.compile()?;
            let idx = match fields
                .iter()
                .position(|f| f.column.eq_ignore_ascii_case(&rule.column_name))
            {
                Some(i) => i,
                None => {
                    fields.push(FieldRules {
                        column: rule.column_name.clone(),
                        required: false,
                        conditions: Vec::new(),
                    });
                    fields.len() - 1
                }
            };
            let field = &mut fields[idx];
            field.required |= rule.is_required;
            field.conditions.extend(condition);
        }

        tracing::debug!(
            target: "tablegate.condition",
            rules = rules.len(),
            fields = fields.len(),
            "compiled condition rules"
        );
        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Evaluate every rule against `payload`. Never short-circuits.
    pub fn validate(&self, payload: &Record) -> ValidationVerdict {
        let mut errors = Vec::new();
        for field in &self.fields {
            check_field(field, payload, &mut errors);
        }
        tracing::debug!(
            target: "tablegate.condition",
            fields = self.fields.len(),
            violations = errors.len(),
            "validated payload"
        );
        ValidationVerdict::from_violations(errors)
    }

    /// Validate each record; returns verdicts for failing rows only.
    pub fn validate_batch(&self, records: &[Record]) -> Vec<RowVerdict> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let verdict = self.validate(record);
                (!verdict.is_valid).then_some(RowVerdict { index, verdict })
            })
            .collect()
    }
}

fn check_field(field: &FieldRules, payload: &Record, errors: &mut Vec<Violation>) {
    let name = field.column.as_str();
    let value = match record_get(payload, name) {
        Some(v) if !v.is_blank() => v,
        _ => {
            if field.required {
                errors.push(Violation::new(
                    name,
                    ViolationCode::Required,
                    format!("{name} is required"),
                ));
            }
            return;
        }
    };

    let number = if field.needs_number() {
        let parsed = value.as_f64();
        if parsed.is_none() {
            errors.push(Violation::new(
                name,
                ViolationCode::NotANumber,
                format!("{name} must be a number"),
            ));
        }
        parsed
    } else {
        None
    };

    let when = if field.needs_date() {
        match date::parse(&value.as_text()) {
            Ok(d) => Some(d.as_datetime()),
            Err(err) => {
                errors.push(Violation::new(
                    name,
                    ViolationCode::DateFormat,
                    format!("{name}: {err}"),
                ));
                None
            }
        }
    } else {
        None
    };

    for condition in &field.conditions {
        if let Some(v) = check(condition, name, value, number, when) {
            errors.push(v);
        }
    }
}

fn check(
    condition: &Condition,
    name: &str,
    value: &Value,
    number: Option<f64>,
    when: Option<NaiveDateTime>,
) -> Option<Violation> {
    match condition {
        Condition::TextLength { min, max } => {
            let len = value.as_text().chars().count();
            let too_short = min.is_some_and(|m| len < m);
            let too_long = max.is_some_and(|m| len > m);
            (too_short || too_long).then(|| {
                Violation::new(
                    name,
                    ViolationCode::Length,
                    match (min, max) {
                        (Some(lo), Some(hi)) => {
                            format!("{name} must be between {lo} and {hi} characters")
                        }
                        (Some(lo), None) => format!("{name} must be at least {lo} characters"),
                        (None, _) => {
                            format!("{name} must be at most {} characters", max.unwrap_or(0))
                        }
                    },
                )
            })
        }
        Condition::TextPattern { pattern, regex } => (!regex.is_match(&value.as_text())).then(|| {
            Violation::new(
                name,
                ViolationCode::Pattern,
                format!("{name} does not match the required pattern {pattern}"),
            )
        }),
        Condition::NumericRange { min, max } => {
            let n = number?;
            if let Some(lo) = min.filter(|lo| n < *lo) {
                return Some(Violation::new(
                    name,
                    ViolationCode::Range,
                    format!("{name} must be at least {lo}"),
                ));
            }
            max.filter(|hi| n > *hi).map(|hi| {
                Violation::new(
                    name,
                    ViolationCode::Range,
                    format!("{name} must be at most {hi}"),
                )
            })
        }
        Condition::NumericPrecision { decimals } => {
            number?;
            let places = decimal_places(&value.as_text());
            (places > *decimals as usize).then(|| {
                Violation::new(
                    name,
                    ViolationCode::Precision,
                    format!("{name} must have at most {decimals} decimal places"),
                )
            })
        }
        Condition::DateRange { min, max } => {
            let when = when?;
            if let Some(lo) = min.filter(|lo| when < *lo) {
                return Some(Violation::new(
                    name,
                    ViolationCode::Range,
                    format!("{name} must be on or after {}", day_first(lo)),
                ));
            }
            max.filter(|hi| when > *hi).map(|hi| {
                Violation::new(
                    name,
                    ViolationCode::Range,
                    format!("{name} must be on or before {}", day_first(hi)),
                )
            })
        }
        Condition::DateBefore(bound) => {
            let when = when?;
            (when >= *bound).then(|| {
                Violation::new(
                    name,
                    ViolationCode::Before,
                    format!("{name} must be before {}", day_first(*bound)),
                )
            })
        }
        Condition::DateAfter(bound) => {
            let when = when?;
            (when <= *bound).then(|| {
                Violation::new(
                    name,
                    ViolationCode::After,
                    format!("{name} must be after {}", day_first(*bound)),
                )
            })
        }
        Condition::BooleanValue { expected } => (value.to_bool() != *expected).then(|| {
            Violation::new(
                name,
                ViolationCode::Value,
                format!("{name} must be {expected}"),
            )
        }),
    }
}

/// Digits after the decimal point in the value's textual form, shifted by any
/// exponent (`1.5e3` has none, `15e-3` has three).
fn decimal_places(text: &str) -> usize {
    let text = text.trim();
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().unwrap_or(0)),
        None => (text, 0),
    };
    let fraction = match mantissa.split_once('.') {
        Some((_, frac)) => frac.len() as i64,
        None => 0,
    };
    usize::try_from(fraction - exponent).unwrap_or(0)
}

/// Bounds render the way users type them.
fn day_first(dt: NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format("%d/%m/%Y").to_string()
    } else {
        dt.format("%d/%m/%Y %H:%M").to_string()
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn counts_decimal_places() {
        assert_eq!(decimal_places("12"), 0);
        assert_eq!(decimal_places("12.50"), 2);
        assert_eq!(decimal_places(" 0.125 "), 3);
        assert_eq!(decimal_places("1.5e3"), 0);
        assert_eq!(decimal_places("1.25E1"), 1);
        assert_eq!(decimal_places("15e-3"), 3);
    }
}
