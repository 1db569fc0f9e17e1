use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::{GateError, GateResult};
use crate::schema::DataClass;
use crate::value::Value;

/// A condition rule as persisted by an administrator.
///
/// `condition_value` is the rule's JSON payload (`{"min":1,"max":10}`,
/// `{"pattern":"^A"}`, `{"date":"01/01/2020"}`, `{"expected":true}`, ...). It is
/// parsed once, by [`ConditionRule::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub column_name: String,
    pub data_class: DataClass,
    #[serde(default)]
    pub condition_type: String,
    #[serde(default, alias = "conditionValueJSON", alias = "conditionValueJson")]
    pub condition_value: String,
    #[serde(default)]
    pub is_required: bool,
}

impl ConditionRule {
    pub fn new(
        column_name: impl Into<String>,
        data_class: DataClass,
        condition_type: impl Into<String>,
        condition_value: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            data_class,
            condition_type: condition_type.into(),
            condition_value: condition_value.into(),
            is_required: false,
        }
    }

    /// A rule that only marks `column_name` as required.
    pub fn required_only(column_name: impl Into<String>, data_class: DataClass) -> Self {
        Self::new(column_name, data_class, "required", "").required()
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Parse the payload into a typed [`Condition`].
    ///
    /// Returns `Ok(None)` for a rule that carries no check besides `is_required`.
    pub fn compile(&self) -> GateResult<Option<Condition>> {
        let kind = self.condition_type.trim().to_ascii_lowercase();
        if kind.is_empty() || kind == "required" {
            return Ok(None);
        }
        let params = self.params()?;

        let condition = match (self.data_class, kind.as_str()) {
            (DataClass::Text, "length") => Condition::TextLength {
                min: self.length_bound(params.min.as_ref(), "min")?,
                max: self.length_bound(params.max.as_ref(), "max")?,
            },
            (DataClass::Text, "pattern") => {
                let pattern = params
                    .pattern
                    .ok_or_else(|| self.malformed("pattern condition needs a 'pattern'"))?;
                let regex = Regex::new(&pattern)
                    .map_err(|e| self.malformed(format!("invalid pattern: {e}")))?;
                Condition::TextPattern { pattern, regex }
            }
            (DataClass::Numeric, "range") => Condition::NumericRange {
                min: self.number_bound(params.min.as_ref(), "min")?,
                max: self.number_bound(params.max.as_ref(), "max")?,
            },
            (DataClass::Numeric, "precision") => {
                let decimals = params
                    .decimals
                    .as_ref()
                    .and_then(Value::as_f64)
                    .filter(|d| *d >= 0.0 && d.fract() == 0.0 && *d <= f64::from(u32::MAX))
                    .ok_or_else(|| {
                        self.malformed("precision condition needs a non-negative 'decimals'")
                    })?;
                Condition::NumericPrecision {
                    decimals: decimals as u32,
                }
            }
            (DataClass::Date, "range") => Condition::DateRange {
                min: self.date_bound(params.min.as_ref(), "min")?,
                max: self.date_bound(params.max.as_ref(), "max")?,
            },
            (DataClass::Date, "before") => Condition::DateBefore(
                self.date_bound(params.date.as_ref(), "date")?
                    .ok_or_else(|| self.malformed("before condition needs a 'date'"))?,
            ),
            (DataClass::Date, "after") => Condition::DateAfter(
                self.date_bound(params.date.as_ref(), "date")?
                    .ok_or_else(|| self.malformed("after condition needs a 'date'"))?,
            ),
            (DataClass::Boolean, "value") => Condition::BooleanValue {
                expected: params
                    .expected
                    .as_ref()
                    .filter(|v| !v.is_blank())
                    .map(Value::to_bool)
                    .ok_or_else(|| self.malformed("value condition needs an 'expected'"))?,
            },
            (class, other) => {
                return Err(self.malformed(format!(
                    "unsupported condition '{other}' for {} columns",
                    class.as_str()
                )));
            }
        };

        if let Condition::TextLength { min: None, max: None }
        | Condition::NumericRange { min: None, max: None }
        | Condition::DateRange { min: None, max: None } = condition
        {
            return Err(self.malformed("range condition needs 'min' or 'max'"));
        }
        Ok(Some(condition))
    }

    fn params(&self) -> GateResult<ConditionParams> {
        let raw = self.condition_value.trim();
        if raw.is_empty() {
            return Ok(ConditionParams::default());
        }
        serde_json::from_str(raw).map_err(|e| self.malformed(format!("invalid JSON: {e}")))
    }

    fn malformed(&self, message: impl Into<String>) -> GateError {
        GateError::malformed(&self.column_name, message)
    }

    fn number_bound(&self, v: Option<&Value>, key: &str) -> GateResult<Option<f64>> {
        match v {
            None => Ok(None),
            Some(v) if v.is_blank() => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.malformed(format!("'{key}' is not a number"))),
        }
    }

    fn length_bound(&self, v: Option<&Value>, key: &str) -> GateResult<Option<usize>> {
        match self.number_bound(v, key)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as usize)),
            Some(_) => Err(self.malformed(format!("'{key}' must be a non-negative integer"))),
        }
    }

    fn date_bound(&self, v: Option<&Value>, key: &str) -> GateResult<Option<NaiveDateTime>> {
        match v {
            None => Ok(None),
            Some(v) if v.is_blank() => Ok(None),
            Some(v) => date::parse_any(&v.as_text())
                .map(|d| Some(d.as_datetime()))
                .map_err(|e| self.malformed(format!("'{key}': {e}"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConditionParams {
    #[serde(default)]
    min: Option<Value>,
    #[serde(default)]
    max: Option<Value>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    decimals: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    expected: Option<Value>,
}

/// A compiled, typed condition.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Character count within bounds.
    TextLength {
        min: Option<usize>,
        max: Option<usize>,
    },
    TextPattern {
        pattern: String,
        regex: Regex,
    },
    NumericRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// At most `decimals` digits after the decimal point.
    NumericPrecision {
        decimals: u32,
    },
    DateRange {
        min: Option<NaiveDateTime>,
        max: Option<NaiveDateTime>,
    },
    DateBefore(NaiveDateTime),
    DateAfter(NaiveDateTime),
    BooleanValue {
        expected: bool,
    },
}

impl Condition {
    pub fn needs_number(&self) -> bool {
        matches!(self, Self::NumericRange { .. } | Self::NumericPrecision { .. })
    }

    pub fn needs_date(&self) -> bool {
        matches!(
            self,
            Self::DateRange { .. } | Self::DateBefore(_) | Self::DateAfter(_)
        )
    }
}
