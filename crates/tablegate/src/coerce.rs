//! Raw value → typed SQL value coercion, driven by a column's declared SQL type.

use crate::date::{self, DateError, DayFirst};
use crate::schema::SqlTypeClass;
use crate::value::{SqlValue, Value};
use thiserror::Error;

/// How strictly numeric input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Filter values: unparseable numbers become `0`.
    Lenient,
    /// Filter values in strict mode, and everything on the write path.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("'{input}' is not a valid {expected}")]
    Number { input: String, expected: &'static str },
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("{found} value cannot be stored in a {target} column")]
    Type {
        found: &'static str,
        target: &'static str,
    },
}

impl CoerceError {
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// Coerce a raw string to the type implied by `sql_type`.
pub fn coerce(raw: &str, sql_type: &str, mode: Coercion) -> Result<SqlValue, CoerceError> {
    coerce_class(raw, SqlTypeClass::of(sql_type), mode)
}

pub(crate) fn coerce_class(
    raw: &str,
    class: SqlTypeClass,
    mode: Coercion,
) -> Result<SqlValue, CoerceError> {
    let trimmed = raw.trim();
    match class {
        SqlTypeClass::Integer => match trimmed.parse::<i64>() {
            Ok(i) => Ok(SqlValue::Int(i)),
            Err(_) if mode == Coercion::Lenient => {
                tracing::debug!(
                    target: "tablegate.query",
                    input = raw,
                    "unparseable integer filter value, using 0"
                );
                Ok(SqlValue::Int(0))
            }
            Err(_) => Err(CoerceError::Number {
                input: raw.to_string(),
                expected: "integer",
            }),
        },
        SqlTypeClass::Decimal => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(SqlValue::Float(f)),
            _ if mode == Coercion::Lenient => {
                tracing::debug!(
                    target: "tablegate.query",
                    input = raw,
                    "unparseable decimal filter value, using 0"
                );
                Ok(SqlValue::Float(0.0))
            }
            _ => Err(CoerceError::Number {
                input: raw.to_string(),
                expected: "number",
            }),
        },
        SqlTypeClass::Bit => Ok(SqlValue::Bool(
            trimmed == "1" || trimmed.eq_ignore_ascii_case("true"),
        )),
        SqlTypeClass::Date | SqlTypeClass::DateTime => Ok(from_day_first(date::parse(raw)?)),
        SqlTypeClass::Time | SqlTypeClass::Text => Ok(SqlValue::Text(raw.to_string())),
    }
}

fn from_day_first(d: DayFirst) -> SqlValue {
    match d {
        DayFirst::Date(d) => SqlValue::Date(d),
        DayFirst::DateTime(dt) => SqlValue::DateTime(dt),
    }
}

/// Strictly coerce a record value for a write. Blank values become `NULL`.
pub fn coerce_value(value: &Value, sql_type: &str) -> Result<SqlValue, CoerceError> {
    let class = SqlTypeClass::of(sql_type);
    if value.is_blank() {
        return Ok(SqlValue::Null);
    }
    match (value, class) {
        (Value::Text(s), _) => coerce_class(s, class, Coercion::Strict),

        (Value::Int(i), SqlTypeClass::Integer) => Ok(SqlValue::Int(*i)),
        (Value::Int(i), SqlTypeClass::Decimal) => Ok(SqlValue::Float(*i as f64)),
        (Value::Int(i), SqlTypeClass::Bit) => Ok(SqlValue::Bool(*i != 0)),

        (Value::Float(f), SqlTypeClass::Integer) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Ok(SqlValue::Int(*f as i64))
            } else {
                Err(CoerceError::Number {
                    input: f.to_string(),
                    expected: "integer",
                })
            }
        }
        (Value::Float(f), SqlTypeClass::Decimal) => Ok(SqlValue::Float(*f)),
        (Value::Float(f), SqlTypeClass::Bit) => Ok(SqlValue::Bool(*f != 0.0)),

        (Value::Bool(b), SqlTypeClass::Integer) => Ok(SqlValue::Int(i64::from(*b))),
        (Value::Bool(b), SqlTypeClass::Decimal) => Ok(SqlValue::Float(f64::from(u8::from(*b)))),
        (Value::Bool(b), SqlTypeClass::Bit) => Ok(SqlValue::Bool(*b)),

        (v, SqlTypeClass::Time | SqlTypeClass::Text) => Ok(SqlValue::Text(v.as_text().into_owned())),

        (v, SqlTypeClass::Date | SqlTypeClass::DateTime) => Err(CoerceError::Type {
            found: kind(v),
            target: "date",
        }),
        (Value::Null, _) => Ok(SqlValue::Null),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) | Value::Float(_) => "numeric",
        Value::Text(_) => "text",
    }
}
