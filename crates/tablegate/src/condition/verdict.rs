use serde::Serialize;

use crate::error::{GateError, GateResult};

/// A machine-friendly violation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCode {
    Required,
    Length,
    Pattern,
    Range,
    Precision,
    DateFormat,
    NotANumber,
    Before,
    After,
    Value,
}

impl ViolationCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Length => "length",
            Self::Pattern => "pattern",
            Self::Range => "range",
            Self::Precision => "precision",
            Self::DateFormat => "date_format",
            Self::NotANumber => "not_a_number",
            Self::Before => "before",
            Self::After => "after",
            Self::Value => "value",
        }
    }
}

impl Serialize for ViolationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single failed condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// Outcome of validating one payload. `is_valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub errors: Vec<Violation>,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self::from_violations(Vec::new())
    }

    pub fn from_violations(errors: Vec<Violation>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable messages, in evaluation order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|v| v.message.clone()).collect()
    }

    /// `Ok(())` when valid, otherwise [`GateError::ValidationFailed`] with every message.
    pub fn into_result(self) -> GateResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(GateError::ValidationFailed(
                self.errors.into_iter().map(|v| v.message).collect(),
            ))
        }
    }
}

/// A failing row of a batch validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowVerdict {
    /// Zero-based position in the batch.
    pub index: usize,
    pub verdict: ValidationVerdict,
}
