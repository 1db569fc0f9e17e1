//! Error types for tablegate

use thiserror::Error;

use crate::date::DateError;

/// Result type alias for tablegate operations
pub type GateResult<T> = Result<T, GateError>;

/// Error types for query compilation, write-clause compilation and validation.
///
/// Every variant except [`GateError::MalformedCondition`] and
/// [`GateError::Identifier`] describes bad client input and maps to a 4xx response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    /// Unparseable or calendar-invalid date string
    #[error("Invalid date '{0}': expected DD/MM/YYYY or DD/MM/YYYY HH:MM")]
    InvalidDate(String),

    /// Date string detected as MM/DD/YYYY
    #[error("Date '{0}' looks like MM/DD/YYYY; only DD/MM/YYYY is accepted")]
    AmbiguousRejected(String),

    /// Filter or sort references a column that is not part of the table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Filter value that cannot be coerced to the column type (strict mode only)
    #[error("Invalid filter value for column '{column}': {message}")]
    InvalidFilterValue { column: String, message: String },

    /// Record value that cannot be coerced to the column type
    #[error("Invalid value for column '{column}': {message}")]
    InvalidValue { column: String, message: String },

    /// Date/datetime column received a rejected date string
    #[error("Invalid date format for column '{column}': {message}")]
    DateFormatViolation { column: String, message: String },

    /// Insert or update with no writable fields
    #[error("No writable fields in payload")]
    EmptyPayload,

    /// Update or delete on a table without a primary key
    #[error("Table has no primary key; refusing to build an unrestricted statement")]
    NoPrimaryKey,

    /// Primary key value missing from the key record
    #[error("Missing value for primary key column '{0}'")]
    MissingKeyValue(String),

    /// One or more condition rules failed
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Persisted condition rule that cannot be interpreted
    #[error("Malformed condition on column '{column}': {message}")]
    MalformedCondition { column: String, message: String },

    /// Identifier that cannot be rendered safely
    #[error("Invalid identifier: {0}")]
    Identifier(String),

    /// Failure while processing one record of a bulk operation
    #[error("Row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<GateError>,
    },
}

impl GateError {
    /// Create an invalid value error for a specific column
    pub fn invalid_value(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a malformed condition error for a specific column
    pub fn malformed(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCondition {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap a date error raised while writing `column`.
    pub fn date_format(column: impl Into<String>, err: &DateError) -> Self {
        Self::DateFormatViolation {
            column: column.into(),
            message: err.to_string(),
        }
    }

    /// Attach the zero-based index of the record being processed.
    pub fn at_row(self, index: usize) -> Self {
        Self::Row {
            index,
            source: Box::new(self),
        }
    }

    /// Machine-readable tag for HTTP error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Row { source, .. } => source.error_type(),
            Self::InvalidDate(_) => "InvalidDate",
            Self::AmbiguousRejected(_) => "AmbiguousRejected",
            Self::UnknownColumn(_) => "UnknownColumn",
            Self::InvalidFilterValue { .. } => "InvalidFilterValue",
            Self::InvalidValue { .. } => "InvalidValue",
            Self::DateFormatViolation { .. } => "DateFormatViolation",
            Self::EmptyPayload => "EmptyPayload",
            Self::NoPrimaryKey => "NoPrimaryKey",
            Self::MissingKeyValue(_) => "MissingKeyValue",
            Self::ValidationFailed(_) => "ValidationFailed",
            Self::MalformedCondition { .. } => "MalformedCondition",
            Self::Identifier(_) => "Identifier",
        }
    }

    /// Whether the error was caused by client input (4xx) rather than configuration.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Row { source, .. } => source.is_client_error(),
            Self::MalformedCondition { .. } | Self::Identifier(_) => false,
            _ => true,
        }
    }

    /// The column the error is attached to, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::UnknownColumn(c) | Self::MissingKeyValue(c) => Some(c),
            Self::InvalidFilterValue { column, .. }
            | Self::InvalidValue { column, .. }
            | Self::DateFormatViolation { column, .. }
            | Self::MalformedCondition { column, .. } => Some(column),
            Self::Row { source, .. } => source.column(),
            _ => None,
        }
    }
}

impl From<DateError> for GateError {
    fn from(err: DateError) -> Self {
        match err {
            DateError::Invalid(input) => Self::InvalidDate(input),
            DateError::AmericanFormat(input) => Self::AmbiguousRejected(input),
        }
    }
}
