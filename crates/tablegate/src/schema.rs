//! Column metadata as produced by the external schema introspector.

use serde::{Deserialize, Serialize};

/// One discovered column. Immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: String,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub max_length: Option<i64>,
    /// Advisory only; see [`crate::check_constraint`].
    #[serde(default)]
    pub check_constraint_texts: Vec<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            is_nullable: true,
            has_default: false,
            is_identity: false,
            max_length: None,
            check_constraint_texts: Vec::new(),
        }
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn max_length(mut self, len: i64) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn with_check(mut self, text: impl Into<String>) -> Self {
        self.check_constraint_texts.push(text.into());
        self
    }

    pub fn type_class(&self) -> SqlTypeClass {
        SqlTypeClass::of(&self.sql_type)
    }

    pub fn data_class(&self) -> DataClass {
        self.type_class().data_class()
    }

    pub fn is_writable(&self) -> bool {
        !self.is_identity
    }
}

/// Find a column by name: exact match first, then ASCII case-insensitive.
pub fn find_column<'a>(columns: &'a [ColumnDescriptor], name: &str) -> Option<&'a ColumnDescriptor> {
    columns
        .iter()
        .find(|c| c.name == name)
        .or_else(|| columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
}

/// Strip any parenthesized length/precision suffix and lower-case.
///
/// `"NVARCHAR(50)"` → `"nvarchar"`, `"decimal(10, 2)"` → `"decimal"`.
pub fn normalize_sql_type(sql_type: &str) -> String {
    let base = match sql_type.find('(') {
        Some(i) => &sql_type[..i],
        None => sql_type,
    };
    base.trim().to_ascii_lowercase()
}

/// Semantic class of a SQL data type, used for value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlTypeClass {
    /// `int`, `bigint`, `smallint`, `tinyint`
    Integer,
    /// `decimal`, `numeric`, `float`, `real`, `money`, `smallmoney`
    Decimal,
    /// `bit`
    Bit,
    /// `date`
    Date,
    /// `datetime`, `datetime2`, `smalldatetime`
    DateTime,
    /// `time`
    Time,
    /// Everything else
    Text,
}

impl SqlTypeClass {
    pub fn of(sql_type: &str) -> Self {
        match normalize_sql_type(sql_type).as_str() {
            "int" | "bigint" | "smallint" | "tinyint" => Self::Integer,
            "decimal" | "numeric" | "float" | "real" | "money" | "smallmoney" => Self::Decimal,
            "bit" => Self::Bit,
            "date" => Self::Date,
            "datetime" | "datetime2" | "smalldatetime" => Self::DateTime,
            "time" => Self::Time,
            _ => Self::Text,
        }
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }

    pub fn data_class(self) -> DataClass {
        match self {
            Self::Integer | Self::Decimal => DataClass::Numeric,
            Self::Bit => DataClass::Boolean,
            Self::Date | Self::DateTime => DataClass::Date,
            Self::Time | Self::Text => DataClass::Text,
        }
    }
}

/// Coarse data class that condition rules are authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataClass {
    Text,
    Numeric,
    Date,
    Boolean,
}

impl DataClass {
    pub fn from_sql_type(sql_type: &str) -> Self {
        SqlTypeClass::of(sql_type).data_class()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_type_names() {
        assert_eq!(normalize_sql_type("NVARCHAR(50)"), "nvarchar");
        assert_eq!(normalize_sql_type("decimal(10, 2)"), "decimal");
        assert_eq!(normalize_sql_type(" Int "), "int");
    }

    #[test]
    fn classifies_types() {
        assert_eq!(SqlTypeClass::of("BIGINT"), SqlTypeClass::Integer);
        assert_eq!(SqlTypeClass::of("money"), SqlTypeClass::Decimal);
        assert_eq!(SqlTypeClass::of("bit"), SqlTypeClass::Bit);
        assert_eq!(SqlTypeClass::of("datetime2(7)"), SqlTypeClass::DateTime);
        assert_eq!(SqlTypeClass::of("time(0)"), SqlTypeClass::Time);
        assert_eq!(SqlTypeClass::of("uniqueidentifier"), SqlTypeClass::Text);
        assert_eq!(DataClass::from_sql_type("smalldatetime"), DataClass::Date);
        assert_eq!(DataClass::from_sql_type("tinyint"), DataClass::Numeric);
    }

    #[test]
    fn finds_columns_case_insensitively() {
        let cols = vec![
            ColumnDescriptor::new("Age", "int"),
            ColumnDescriptor::new("age", "nvarchar(10)"),
            ColumnDescriptor::new("Name", "nvarchar(50)"),
        ];
        assert_eq!(find_column(&cols, "age").unwrap().sql_type, "nvarchar(10)");
        assert_eq!(find_column(&cols, "NAME").unwrap().name, "Name");
        assert!(find_column(&cols, "Missing").is_none());
    }

    #[test]
    fn deserializes_camel_case() {
        let col: ColumnDescriptor = serde_json::from_str(
            r#"{"name":"Id","sqlType":"int","isIdentity":true,"checkConstraintTexts":["([Id]>(0))"]}"#,
        )
        .unwrap();
        assert!(col.is_identity);
        assert!(!col.is_writable());
        assert_eq!(col.check_constraint_texts.len(), 1);
    }
}
