use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Filter operator. Each maps to exactly one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `LIKE %value%`
    Contains,
    /// `LIKE value%`
    StartsWith,
    /// `LIKE %value`
    EndsWith,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessEquals,
}

impl FilterOp {
    /// Parse the wire name (`"greater_than"` etc.).
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "greater_than" => Self::GreaterThan,
            "greater_equals" => Self::GreaterEquals,
            "less_than" => Self::LessThan,
            "less_equals" => Self::LessEquals,
            _ => return None,
        })
    }

    pub fn is_pattern(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    /// The SQL comparison operator.
    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Contains | Self::StartsWith | Self::EndsWith => "LIKE",
            Self::GreaterThan => ">",
            Self::GreaterEquals => ">=",
            Self::LessThan => "<",
            Self::LessEquals => "<=",
        }
    }

    /// Wrap an (already escaped) value in the operator's wildcards.
    pub(crate) fn pattern(self, value: &str) -> String {
        match self {
            Self::Contains => format!("%{value}%"),
            Self::StartsWith => format!("{value}%"),
            Self::EndsWith => format!("%{value}"),
            _ => value.to_string(),
        }
    }
}

/// One client-supplied filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    pub column: String,
    pub operator: FilterOp,
    #[serde(default = "null_value", alias = "value")]
    pub raw_value: Value,
    /// Client-side type hint; the column's declared type takes precedence.
    #[serde(default)]
    pub data_type: Option<String>,
}

fn null_value() -> Value {
    Value::Null
}

impl FilterDescriptor {
    pub fn new(column: impl Into<String>, operator: FilterOp, raw_value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            raw_value: raw_value.into(),
            data_type: None,
        }
    }

    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// At most one per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Pagination bounds; applied only when both are present and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageWindow {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PageWindow {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// `(limit, offset)` when the window is applicable.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) if limit >= 0 && offset >= 0 => Some((limit, offset)),
            _ => None,
        }
    }
}

/// A full list request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub sort: Option<SortDescriptor>,
    #[serde(default)]
    pub page: Option<PageWindow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operator_names() {
        assert_eq!(FilterOp::parse("greater_equals"), Some(FilterOp::GreaterEquals));
        assert_eq!(FilterOp::parse("between"), None);
        assert_eq!(FilterOp::NotEquals.sql_operator(), "!=");
    }

    #[test]
    fn wildcard_placement() {
        assert_eq!(FilterOp::Contains.pattern("ab"), "%ab%");
        assert_eq!(FilterOp::StartsWith.pattern("ab"), "ab%");
        assert_eq!(FilterOp::EndsWith.pattern("ab"), "%ab");
    }

    #[test]
    fn page_window_requires_both_bounds() {
        assert_eq!(PageWindow::new(10, 0).bounds(), Some((10, 0)));
        assert_eq!(PageWindow { limit: Some(10), offset: None }.bounds(), None);
        assert_eq!(PageWindow::new(-1, 0).bounds(), None);
        assert_eq!(PageWindow::new(10, -5).bounds(), None);
    }

    #[test]
    fn deserializes_request() {
        let req: QueryRequest = serde_json::from_str(
            r#"{
                "filters": [
                    {"column": "Age", "operator": "greater_than", "rawValue": "18", "dataType": "int"},
                    {"column": "Name", "operator": "contains", "value": 5}
                ],
                "sort": {"column": "Name", "direction": "desc"},
                "page": {"limit": 20, "offset": 40}
            }"#,
        )
        .unwrap();
        assert_eq!(req.filters.len(), 2);
        assert_eq!(req.filters[0].data_type.as_deref(), Some("int"));
        assert_eq!(req.filters[1].raw_value, Value::Int(5));
        assert_eq!(req.sort.unwrap().direction, SortDirection::Desc);
        assert_eq!(req.page.unwrap().bounds(), Some((20, 40)));
    }
}
