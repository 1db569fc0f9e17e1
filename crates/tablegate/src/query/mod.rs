//! List-query compilation: filters, sort and page window → parameterized
//! `WHERE` / `ORDER BY` / `OFFSET-FETCH` fragments.
//!
//! - Filters with a blank value or an unknown column are dropped, never emitted.
//! - A date filter value that fails day-first parsing is an error, never dropped.
//! - Every literal reaches SQL text only as a `@name` placeholder.
//! - Without a sort, `ORDER BY (SELECT NULL)` keeps `OFFSET/FETCH` legal.
//!
//! # Example
//!
//! ```ignore
//! use tablegate::{ColumnDescriptor, FilterDescriptor, FilterOp, QueryBuilder};
//!
//! let columns = vec![ColumnDescriptor::new("Age", "int")];
//! let filters = vec![FilterDescriptor::new("Age", FilterOp::GreaterThan, "18")];
//! let q = QueryBuilder::new(&columns).build(&filters, None, None)?;
//! assert_eq!(q.where_sql, "WHERE [Age] > @filter_0");
//! ```

mod filter;


pub use filter::{FilterDescriptor, FilterOp, PageWindow, QueryRequest, SortDescriptor, SortDirection};

use crate::coerce::{CoerceError, Coercion, coerce_class};
use crate::config::{EngineConfig, NumericLeniency};
use crate::error::{GateError, GateResult};
use crate::ident::{TableRef, quote_ident};
use crate::schema::{ColumnDescriptor, SqlTypeClass, find_column};
use crate::value::{BoundParameter, ParamList, SqlValue};

/// `ORDER BY` that imposes no ordering but satisfies `OFFSET/FETCH`.
pub const NEUTRAL_ORDER_BY: &str = "ORDER BY (SELECT NULL)";

/// Compiled list-query fragments. Each fragment is either empty or complete.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// `WHERE ...`, or empty when no filter survived.
    pub where_sql: String,
    /// Always present.
    pub order_by_sql: String,
    /// `OFFSET @offset ROWS FETCH NEXT @limit ROWS ONLY`, or empty.
    pub page_sql: String,
    /// Filter parameters first, then `offset`, `limit`.
    pub params: ParamList,
    filter_params: usize,
}

impl CompiledQuery {
    /// `SELECT * FROM <table> <where> <order> <page>`.
    pub fn select_sql(&self, table: &TableRef) -> String {
        join_sql(&[
            format!("SELECT * FROM {}", table.to_sql()).as_str(),
            self.where_sql.as_str(),
            self.order_by_sql.as_str(),
            self.page_sql.as_str(),
        ])
    }

    /// `SELECT COUNT(*) AS total FROM <table> <where>`; bind with [`Self::count_params`].
    pub fn count_sql(&self, table: &TableRef) -> String {
        join_sql(&[
            format!("SELECT COUNT(*) AS total FROM {}", table.to_sql()).as_str(),
            self.where_sql.as_str(),
        ])
    }

    /// Only the filter parameters (no `offset`/`limit`).
    pub fn count_params(&self) -> &[BoundParameter] {
        &self.params.as_slice()[..self.filter_params]
    }

    pub fn has_where(&self) -> bool {
        !self.where_sql.is_empty()
    }
}

fn join_sql(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles list queries against one table's discovered columns.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    columns: &'a [ColumnDescriptor],
    config: EngineConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(columns: &'a [ColumnDescriptor]) -> Self {
        Self {
            columns,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Compile a deserialized [`QueryRequest`].
    pub fn build_request(&self, request: &QueryRequest) -> GateResult<CompiledQuery> {
        self.build(&request.filters, request.sort.as_ref(), request.page.as_ref())
    }

    /// Compile filters, sort and page window.
    ///
    /// Fails only for an unknown sort column or, in strict mode, an uncoercible
    /// filter value. A failure never yields partial fragments.
    pub fn build(
        &self,
        filters: &[FilterDescriptor],
        sort: Option<&SortDescriptor>,
        page: Option<&PageWindow>,
    ) -> GateResult<CompiledQuery> {
        let mut params = ParamList::new();
        let mut clauses = Vec::new();

        for filter in filters {
            if filter.raw_value.is_blank() {
                tracing::debug!(
                    target: "tablegate.query",
                    column = %filter.column,
                    "dropping filter with blank value"
                );
                continue;
            }
            let Some(column) = find_column(self.columns, &filter.column) else {
                tracing::debug!(
                    target: "tablegate.query",
                    column = %filter.column,
                    "dropping filter on unknown column"
                );
                continue;
            };
            let value = self.filter_value(filter, column)?;

            let placeholder = params.push(format!("filter_{}", clauses.len()), value);
            clauses.push(format!(
                "{} {} {}",
                quote_ident(&column.name)?,
                filter.operator.sql_operator(),
                placeholder
            ));
        }
        let filter_params = params.len();

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let order_by_sql = match sort {
            None => NEUTRAL_ORDER_BY.to_string(),
            Some(sort) => {
                let column = find_column(self.columns, &sort.column)
                    .ok_or_else(|| GateError::UnknownColumn(sort.column.clone()))?;
                format!(
                    "ORDER BY {} {}",
                    quote_ident(&column.name)?,
                    sort.direction.as_sql()
                )
            }
        };

        let page_sql = match page.and_then(PageWindow::bounds) {
            None => String::new(),
            Some((limit, offset)) => {
                let limit = match self.config.max_page_size {
                    Some(max) => limit.min(i64::try_from(max).unwrap_or(i64::MAX)),
                    None => limit,
                };
                let offset = params.push("offset", SqlValue::Int(offset));
                let limit = params.push("limit", SqlValue::Int(limit));
                format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
            }
        };

        tracing::debug!(
            target: "tablegate.query",
            filters = clauses.len(),
            params = params.len(),
            "compiled list query"
        );

        Ok(CompiledQuery {
            where_sql,
            order_by_sql,
            page_sql,
            params,
            filter_params,
        })
    }

    /// Coerce a filter's value. Date failures surface as `InvalidDate` or
    /// `AmbiguousRejected` regardless of numeric leniency.
    fn filter_value(
        &self,
        filter: &FilterDescriptor,
        column: &ColumnDescriptor,
    ) -> GateResult<SqlValue> {
        let raw = filter.raw_value.as_text();

        if filter.operator.is_pattern() {
            let text = if self.config.escape_like_wildcards {
                escape_like(&raw)
            } else {
                raw.into_owned()
            };
            return Ok(SqlValue::Text(filter.operator.pattern(&text)));
        }

        let class = if column.sql_type.trim().is_empty() {
            filter
                .data_type
                .as_deref()
                .map_or(SqlTypeClass::Text, SqlTypeClass::of)
        } else {
            column.type_class()
        };
        let mode = match self.config.filter_numbers {
            NumericLeniency::Lenient => Coercion::Lenient,
            NumericLeniency::Strict => Coercion::Strict,
        };

        match coerce_class(&raw, class, mode) {
            Ok(value) => Ok(value),
            Err(CoerceError::Date(err)) => Err(GateError::from(err)),
            Err(err) => Err(GateError::InvalidFilterValue {
                column: column.name.clone(),
                message: err.to_string(),
            }),
        }
    }
}

/// Escape LIKE metacharacters using bracket classes: `%` → `[%]`, `_` → `[_]`,
/// `[` → `[[]`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => out.push_str("[%]"),
            '_' => out.push_str("[_]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }
    out
}
