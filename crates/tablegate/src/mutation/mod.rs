//! Write-statement compilation: parameterized `INSERT` / `UPDATE` / `DELETE`
//! fragments for a record payload.
//!
//! - Identity columns are never written.
//! - Only columns present in the discovered column set reach SQL text.
//! - `UPDATE`/`DELETE` always carry a primary-key `WHERE`; without a key the
//!   builder fails with [`GateError::NoPrimaryKey`].
//!
//! # Example
//!
//! ```ignore
//! use tablegate::{ColumnDescriptor, MutationClauseBuilder, Record, TableRef};
//!
//! let columns = vec![
//!     ColumnDescriptor::new("Id", "int").identity(),
//!     ColumnDescriptor::new("Name", "nvarchar(50)"),
//! ];
//! let mut record = Record::new();
//! record.insert("Id".into(), 5.into());
//! record.insert("Name".into(), "x".into());
//!
//! let insert = MutationClauseBuilder::new(&columns).build_insert(&record)?;
//! assert_eq!(insert.to_sql(&TableRef::new("People")), "INSERT INTO [People] ([Name]) VALUES (@Name)");
//! ```

#[cfg(test)]
mod tests;

use crate::coerce::{CoerceError, coerce_value};
use crate::error::{GateError, GateResult};
use crate::ident::{ParamNamer, TableRef, quote_ident};
use crate::schema::{ColumnDescriptor, find_column};
use crate::value::{ParamList, Record, SqlValue, Value};

/// Compiled `INSERT` fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertClause {
    /// `[A], [B]`
    pub columns_sql: String,
    /// `@A, @B`
    pub values_sql: String,
    /// Declared names of the written columns, in order.
    pub columns: Vec<String>,
    pub params: ParamList,
}

impl InsertClause {
    pub fn to_sql(&self, table: &TableRef) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.to_sql(),
            self.columns_sql,
            self.values_sql
        )
    }
}

/// Compiled `UPDATE` fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateClause {
    /// `SET [A] = @A, [B] = @B`
    pub set_sql: String,
    /// `WHERE [Id] = @where_Id`
    pub where_sql: String,
    pub params: ParamList,
}

impl UpdateClause {
    pub fn to_sql(&self, table: &TableRef) -> String {
        format!("UPDATE {} {} {}", table.to_sql(), self.set_sql, self.where_sql)
    }
}

/// Compiled `DELETE` fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteClause {
    /// `WHERE [Id] = @where_Id`
    pub where_sql: String,
    pub params: ParamList,
}

impl DeleteClause {
    pub fn to_sql(&self, table: &TableRef) -> String {
        format!("DELETE FROM {} {}", table.to_sql(), self.where_sql)
    }
}

/// Look up a record value by column name: exact key first, then ASCII case-insensitive.
pub fn record_get<'r>(record: &'r Record, column: &str) -> Option<&'r Value> {
    record.get(column).or_else(|| {
        record
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(column))
            .map(|(_, v)| v)
    })
}

/// Coerce a record value for `column`, mapping failures to write-path errors.
fn bind_value(column: &ColumnDescriptor, value: &Value) -> GateResult<SqlValue> {
    coerce_value(value, &column.sql_type).map_err(|err| match err {
        CoerceError::Date(date_err) => GateError::date_format(&column.name, &date_err),
        other if column.type_class().is_temporal() => GateError::DateFormatViolation {
            column: column.name.clone(),
            message: other.to_string(),
        },
        other => GateError::invalid_value(&column.name, other.to_string()),
    })
}

/// Compiles write statements against one table's discovered columns.
#[derive(Debug, Clone, Copy)]
pub struct MutationClauseBuilder<'a> {
    columns: &'a [ColumnDescriptor],
}

impl<'a> MutationClauseBuilder<'a> {
    pub fn new(columns: &'a [ColumnDescriptor]) -> Self {
        Self { columns }
    }

    /// Writable columns whose value in `record` is present and non-blank.
    pub fn build_insert(&self, record: &Record) -> GateResult<InsertClause> {
        let mut namer = ParamNamer::new();
        let mut params = ParamList::new();
        let mut idents = Vec::new();
        let mut placeholders = Vec::new();
        let mut written = Vec::new();

        for column in self.columns.iter().filter(|c| c.is_writable()) {
            let Some(value) = record_get(record, &column.name) else {
                continue;
            };
            if value.is_blank() {
                continue;
            }
            let bound = bind_value(column, value)?;
            idents.push(quote_ident(&column.name)?);
            placeholders.push(params.push(namer.claim("", &column.name), bound));
            written.push(column.name.clone());
        }

        if written.is_empty() {
            return Err(GateError::EmptyPayload);
        }
        self.log_ignored(record);
        tracing::debug!(
            target: "tablegate.mutation",
            columns = written.len(),
            "compiled insert"
        );

        Ok(InsertClause {
            columns_sql: idents.join(", "),
            values_sql: placeholders.join(", "),
            columns: written,
            params,
        })
    }

    /// `SET` every non-key, non-identity column present in `record`; `WHERE` on
    /// `primary_keys`, whose values are read from `record`.
    ///
    /// Blank values set the column to `NULL` (rejected for non-nullable columns).
    pub fn build_update(&self, record: &Record, primary_keys: &[&str]) -> GateResult<UpdateClause> {
        if primary_keys.is_empty() {
            return Err(GateError::NoPrimaryKey);
        }
        let is_key = |name: &str| primary_keys.iter().any(|k| k.eq_ignore_ascii_case(name));

        let mut namer = ParamNamer::new();
        let mut params = ParamList::new();
        let mut assignments = Vec::new();

        for column in self.columns.iter().filter(|c| c.is_writable()) {
            if is_key(&column.name) {
                continue;
            }
            let Some(value) = record_get(record, &column.name) else {
                continue;
            };
            if value.is_blank() && !column.is_nullable {
                return Err(GateError::invalid_value(
                    &column.name,
                    "column does not accept empty values",
                ));
            }
            let bound = bind_value(column, value)?;
            let placeholder = params.push(namer.claim("", &column.name), bound);
            assignments.push(format!("{} = {}", quote_ident(&column.name)?, placeholder));
        }

        if assignments.is_empty() {
            return Err(GateError::EmptyPayload);
        }

        let (where_sql, key_params) = self.key_where(primary_keys, record, &mut namer)?;
        params.extend(key_params);
        self.log_ignored(record);
        tracing::debug!(
            target: "tablegate.mutation",
            columns = assignments.len(),
            keys = primary_keys.len(),
            "compiled update"
        );

        Ok(UpdateClause {
            set_sql: format!("SET {}", assignments.join(", ")),
            where_sql,
            params,
        })
    }

    /// `WHERE` on `primary_keys` with values from `values`.
    pub fn build_delete(&self, primary_keys: &[&str], values: &Record) -> GateResult<DeleteClause> {
        if primary_keys.is_empty() {
            return Err(GateError::NoPrimaryKey);
        }
        let mut namer = ParamNamer::new();
        let (where_sql, params) = self.key_where(primary_keys, values, &mut namer)?;
        tracing::debug!(
            target: "tablegate.mutation",
            keys = primary_keys.len(),
            "compiled delete"
        );
        Ok(DeleteClause { where_sql, params })
    }

    /// One [`DeleteClause`] per record. The first failure is returned with its
    /// record index.
    pub fn build_bulk_delete(
        &self,
        primary_keys: &[&str],
        records: &[Record],
    ) -> GateResult<Vec<DeleteClause>> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                self.build_delete(primary_keys, record)
                    .map_err(|e| match e {
                        GateError::NoPrimaryKey => e,
                        other => other.at_row(i),
                    })
            })
            .collect()
    }

    /// Key predicate shared by update and delete, in the `where_` parameter namespace.
    fn key_where(
        &self,
        primary_keys: &[&str],
        values: &Record,
        namer: &mut ParamNamer,
    ) -> GateResult<(String, ParamList)> {
        let mut params = ParamList::new();
        let mut clauses = Vec::with_capacity(primary_keys.len());

        for key in primary_keys {
            let column = find_column(self.columns, key)
                .ok_or_else(|| GateError::UnknownColumn((*key).to_string()))?;
            let value = record_get(values, &column.name)
                .filter(|v| !v.is_blank())
                .ok_or_else(|| GateError::MissingKeyValue(column.name.clone()))?;
            let bound = bind_value(column, value)?;
            let placeholder = params.push(namer.claim("where_", &column.name), bound);
            clauses.push(format!("{} = {}", quote_ident(&column.name)?, placeholder));
        }

        Ok((format!("WHERE {}", clauses.join(" AND ")), params))
    }

    fn log_ignored(&self, record: &Record) {
        for key in record.keys() {
            if find_column(self.columns, key).is_none() {
                tracing::debug!(
                    target: "tablegate.mutation",
                    column = %key,
                    "ignoring payload field with no matching column"
                );
            }
        }
    }
}
