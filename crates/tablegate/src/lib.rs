//! # tablegate
//!
//! Parameterized SQL Server statement compilation and runtime record validation
//! for tables whose columns are discovered at runtime.
//!
//! ## Features
//!
//! - **Parameters only**: literal values reach SQL text exclusively as `@name` placeholders
//! - **Schema-checked identifiers**: only discovered columns are ever quoted into SQL
//! - **Safe defaults**: UPDATE/DELETE require a primary key, identity columns are never written
//! - **Day-first dates**: `DD/MM/YYYY[ HH:MM]` only, unambiguous `MM/DD/YYYY` is rejected
//! - **Runtime rules**: admin-authored per-column conditions, evaluated totally
//!
//! No component performs I/O. Column metadata, persisted rules and statement
//! execution belong to the caller.
//!
//! ## Query Builder
//!
//! ```ignore
//! use tablegate::{ColumnDescriptor, FilterDescriptor, FilterOp, PageWindow, QueryBuilder, TableRef};
//!
//! let columns = vec![ColumnDescriptor::new("Age", "int")];
//! let q = QueryBuilder::new(&columns).build(
//!     &[FilterDescriptor::new("Age", FilterOp::GreaterThan, "18")],
//!     None,
//!     Some(&PageWindow::new(20, 0)),
//! )?;
//!
//! let table = TableRef::parse("dbo.People")?;
//! let sql = q.select_sql(&table);
//! let count = q.count_sql(&table);
//! ```
//!
//! ## Mutations
//!
//! ```ignore
//! use tablegate::MutationClauseBuilder;
//!
//! let writer = MutationClauseBuilder::new(&columns);
//! let insert = writer.build_insert(&record)?;
//! let update = writer.build_update(&record, &["Id"])?;
//! let delete = writer.build_delete(&["Id"], &keys)?;
//! ```
//!
//! ## Validation
//!
//! ```ignore
//! use tablegate::ConditionSet;
//!
//! let rules = ConditionSet::compile(&persisted_rules)?;
//! rules.validate(&record).into_result()?;
//! ```

pub mod check_constraint;
pub mod coerce;
pub mod condition;
pub mod config;
pub mod date;
pub mod error;
pub mod ident;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod value;

pub use check_constraint::suggest_rules;
pub use coerce::{CoerceError, Coercion, coerce, coerce_value};
pub use condition::{
    Condition, ConditionRule, ConditionSet, RowVerdict, ValidationVerdict, Violation,
    ViolationCode, validate,
};
pub use config::{EngineConfig, NumericLeniency};
pub use date::{DateError, DayFirst};
pub use error::{GateError, GateResult};
pub use ident::{ParamNamer, TableRef, param_name, quote_ident};
pub use mutation::{DeleteClause, InsertClause, MutationClauseBuilder, UpdateClause, record_get};
pub use query::{
    CompiledQuery, FilterDescriptor, FilterOp, NEUTRAL_ORDER_BY, PageWindow, QueryBuilder,
    QueryRequest, SortDescriptor, SortDirection, escape_like,
};
pub use schema::{ColumnDescriptor, DataClass, SqlTypeClass, find_column};
pub use value::{BoundParameter, ParamList, Record, SqlValue, Value};
