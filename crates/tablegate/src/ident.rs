//! Safe SQL identifier and parameter-name handling.
//!
//! Identifiers are rendered in bracket form (`[name]`, with `]` doubled). They are
//! the only tokens ever interpolated into SQL text, and only after the caller has
//! confirmed them against the discovered column set (or trusts them, as for table
//! names).
//!
//! Parameter names are always `[A-Za-z0-9_]+`.
//!
//! # Example
//! ```ignore
//! use tablegate::TableRef;
//!
//! let t = TableRef::parse("dbo.Users")?;
//! assert_eq!(t.to_sql(), "[dbo].[Users]");
//! # Ok::<(), tablegate::GateError>(())
//! ```

use crate::error::{GateError, GateResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Render `name` as a bracket-quoted identifier.
pub fn quote_ident(name: &str) -> GateResult<String> {
    if name.is_empty() {
        return Err(GateError::Identifier("identifier cannot be empty".into()));
    }
    if name.contains('\0') {
        return Err(GateError::Identifier(
            "identifier cannot contain NUL character".into(),
        ));
    }
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(name, &mut out);
    Ok(out)
}

pub(crate) fn write_quoted(name: &str, out: &mut String) {
    out.push('[');
    for ch in name.chars() {
        if ch == ']' {
            out.push_str("]]");
        } else {
            out.push(ch);
        }
    }
    out.push(']');
}

/// A caller-trusted table reference, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Parse `table`, `schema.table`, `[schema].[table]` or `[odd.name]`.
    pub fn parse(s: &str) -> GateResult<Self> {
        let mut parts = Vec::new();
        let mut chars = s.trim().chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') if chars.peek().is_some() => {}
                    Some('.') => {
                        return Err(GateError::Identifier(format!(
                            "trailing '.' in table name '{s}'"
                        )));
                    }
                    Some(c) => {
                        return Err(GateError::Identifier(format!(
                            "expected '.' between name parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            let mut name = String::new();
            if chars.peek() == Some(&'[') {
                chars.next();
                loop {
                    match chars.next() {
                        Some(']') if chars.peek() == Some(&']') => {
                            chars.next();
                            name.push(']');
                        }
                        Some(']') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(GateError::Identifier(format!(
                                "unclosed bracket in table name '{s}'"
                            )));
                        }
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == '.' {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
            }

            if name.is_empty() {
                return Err(GateError::Identifier(format!(
                    "empty segment in table name '{s}'"
                )));
            }
            parts.push(name);
        }

        match parts.len() {
            1 => Ok(Self::new(parts.remove(0))),
            2 => {
                let name = parts.remove(1);
                Ok(Self::with_schema(parts.remove(0), name))
            }
            0 => Err(GateError::Identifier("table name cannot be empty".into())),
            _ => Err(GateError::Identifier(format!(
                "table name '{s}' has too many parts"
            ))),
        }
    }

    /// Render the reference as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        if let Some(schema) = &self.schema {
            write_quoted(schema, &mut out);
            out.push('.');
        }
        write_quoted(&self.name, &mut out);
        out
    }
}

/// Derive a legal parameter name from a column name: every character outside
/// `[A-Za-z0-9_]` becomes `_`.
pub fn param_name(column: &str) -> String {
    let name: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() { "_".to_string() } else { name }
}

/// Hands out parameter names that are unique within one statement.
#[derive(Debug, Default)]
pub struct ParamNamer {
    used: HashSet<String>,
}

impl ParamNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `prefix + sanitized(column)`, suffixing `_2`, `_3`, ... on collision.
    pub fn claim(&mut self, prefix: &str, column: &str) -> String {
        let base = format!("{prefix}{}", param_name(column));
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
