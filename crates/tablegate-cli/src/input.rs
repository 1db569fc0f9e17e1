use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tablegate::{Record, TableRef};

/// Table used when `--table` is not given.
pub const DEFAULT_TABLE: &str = "t";

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn table_ref(name: Option<&str>) -> anyhow::Result<TableRef> {
    let name = name.unwrap_or(DEFAULT_TABLE);
    TableRef::parse(name).with_context(|| format!("invalid table name: {name}"))
}

/// A single record, or a JSON array of records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Records {
    Many(Vec<Record>),
    One(Record),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accepts_object_or_array() {
        let one: Records = serde_json::from_str(r#"{"Id":1}"#).unwrap();
        assert!(matches!(one, Records::One(r) if r.len() == 1));
        let many: Records = serde_json::from_str(r#"[{"Id":1},{"Id":2}]"#).unwrap();
        assert!(matches!(many, Records::Many(v) if v.len() == 2));
    }

    #[test]
    fn default_table() {
        assert_eq!(table_ref(None).unwrap().to_sql(), "[t]");
        assert_eq!(table_ref(Some("dbo.Users")).unwrap().to_sql(), "[dbo].[Users]");
    }
}
