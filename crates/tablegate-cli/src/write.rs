use serde::Serialize;
use tablegate::{BoundParameter, ColumnDescriptor, MutationClauseBuilder, TableRef};

use crate::cli::{WriteArgs, WriteKind};
use crate::config::{OutputFormat, ProjectConfig};
use crate::input::{self, Records};
use crate::output;

#[derive(Debug, Serialize)]
struct Statement {
    sql: String,
    params: Vec<BoundParameter>,
}

pub fn run(args: WriteArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let columns: Vec<ColumnDescriptor> = input::read_json(&args.columns)?;
    let records: Records = input::read_json(&args.record)?;
    let table = input::table_ref(args.table.as_deref())?;
    let keys: Vec<&str> = args.keys.iter().map(String::as_str).collect();

    let statements = compile(&columns, &table, args.kind, &keys, records)?;

    match config.format() {
        OutputFormat::Json => output::print_json(&statements)?,
        OutputFormat::Table => {
            for (i, stmt) in statements.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                output::print_statement(&stmt.sql, &stmt.params);
            }
        }
    }
    Ok(())
}

fn compile(
    columns: &[ColumnDescriptor],
    table: &TableRef,
    kind: WriteKind,
    keys: &[&str],
    records: Records,
) -> anyhow::Result<Vec<Statement>> {
    let writer = MutationClauseBuilder::new(columns);

    let statements = match (kind, records) {
        (WriteKind::Delete, Records::Many(records)) => writer
            .build_bulk_delete(keys, &records)?
            .into_iter()
            .map(|d| Statement {
                sql: d.to_sql(table),
                params: d.params.into_vec(),
            })
            .collect(),
        (_, Records::Many(_)) => {
            anyhow::bail!("only delete accepts an array of records")
        }
        (WriteKind::Insert, Records::One(record)) => {
            let insert = writer.build_insert(&record)?;
            vec![Statement {
                sql: insert.to_sql(table),
                params: insert.params.into_vec(),
            }]
        }
        (WriteKind::Update, Records::One(record)) => {
            let update = writer.build_update(&record, keys)?;
            vec![Statement {
                sql: update.to_sql(table),
                params: update.params.into_vec(),
            }]
        }
        (WriteKind::Delete, Records::One(record)) => {
            let delete = writer.build_delete(keys, &record)?;
            vec![Statement {
                sql: delete.to_sql(table),
                params: delete.params.into_vec(),
            }]
        }
    };
    Ok(statements)
}
