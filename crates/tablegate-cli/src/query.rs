use serde_json::json;
use tablegate::{ColumnDescriptor, QueryBuilder, QueryRequest};

use crate::cli::QueryArgs;
use crate::config::{OutputFormat, ProjectConfig};
use crate::{input, output};

pub fn run(args: QueryArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let columns: Vec<ColumnDescriptor> = input::read_json(&args.columns)?;
    let request: QueryRequest = input::read_json(&args.request)?;
    let table = input::table_ref(args.table.as_deref())?;

    let compiled = QueryBuilder::new(&columns)
        .with_config(config.engine())
        .build_request(&request)?;
    let select = compiled.select_sql(&table);
    let count = compiled.count_sql(&table);

    match config.format() {
        OutputFormat::Json => output::print_json(&json!({
            "select": select,
            "count": count,
            "params": compiled.params,
            "countParams": compiled.count_params(),
        }))?,
        OutputFormat::Table => {
            output::print_statement(&select, compiled.params.as_slice());
            println!();
            output::print_statement(&count, compiled.count_params());
        }
    }
    Ok(())
}
