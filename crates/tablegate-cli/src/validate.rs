use comfy_table::Cell;
use tablegate::{ConditionRule, ConditionSet, RowVerdict};

use crate::cli::ValidateArgs;
use crate::config::{OutputFormat, ProjectConfig};
use crate::input::{self, Records};
use crate::output;

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let rules: Vec<ConditionRule> = input::read_json(&args.rules)?;
    let payload: Records = input::read_json(&args.payload)?;
    let set = ConditionSet::compile(&rules)?;

    let failing: Vec<RowVerdict> = match payload {
        Records::One(record) => {
            let verdict = set.validate(&record);
            if verdict.is_valid {
                Vec::new()
            } else {
                vec![RowVerdict { index: 0, verdict }]
            }
        }
        Records::Many(records) => set.validate_batch(&records),
    };

    match config.format() {
        OutputFormat::Json => output::print_json(&failing)?,
        OutputFormat::Table if failing.is_empty() => println!("valid"),
        OutputFormat::Table => {
            let mut t = output::table(&["Row", "Field", "Code", "Message"]);
            for row in &failing {
                for v in &row.verdict.errors {
                    t.add_row(vec![
                        Cell::new(row.index),
                        Cell::new(&v.field),
                        Cell::new(v.code.as_str()),
                        Cell::new(&v.message),
                    ]);
                }
            }
            println!("{t}");
        }
    }

    if !failing.is_empty() {
        let violations: usize = failing.iter().map(|r| r.verdict.errors.len()).sum();
        anyhow::bail!(
            "validation failed: {violations} violation(s) in {} record(s)",
            failing.len()
        );
    }
    Ok(())
}
