use comfy_table::Cell;
use tablegate::{ColumnDescriptor, ConditionRule, suggest_rules};

use crate::cli::SuggestArgs;
use crate::config::{OutputFormat, ProjectConfig};
use crate::{input, output};

pub fn run(args: SuggestArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let columns: Vec<ColumnDescriptor> = input::read_json(&args.columns)?;
    let rules: Vec<ConditionRule> = columns.iter().flat_map(suggest_rules).collect();

    match config.format() {
        OutputFormat::Json => output::print_json(&rules)?,
        OutputFormat::Table => {
            let mut t = output::table(&["Column", "Class", "Condition", "Value"]);
            for r in &rules {
                t.add_row(vec![
                    Cell::new(&r.column_name),
                    Cell::new(r.data_class.as_str()),
                    Cell::new(&r.condition_type),
                    Cell::new(&r.condition_value),
                ]);
            }
            println!("{t}");
        }
    }
    Ok(())
}
