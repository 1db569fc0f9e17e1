use comfy_table::Cell;
use serde::Serialize;
use tablegate::date;

use crate::cli::DateArgs;
use crate::config::{OutputFormat, ProjectConfig};
use crate::output;

#[derive(Debug, Serialize)]
struct Resolved {
    input: String,
    canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn resolve(input: &str) -> Resolved {
    match date::to_canonical(input) {
        Ok(canonical) => Resolved {
            input: input.to_string(),
            canonical: Some(canonical),
            error: None,
        },
        Err(e) => Resolved {
            input: input.to_string(),
            canonical: None,
            error: Some(e.to_string()),
        },
    }
}

pub fn run(args: DateArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let resolved: Vec<Resolved> = args.inputs.iter().map(|s| resolve(s)).collect();

    match config.format() {
        OutputFormat::Json => output::print_json(&resolved)?,
        OutputFormat::Table => {
            let mut t = output::table(&["Input", "Canonical", "Error"]);
            for r in &resolved {
                t.add_row(vec![
                    Cell::new(&r.input),
                    Cell::new(r.canonical.as_deref().unwrap_or("")),
                    Cell::new(r.error.as_deref().unwrap_or("")),
                ]);
            }
            println!("{t}");
        }
    }

    let rejected = resolved.iter().filter(|r| r.error.is_some()).count();
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} inputs rejected", resolved.len());
    }
    Ok(())
}
