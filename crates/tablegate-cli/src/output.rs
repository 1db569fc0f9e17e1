use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use tablegate::BoundParameter;

pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn params_table(params: &[BoundParameter]) -> Table {
    let mut t = table(&["Parameter", "Value"]);
    for p in params {
        t.add_row(vec![Cell::new(p.placeholder()), Cell::new(p.value.to_string())]);
    }
    t
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A statement and its parameters, printed as SQL followed by a parameter table.
pub fn print_statement(sql: &str, params: &[BoundParameter]) {
    println!("{sql}");
    if !params.is_empty() {
        println!("{}", params_table(params));
    }
}
