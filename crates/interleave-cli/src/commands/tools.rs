//! The `interleave tools` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use interleave_tools::StudyTools;

pub fn execute(json: bool) -> Result<()> {
    let tools = StudyTools::all();

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Tool", "Required", "Description"]);
    for tool in &tools {
        let required = tool.input_schema["required"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(tool.name),
            Cell::new(required),
            Cell::new(tool.description),
        ]);
    }
    println!("{table}");
    println!("\n{} tools", tools.len());
    Ok(())
}
