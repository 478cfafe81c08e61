//! The `interleave patterns` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use interleave_core::catalog::pattern_catalog;

pub fn execute(json: bool) -> Result<()> {
    let catalog = pattern_catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Pattern", "Name", "Difficulty", "Aliases", "Best for"]);
    for p in &catalog.patterns {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(p.name),
            Cell::new(p.difficulty),
            Cell::new(p.aliases.join(", ")),
            Cell::new(p.best_for),
        ]);
    }
    println!("{table}");

    println!("\nFlashcard policies:");
    for policy in &catalog.flashcard_policies {
        println!("  {:<11} {}", policy.id, policy.description);
    }
    println!("\nTips:");
    for tip in catalog.tips {
        println!("  - {tip}");
    }
    Ok(())
}
