//! The `interleave init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("interleave.toml").exists() {
        println!("interleave.toml already exists, skipping.");
    } else {
        std::fs::write("interleave.toml", SAMPLE_CONFIG)?;
        println!("Created interleave.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit interleave.toml to choose where study data is kept");
    println!("  2. Run: interleave tools");
    println!(
        "  3. Run: interleave call get_learning_progress --args '{{\"userId\": \"me\"}}'"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# interleave configuration

# Pattern used when a study plan names none.
default_pattern = "systematic_short"

# Questions per topic when a quiz gives neither quizLength nor questionsPerTopic.
default_questions_per_topic = 3

# Uncomment for reproducible shuffles.
# seed = 42

[store]
type = "file"
data_dir = "${HOME}/.local/share/interleave"
"#;
