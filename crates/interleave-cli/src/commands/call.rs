//! The `interleave call` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use super::{build_service, ServiceOptions};

pub async fn execute(
    options: &ServiceOptions,
    tool: String,
    args: Option<String>,
    args_file: Option<PathBuf>,
) -> Result<()> {
    let args: Value = match (args, args_file) {
        (Some(text), _) => serde_json::from_str(&text).context("--args is not valid JSON")?,
        (None, Some(path)) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read args file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("args file is not valid JSON: {}", path.display()))?
        }
        (None, None) => Value::Object(Default::default()),
    };

    let service = build_service(options)?;
    let response = service.call(&tool, args).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    match response.error {
        Some(error) => anyhow::bail!("{tool} failed ({:?}): {}", error.kind, error.message),
        None => Ok(()),
    }
}
