//! The `interleave serve` command: one JSON request per stdin line, one JSON
//! response per stdout line.
//!
//! Request: `{"id": <any>, "tool": "<name>", "arguments": {...}}`. The special
//! tool name `list_tools` returns the tool definitions. The `id` is echoed
//! back unchanged.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use interleave_core::error::ToolError;
use interleave_tools::{StudyTools, ToolResponse};

use super::{build_service, ServiceOptions};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct Reply {
    id: Value,
    #[serde(flatten)]
    response: ToolResponse,
}

pub async fn execute(options: &ServiceOptions) -> Result<()> {
    let service = build_service(options)?;
    tracing::info!(store = service.store().name(), "serving tool requests on stdio");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) if request.tool == "list_tools" => Reply {
                id: request.id,
                response: ToolResponse::ok(serde_json::to_value(StudyTools::all())?),
            },
            Ok(request) => Reply {
                response: service.call(&request.tool, request.arguments).await,
                id: request.id,
            },
            Err(e) => Reply {
                id: Value::Null,
                response: ToolResponse::failure(&ToolError::invalid(format!(
                    "malformed request: {e}"
                ))),
            },
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
        handled += 1;
    }

    tracing::info!(requests = handled, "stdin closed, shutting down");
    Ok(())
}
