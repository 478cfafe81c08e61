//! Structured tool responses and dispatch by tool name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use interleave_core::error::{ErrorKind, StoreError, ToolError};

use crate::input::parse;
use crate::registry::*;
use crate::service::StudyService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// `{"success": true, "result": ...}` or
/// `{"success": false, "error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(err: &ToolError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }

    pub fn from_result<T: Serialize>(tool: &str, result: Result<T, ToolError>) -> Self {
        let value = result.and_then(|r| {
            serde_json::to_value(r).map_err(|e| {
                ToolError::Storage(StoreError::Corrupt {
                    key: tool.to_string(),
                    message: e.to_string(),
                })
            })
        });
        match value {
            Ok(v) => Self::ok(v),
            Err(e) => {
                tracing::warn!(tool, kind = ?e.kind(), "tool call failed: {e}");
                Self::failure(&e)
            }
        }
    }
}

impl StudyService {
    /// Invoke a tool by name with JSON arguments. Never fails: every error
    /// becomes a `success: false` response.
    pub async fn call(&self, tool: &str, args: Value) -> ToolResponse {
        tracing::debug!(tool, "dispatching tool call");
        match tool {
            CREATE_STUDY_PLAN => match parse(args) {
                Ok(input) => ToolResponse::from_result(tool, self.create_study_plan(input).await),
                Err(e) => ToolResponse::failure(&e),
            },
            GENERATE_INTERLEAVED_QUIZ => match parse(args) {
                Ok(input) => {
                    ToolResponse::from_result(tool, self.generate_interleaved_quiz(input).await)
                }
                Err(e) => ToolResponse::failure(&e),
            },
            CREATE_FLASHCARD_DECK => match parse(args) {
                Ok(input) => {
                    ToolResponse::from_result(tool, self.create_flashcard_deck(input).await)
                }
                Err(e) => ToolResponse::failure(&e),
            },
            GET_SHUFFLED_FLASHCARDS => match parse(args) {
                Ok(input) => {
                    ToolResponse::from_result(tool, self.get_shuffled_flashcards(input).await)
                }
                Err(e) => ToolResponse::failure(&e),
            },
            LOG_STUDY_SESSION => match parse(args) {
                Ok(input) => ToolResponse::from_result(tool, self.log_study_session(input).await),
                Err(e) => ToolResponse::failure(&e),
            },
            GET_LEARNING_PROGRESS => match parse(args) {
                Ok(input) => {
                    ToolResponse::from_result(tool, self.get_learning_progress(input).await)
                }
                Err(e) => ToolResponse::failure(&e),
            },
            GET_INTERLEAVING_PATTERNS => {
                ToolResponse::from_result(tool, Ok(self.get_interleaving_patterns()))
            }
            other => ToolResponse::failure(&ToolError::invalid(format!("unknown tool: {other}"))),
        }
    }
}
