//! Error types shared by the tool layer and the study stores.
//!
//! Every failure a tool can produce is represented as data. `ToolError`
//! carries a kind that the tool layer serializes next to the message, so
//! callers can tell "nothing stored yet" apart from "filters matched nothing".

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a [`StudyStore`](crate::traits::StudyStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed for {key}: {message}")]
    Io { key: String, message: String },

    /// A stored record could not be encoded or decoded.
    #[error("corrupt record {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// Classification of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    EmptyResult,
    InvalidInput,
    Storage,
}

/// A failed tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The referenced user or deck has no data.
    #[error("{0}")]
    NotFound(String),

    /// Filters produced zero matching items.
    #[error("{0}")]
    EmptyResult(String),

    /// Arguments outside the declared bounds, or not parseable at all.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The study store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::NotFound(_) => ErrorKind::NotFound,
            ToolError::EmptyResult(_) => ErrorKind::EmptyResult,
            ToolError::InvalidInput(_) => ErrorKind::InvalidInput,
            ToolError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidInput(message.into())
    }
}
