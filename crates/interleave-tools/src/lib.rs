//! interleave-tools — the study tools as callable, schema-described operations.
//!
//! [`StudyService`] implements the seven tools on top of a `StudyStore`;
//! [`StudyTools`] describes them; [`StudyService::call`] dispatches a tool by
//! name and always answers with a structured [`ToolResponse`].

pub mod input;
pub mod registry;
pub mod response;
pub mod service;

pub use registry::{StudyTools, ToolDefinition};
pub use response::{ErrorBody, ToolResponse};
pub use service::{ServiceDefaults, StudyService};
