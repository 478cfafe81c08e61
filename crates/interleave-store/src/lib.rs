//! interleave-store — study-state backends and configuration.
//!
//! Implements the `StudyStore` trait in memory and as JSON files on disk,
//! and loads `interleave.toml` to pick between them.

pub mod config;
pub mod file;
pub mod memory;

pub use config::{create_store, load_config_from, InterleaveConfig, StoreConfig};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
