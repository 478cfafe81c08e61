//! Configuration loading and the store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use interleave_core::model::Pattern;
use interleave_core::traits::StudyStore;

use crate::file::JsonFileStore;
use crate::memory::InMemoryStore;

/// Which backend holds study state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Lost when the process exits.
    #[default]
    Memory,
    /// One JSON file per user and per deck under `data_dir`.
    File { data_dir: PathBuf },
}

/// Top-level interleave configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterleaveConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Fixed RNG seed for reproducible sequences. Unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pattern used when a study plan request names none.
    #[serde(default)]
    pub default_pattern: Pattern,
    /// Per-topic cap used when a quiz request gives neither cap.
    #[serde(default = "default_questions_per_topic")]
    pub default_questions_per_topic: usize,
}

fn default_questions_per_topic() -> usize {
    3
}

impl Default for InterleaveConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            seed: None,
            default_pattern: Pattern::default(),
            default_questions_per_topic: default_questions_per_topic(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `interleave.toml` in the current directory
/// 2. `~/.config/interleave/config.toml`
///
/// Environment overrides: `INTERLEAVE_DATA_DIR` (switches to the file store),
/// `INTERLEAVE_SEED`.
pub fn load_config_from(path: Option<&Path>) -> Result<InterleaveConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("interleave.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => InterleaveConfig::default(),
    };

    apply_overrides(
        config,
        std::env::var("INTERLEAVE_DATA_DIR").ok(),
        std::env::var("INTERLEAVE_SEED").ok(),
    )
}

/// Parse a TOML document and expand `${VAR}` references in paths.
pub fn parse_config(content: &str) -> Result<InterleaveConfig> {
    let mut config: InterleaveConfig = toml::from_str(content)?;
    if let StoreConfig::File { data_dir } = &mut config.store {
        *data_dir = PathBuf::from(resolve_env_vars(&data_dir.to_string_lossy()));
    }
    Ok(config)
}

fn apply_overrides(
    mut config: InterleaveConfig,
    data_dir: Option<String>,
    seed: Option<String>,
) -> Result<InterleaveConfig> {
    if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
        config.store = StoreConfig::File {
            data_dir: PathBuf::from(dir),
        };
    }
    if let Some(seed) = seed.filter(|s| !s.is_empty()) {
        let seed = seed
            .parse::<u64>()
            .with_context(|| format!("INTERLEAVE_SEED is not an unsigned integer: {seed}"))?;
        config.seed = Some(seed);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("interleave"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn StudyStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(InMemoryStore::new())),
        StoreConfig::File { data_dir } => {
            let store = JsonFileStore::open(data_dir)
                .with_context(|| format!("failed to open data dir: {}", data_dir.display()))?;
            Ok(Arc::new(store))
        }
    }
}
