pub mod call;
pub mod init;
pub mod patterns;
pub mod serve;
pub mod tools;

use std::path::PathBuf;

use anyhow::Result;

use interleave_store::{create_store, load_config_from, StoreConfig};
use interleave_tools::{ServiceDefaults, StudyService};

/// Global flags that shape the service.
pub struct ServiceOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// Load config, apply command-line overrides and open the store.
pub fn build_service(options: &ServiceOptions) -> Result<StudyService> {
    let mut config = load_config_from(options.config.as_deref())?;
    if let Some(dir) = &options.data_dir {
        config.store = StoreConfig::File {
            data_dir: dir.clone(),
        };
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    anyhow::ensure!(
        (1..=10).contains(&config.default_questions_per_topic),
        "default_questions_per_topic must be between 1 and 10, got {}",
        config.default_questions_per_topic
    );

    let store = create_store(&config.store)?;
    tracing::debug!(store = store.name(), seed = ?config.seed, "study service ready");

    let service = StudyService::new(store).with_defaults(ServiceDefaults {
        pattern: config.default_pattern,
        questions_per_topic: config.default_questions_per_topic,
    });
    Ok(match config.seed {
        Some(seed) => service.with_seed(seed),
        None => service,
    })
}
