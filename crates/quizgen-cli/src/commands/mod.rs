//! Command implementations, one module per subcommand.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizgen_core::engine::QuizEngine;
use quizgen_providers::config::{create_generator, load_config_from, QuizgenConfig};
use quizgen_providers::mock::MockGenerator;
use quizgen_store::MemoryStore;

pub mod answer;
pub mod create;
pub mod grade;
pub mod init;
pub mod list;
pub mod progress;
pub mod quiz;
pub mod regenerate;
pub mod show;
pub mod user;

/// Load config and open the snapshot-backed store.
pub fn open(config_path: Option<&Path>) -> Result<(QuizgenConfig, Arc<MemoryStore>)> {
    let config = load_config_from(config_path)?;
    let store = MemoryStore::with_snapshot(&config.data_path)
        .with_context(|| format!("failed to open data file {}", config.data_path.display()))?;
    Ok((config, Arc::new(store)))
}

/// Build an engine. With `require_provider`, a missing backend config is
/// an error; otherwise a failing stub stands in, which read-only and
/// grading commands tolerate (feedback just comes back empty).
pub fn build_engine(config_path: Option<&Path>, require_provider: bool) -> Result<QuizEngine> {
    let (config, store) = open(config_path)?;

    let mut engine_config = config.engine_config();
    let generator: Arc<dyn quizgen_core::traits::TextGenerator> =
        match config.providers.get(&config.default_provider) {
            Some(provider_config) => Arc::from(create_generator(provider_config)?),
            None if require_provider => anyhow::bail!(
                "no configuration for provider '{}'; run `quizgen init` and set your API key",
                config.default_provider
            ),
            None => {
                // No point retrying a stub that always fails.
                engine_config.max_retries = 0;
                Arc::new(MockGenerator::failing("no provider configured"))
            }
        };

    Ok(QuizEngine::new(generator, store, engine_config))
}
