use crate::output::{print_failures, print_json};
use anyhow::Context;
use forge_core::config::{Config, WarnLevel};
use forge_core::{ClaudeGenerator, HistoryStore, IdeaGenerator, JsonFileStore};
use std::path::Path;

/// One generation session. `Ok(false)` means every attempt failed; the
/// failures have already been reported on stderr.
pub async fn run(root: &Path) -> anyhow::Result<bool> {
    let config = Config::load_or_default(root).context("failed to load .forge/config.yaml")?;

    let mut fatal = false;
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => {
                tracing::error!("{}", w.message);
                fatal = true;
            }
        }
    }
    if fatal {
        anyhow::bail!("invalid configuration");
    }

    if !claude_agent::is_available(&config.generator.executable) {
        tracing::warn!(
            executable = %config.generator.executable,
            "generator executable not found on PATH"
        );
    }

    let store = JsonFileStore::for_root(root);
    let mut history = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    tracing::info!(existing = history.len(), "loaded idea history");

    let generator = IdeaGenerator::new(
        ClaudeGenerator::from_config(&config.generator, root),
        config.ideas,
        config.domain,
    );
    let report = generator.generate(&mut history, &store).await;

    match &report.record {
        Some(record) => {
            print_json(record)?;
            Ok(true)
        }
        None => {
            print_failures(&report);
            Ok(false)
        }
    }
}
