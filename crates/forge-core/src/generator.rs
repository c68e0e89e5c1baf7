//! Retry loop around the external text generator and the normalizer.
//!
//! One call to [`IdeaGenerator::generate`] is one generation session step:
//! build the prompt, then up to `max_attempts` times ask the generator for
//! text and try to register it. Every failure is logged and recorded in the
//! returned [`GenerationReport`]; running out of attempts is reported, not
//! raised.

use crate::config::{DomainConfig, GeneratorConfig, IdeasConfig};
use crate::error::{FailureKind, ForgeError, Result};
use crate::history::{HistoryStore, IdeaHistory};
use crate::idea::IdeaRecord;
use crate::normalizer::IdeaNormalizer;
use crate::prompt;
use claude_agent::PrintOptions;
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Characters of raw response kept in logs and failure messages.
const RAW_PREVIEW_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// TextGenerator
// ---------------------------------------------------------------------------

/// Something that answers a prompt with free-form text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// The Claude CLI in `--print` mode.
#[derive(Debug, Clone)]
pub struct ClaudeGenerator {
    opts: PrintOptions,
}

impl ClaudeGenerator {
    pub fn new(opts: PrintOptions) -> Self {
        Self { opts }
    }

    pub fn from_config(cfg: &GeneratorConfig, cwd: &Path) -> Self {
        Self::new(cfg.print_options(cwd))
    }
}

impl TextGenerator for ClaudeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(claude_agent::print(prompt, &self.opts).await?)
    }
}

// ---------------------------------------------------------------------------
// GenerationReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AttemptFailure {
    pub attempt: u32,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub record: Option<IdeaRecord>,
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
}

impl GenerationReport {
    pub fn succeeded(&self) -> bool {
        self.record.is_some()
    }

    /// True when the loop ended on a failure retrying cannot fix, before the
    /// attempt budget ran out.
    pub fn stopped_early(&self) -> bool {
        self.failures.last().is_some_and(|f| !f.kind.is_retryable())
    }
}

// ---------------------------------------------------------------------------
// IdeaGenerator
// ---------------------------------------------------------------------------

pub struct IdeaGenerator<G> {
    generator: G,
    normalizer: IdeaNormalizer,
    domain: DomainConfig,
}

impl<G: TextGenerator> IdeaGenerator<G> {
    pub fn new(generator: G, ideas: IdeasConfig, domain: DomainConfig) -> Self {
        Self {
            generator,
            normalizer: IdeaNormalizer::new(ideas),
            domain,
        }
    }

    pub fn normalizer(&self) -> &IdeaNormalizer {
        &self.normalizer
    }

    /// Try to produce and register one new idea.
    ///
    /// Retryable failures (parse, validation, duplicate, generator error or
    /// timeout) consume an attempt. A storage failure stops immediately,
    /// since another generator call cannot fix it.
    pub async fn generate<S: HistoryStore + ?Sized>(
        &self,
        history: &mut IdeaHistory,
        store: &S,
    ) -> GenerationReport {
        let cfg = self.normalizer.config();
        let max_attempts = cfg.max_attempts;
        let prompt = prompt::idea_prompt(&self.domain, history);
        let mut failures = Vec::new();
        let mut attempts = 0;

        for attempt in 1..=max_attempts {
            attempts = attempt;
            tracing::info!(attempt, max_attempts, "generating idea");

            match self.attempt(&prompt, history, store).await {
                Ok(record) => {
                    return GenerationReport {
                        record: Some(record),
                        attempts,
                        failures,
                    };
                }
                Err((err, raw)) => {
                    let kind = err.kind();
                    let raw_preview = raw.as_deref().map(preview).unwrap_or_default();
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        %kind,
                        error = %err,
                        raw = %raw_preview,
                        "idea attempt failed"
                    );
                    failures.push(AttemptFailure {
                        attempt,
                        kind,
                        message: err.to_string(),
                    });
                    if !kind.is_retryable() {
                        tracing::error!(attempt, %kind, "stopping: failure is not retryable");
                        return GenerationReport {
                            record: None,
                            attempts,
                            failures,
                        };
                    }
                }
            }

            if attempt < max_attempts && cfg.retry_backoff_ms > 0 {
                let delay = Duration::from_millis(cfg.retry_backoff_ms * u64::from(attempt));
                tokio::time::sleep(delay).await;
            }
        }

        tracing::error!(attempts, "failed to generate idea after all retries");
        GenerationReport {
            record: None,
            attempts,
            failures,
        }
    }

    /// One generator call plus registration. On failure also returns the raw
    /// response, when there was one, for diagnostics.
    async fn attempt<S: HistoryStore + ?Sized>(
        &self,
        prompt: &str,
        history: &mut IdeaHistory,
        store: &S,
    ) -> std::result::Result<IdeaRecord, (ForgeError, Option<String>)> {
        let raw = self.generator.generate(prompt).await.map_err(|e| (e, None))?;
        tracing::debug!(chars = raw.chars().count(), "response received");
        self.normalizer
            .normalize_and_register(&raw, history, store)
            .map_err(|e| (e, Some(raw)))
    }
}

fn preview(raw: &str) -> String {
    raw.chars().take(RAW_PREVIEW_CHARS).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order; records every prompt it was given.
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ForgeError::ExternalTool("script exhausted".into())))
        }
    }

    fn ok(s: &str) -> Result<String> {
        Ok(s.to_string())
    }

    fn idea_gen(responses: Vec<Result<String>>) -> IdeaGenerator<ScriptedGenerator> {
        IdeaGenerator::new(
            ScriptedGenerator::new(responses),
            IdeasConfig::default(),
            DomainConfig::default(),
        )
    }

    #[tokio::test]
    async fn first_attempt_success() {
        let g = idea_gen(vec![ok(r#"{"name":"X","short_description":"Y"}"#)]);
        let store = MemoryStore::new();
        let mut history = IdeaHistory::new();
        let report = g.generate(&mut history, &store).await;
        assert!(report.succeeded());
        assert_eq!(report.attempts, 1);
        assert!(report.failures.is_empty());
        assert_eq!(report.record.unwrap().id, "tool_001");
        assert_eq!(g.generator.calls(), 1);
    }

    #[tokio::test]
    async fn retries_through_each_failure_kind() {
        let g = IdeaGenerator::new(
            ScriptedGenerator::new(vec![
                Err(ForgeError::ExternalToolTimeout(300)),
                Err(ForgeError::ExternalTool("exit 1".into())),
                ok("I'm sorry, I can't do that."),
                ok(r#"{"title":"No summary"}"#),
                ok(r#"{"name":"crop helper","short_description":"again"}"#),
                ok(r#"{"name":"Mandi Watch","short_description":"Price alerts"}"#),
            ]),
            IdeasConfig {
                max_attempts: 6,
                ..Default::default()
            },
            DomainConfig::default(),
        );
        let store = MemoryStore::new();
        let mut history = IdeaHistory::new();
        g.normalizer()
            .normalize_and_register(
                r#"{"name":"Crop Helper","short_description":"AI tool for farmers"}"#,
                &mut history,
                &store,
            )
            .unwrap();

        let report = g.generate(&mut history, &store).await;
        let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FailureKind::Timeout,
                FailureKind::ExternalTool,
                FailureKind::Parse,
                FailureKind::Validation,
                FailureKind::Duplicate,
            ]
        );
        assert_eq!(report.attempts, 6);
        assert_eq!(report.record.unwrap().id, "tool_002");
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn exhaustion_reports_without_touching_history() {
        let g = idea_gen(vec![ok("nope"), ok("still nope"), ok("{}")]);
        let store = MemoryStore::new();
        let mut history = IdeaHistory::new();
        let report = g.generate(&mut history, &store).await;
        assert!(!report.succeeded());
        assert_eq!(report.attempts, 3);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.failures[2].kind, FailureKind::Validation);
        assert!(!report.stopped_early());
        assert!(history.is_empty());
        assert!(store.snapshot().is_none());
        assert_eq!(g.generator.calls(), 3);
    }

    #[tokio::test]
    async fn storage_failure_stops_retrying() {
        struct ReadOnly;
        impl HistoryStore for ReadOnly {
            fn load(&self) -> Result<IdeaHistory> {
                Ok(IdeaHistory::new())
            }
            fn save(&self, _: &IdeaHistory) -> Result<()> {
                Err(ForgeError::Io(std::io::Error::other("read-only")))
            }
        }

        let g = idea_gen(vec![
            ok(r#"{"name":"X","short_description":"Y"}"#),
            ok(r#"{"name":"Z","short_description":"W"}"#),
        ]);
        let mut history = IdeaHistory::new();
        let report = g.generate(&mut history, &ReadOnly).await;
        assert!(!report.succeeded());
        assert_eq!(report.attempts, 1);
        assert_eq!(report.failures[0].kind, FailureKind::Storage);
        assert!(report.stopped_early());
        assert_eq!(g.generator.calls(), 1);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn prompt_mentions_existing_ideas_and_is_reused_across_attempts() {
        let g = idea_gen(vec![
            ok("garbage"),
            ok(r#"{"name":"Rain Ready","short_description":"Monsoon planner"}"#),
        ]);
        let store = MemoryStore::new();
        let mut history = IdeaHistory::new();
        g.normalizer()
            .normalize_and_register(
                r#"{"name":"Crop Helper","short_description":"AI tool for farmers"}"#,
                &mut history,
                &store,
            )
            .unwrap();

        let report = g.generate(&mut history, &store).await;
        assert!(report.succeeded());
        let prompts = g.generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
        assert!(prompts[0].contains("- Crop Helper: AI tool for farmers"));
    }

    #[tokio::test]
    async fn zero_attempts_reports_failure() {
        let g = IdeaGenerator::new(
            ScriptedGenerator::new(vec![]),
            IdeasConfig {
                max_attempts: 0,
                ..Default::default()
            },
            DomainConfig::default(),
        );
        let report = g.generate(&mut IdeaHistory::new(), &MemoryStore::new()).await;
        assert!(!report.succeeded());
        assert_eq!(report.attempts, 0);
        assert_eq!(g.generator.calls(), 0);
    }

    #[tokio::test]
    async fn backoff_grows_linearly() {
        let g = IdeaGenerator::new(
            ScriptedGenerator::new(vec![ok("x"), ok("y"), ok("z")]),
            IdeasConfig {
                retry_backoff_ms: 20,
                ..Default::default()
            },
            DomainConfig::default(),
        );
        let start = std::time::Instant::now();
        let report = g.generate(&mut IdeaHistory::new(), &MemoryStore::new()).await;
        assert!(!report.succeeded());
        // 20ms after attempt 1, 40ms after attempt 2, none after the last.
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let raw = "फ".repeat(400);
        assert_eq!(preview(&raw).chars().count(), RAW_PREVIEW_CHARS);
    }
}
