use crate::config::IdeasConfig;
use crate::error::{ForgeError, Result};
use crate::extract;
use crate::history::{HistoryStore, IdeaHistory};
use crate::idea::{self, IdeaDraft, IdeaRecord};
use crate::similarity;
use chrono::Utc;

// ---------------------------------------------------------------------------
// IdeaNormalizer
// ---------------------------------------------------------------------------

/// Turns raw generator output into at most one accepted [`IdeaRecord`].
///
/// Stateless apart from its settings: history and the store are passed in,
/// so every mutation is visible at the call site.
#[derive(Debug, Clone, Default)]
pub struct IdeaNormalizer {
    cfg: IdeasConfig,
}

impl IdeaNormalizer {
    pub fn new(cfg: IdeasConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &IdeasConfig {
        &self.cfg
    }

    /// Extract, resolve and validate. Does not look at history.
    pub fn normalize(&self, raw: &str) -> Result<IdeaDraft> {
        let obj = extract::extract_object(raw)?;
        let draft = idea::resolve_fields(&obj, &self.cfg);
        if draft.name.is_empty() || draft.summary.is_empty() {
            return Err(ForgeError::Validation {
                name: draft.name,
                summary: draft.summary,
            });
        }
        Ok(draft)
    }

    /// The first history entry `draft` is a near-duplicate of.
    pub fn find_duplicate<'h>(
        &self,
        draft: &IdeaDraft,
        history: &'h IdeaHistory,
    ) -> Option<&'h IdeaRecord> {
        history.records().iter().find(|existing| {
            similarity::is_near_duplicate(
                (&draft.name, &draft.summary),
                (&existing.name, &existing.summary),
                self.cfg.duplicate_threshold,
            )
        })
    }

    /// `<prefix>_<n>` with `n = count + 1`, zero-padded to `id_width`.
    pub fn next_id(&self, history: &IdeaHistory) -> String {
        format!(
            "{}_{:0width$}",
            self.cfg.id_prefix,
            history.len() + 1,
            width = self.cfg.id_width
        )
    }

    /// Normalize `raw`, reject near-duplicates, then append to `history` and
    /// persist through `store`.
    ///
    /// On any error `history` is left exactly as it was and nothing is saved.
    pub fn normalize_and_register<S: HistoryStore + ?Sized>(
        &self,
        raw: &str,
        history: &mut IdeaHistory,
        store: &S,
    ) -> Result<IdeaRecord> {
        let draft = self.normalize(raw)?;

        if let Some(existing) = self.find_duplicate(&draft, history) {
            return Err(ForgeError::Duplicate {
                name: draft.name,
                existing: existing.name.clone(),
            });
        }

        let record = draft.accept(self.next_id(history), Utc::now());
        history.push(record.clone());
        if let Err(e) = store.save(history) {
            history.pop();
            return Err(e);
        }

        tracing::info!(id = %record.id, name = %record.name, "accepted idea");
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
