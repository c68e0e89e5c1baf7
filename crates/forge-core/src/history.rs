use crate::error::Result;
use crate::idea::{IdeaRecord, IdeaStatus};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// IdeaHistory
// ---------------------------------------------------------------------------

/// Every accepted idea, in acceptance order. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredHistory")]
pub struct IdeaHistory {
    history: Vec<IdeaRecord>,
    last_updated: DateTime<Utc>,
}

/// On-disk shape as read. Older files keep records under `ideas`; when a
/// file has both keys, `history` wins.
#[derive(Deserialize)]
struct StoredHistory {
    history: Option<Vec<IdeaRecord>>,
    ideas: Option<Vec<IdeaRecord>>,
    #[serde(default = "Utc::now")]
    last_updated: DateTime<Utc>,
}

impl From<StoredHistory> for IdeaHistory {
    fn from(stored: StoredHistory) -> Self {
        Self {
            history: stored.history.or(stored.ideas).unwrap_or_default(),
            last_updated: stored.last_updated,
        }
    }
}

impl Default for IdeaHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl IdeaHistory {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn from_records(records: Vec<IdeaRecord>) -> Self {
        Self {
            history: records,
            last_updated: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn records(&self) -> &[IdeaRecord] {
        &self.history
    }

    /// Most recently accepted idea still waiting to be built.
    pub fn latest_pending(&self) -> Option<&IdeaRecord> {
        self.history
            .iter()
            .rev()
            .find(|r| r.status == IdeaStatus::Pending)
    }

    pub(crate) fn push(&mut self, record: IdeaRecord) {
        self.history.push(record);
        self.last_updated = Utc::now();
    }

    /// Undo the last `push`. Only used to roll back when persisting fails.
    pub(crate) fn pop(&mut self) -> Option<IdeaRecord> {
        self.history.pop()
    }
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// Where history is loaded from at session start and saved to after each
/// acceptance.
pub trait HistoryStore {
    fn load(&self) -> Result<IdeaHistory>;
    fn save(&self, history: &IdeaHistory) -> Result<()>;
}

/// `.forge/ideas.json`, rewritten atomically on every save. Last write wins;
/// two overlapping sessions on the same file are not coordinated.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at `<root>/.forge/ideas.json`.
    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::ideas_path(root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<IdeaHistory> {
        if !self.path.exists() {
            return Ok(IdeaHistory::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let history: IdeaHistory = serde_json::from_str(&data)?;
        Ok(history)
    }

    fn save(&self, history: &IdeaHistory) -> Result<()> {
        let data = serde_json::to_string_pretty(history)?;
        crate::io::atomic_write(&self.path, data.as_bytes())
    }
}

/// In-process store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<IdeaHistory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved snapshot, if any save happened.
    pub fn snapshot(&self) -> Option<IdeaHistory> {
        self.saved.lock().ok().and_then(|s| s.clone())
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<IdeaHistory> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, history: &IdeaHistory) -> Result<()> {
        if let Ok(mut slot) = self.saved.lock() {
            *slot = Some(history.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
