pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod history;
pub mod idea;
pub mod io;
pub mod normalizer;
pub mod paths;
pub mod prompt;
pub mod similarity;

pub use error::{FailureKind, ForgeError, Result};
pub use generator::{ClaudeGenerator, GenerationReport, IdeaGenerator, TextGenerator};
pub use history::{HistoryStore, IdeaHistory, JsonFileStore, MemoryStore};
pub use idea::{IdeaDraft, IdeaRecord, IdeaStatus};
pub use normalizer::IdeaNormalizer;
