use claude_agent::ClaudeAgentError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("could not parse idea JSON: {0}")]
    Parse(String),

    #[error("missing essential fields: name={name:?}, summary={summary:?}")]
    Validation { name: String, summary: String },

    #[error("duplicate idea '{name}' (matches existing '{existing}')")]
    Duplicate { name: String, existing: String },

    #[error("external tool failed: {0}")]
    ExternalTool(String),

    #[error("external tool timed out after {0}s")]
    ExternalToolTimeout(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ForgeError {
    /// Failures a fresh generator invocation can fix. Storage errors are not.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ForgeError::Parse(_) => FailureKind::Parse,
            ForgeError::Validation { .. } => FailureKind::Validation,
            ForgeError::Duplicate { .. } => FailureKind::Duplicate,
            ForgeError::ExternalTool(_) => FailureKind::ExternalTool,
            ForgeError::ExternalToolTimeout(_) => FailureKind::Timeout,
            ForgeError::Io(_) | ForgeError::Yaml(_) | ForgeError::Json(_) => FailureKind::Storage,
        }
    }
}

impl From<ClaudeAgentError> for ForgeError {
    fn from(e: ClaudeAgentError) -> Self {
        match e {
            ClaudeAgentError::Timeout { secs } => ForgeError::ExternalToolTimeout(secs),
            other => ForgeError::ExternalTool(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Parse,
    Validation,
    Duplicate,
    ExternalTool,
    Timeout,
    Storage,
}

impl FailureKind {
    pub fn is_retryable(self) -> bool {
        self != FailureKind::Storage
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Parse => "parse",
            FailureKind::Validation => "validation",
            FailureKind::Duplicate => "duplicate",
            FailureKind::ExternalTool => "external_tool",
            FailureKind::Timeout => "timeout",
            FailureKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
