use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

// ─── OutputFormat ─────────────────────────────────────────────────────────

/// Value passed to `--output-format`.
///
/// `Json` wraps the answer in a metadata envelope whose `result` field holds
/// the model's text; `Text` returns the answer as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    #[default]
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

// ─── PrintOptions ─────────────────────────────────────────────────────────

/// Default wall-clock bound for one `--print` call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Options for a one-shot `claude --print` invocation.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Binary to run (default: `"claude"`)
    pub executable: String,
    /// Arguments inserted before `--print`, e.g. `["@anthropic-ai/claude-code"]`
    /// when `executable` is `npx`.
    pub args: Vec<String>,
    /// Claude model name (e.g. `"claude-sonnet-4-6"`)
    pub model: Option<String>,
    pub output_format: OutputFormat,
    /// Tool names that are auto-approved without user prompting
    pub allowed_tools: Vec<String>,
    /// Working directory for the subprocess (default: current dir)
    pub cwd: Option<PathBuf>,
    /// Additional environment variables for the subprocess
    pub env: HashMap<String, String>,
    /// The process is killed once this elapses.
    pub timeout: Duration,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            executable: "claude".to_string(),
            args: Vec::new(),
            model: None,
            output_format: OutputFormat::default(),
            allowed_tools: Vec::new(),
            cwd: None,
            env: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
