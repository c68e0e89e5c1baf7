//! `claude-agent`: one-shot driver for the Claude CLI subprocess.
//!
//! The forge pipeline asks the CLI for a single structured answer per call:
//! `claude --print <prompt> --output-format json`. This crate owns the
//! subprocess plumbing (argument building, environment scrubbing, stderr
//! capture, wall-clock timeout) and hands back raw stdout. Interpreting that
//! text is the caller's job.
//!
//! # Architecture
//!
//! ```text
//! PrintOptions
//!     │
//!     ▼
//! process::run_print   ← spawns `<executable> [args…] --print <prompt> …`
//!     │                   waits under tokio::time::timeout, kills on expiry
//!     ▼
//! String               ← stdout, lossily decoded
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use claude_agent::{print, PrintOptions};
//!
//! let opts = PrintOptions {
//!     model: Some("claude-sonnet-4-6".into()),
//!     ..Default::default()
//! };
//! let raw = print("Give me one idea as JSON.", &opts).await?;
//! ```

pub mod error;
pub mod types;

pub(crate) mod process;

pub use error::ClaudeAgentError;
pub use types::{OutputFormat, PrintOptions};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeAgentError>;

/// Run a single non-interactive prompt and return the CLI's stdout.
///
/// Fails with [`ClaudeAgentError::Timeout`] when the process outlives
/// `opts.timeout`, and with [`ClaudeAgentError::Exit`] on a non-zero exit.
pub async fn print(prompt: &str, opts: &PrintOptions) -> Result<String> {
    process::run_print(prompt, opts).await
}

/// Whether `executable` resolves to something runnable on `PATH` (or is an
/// existing path).
pub fn is_available(executable: &str) -> bool {
    which::which(executable).is_ok()
}
