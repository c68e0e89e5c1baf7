use std::process::Stdio;

use tokio::process::Command;

use crate::types::PrintOptions;
use crate::{ClaudeAgentError, Result};

// ─── run_print ────────────────────────────────────────────────────────────

/// Spawn `<executable> [args…] --print <prompt> --output-format <fmt> …`,
/// wait for it under `opts.timeout`, and return stdout.
///
/// `CLAUDECODE` is removed from the environment so this works both from a
/// terminal and from inside a running Claude session. The child is spawned
/// with `kill_on_drop`, so abandoning the wait on timeout also kills it.
pub(crate) async fn run_print(prompt: &str, opts: &PrintOptions) -> Result<String> {
    let mut cmd = build_command(prompt, opts);
    cmd.env_remove("CLAUDECODE");
    for (k, v) in &opts.env {
        cmd.env(k, v);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| ClaudeAgentError::Spawn {
        executable: opts.executable.clone(),
        source,
    })?;

    tracing::debug!(
        executable = %opts.executable,
        timeout_secs = opts.timeout.as_secs(),
        prompt_chars = prompt.chars().count(),
        "spawned claude --print"
    );

    let output = match tokio::time::timeout(opts.timeout, child.wait_with_output()).await {
        Ok(res) => res.map_err(ClaudeAgentError::Io)?,
        Err(_) => {
            tracing::warn!(
                "claude --print timed out after {}s",
                opts.timeout.as_secs()
            );
            return Err(ClaudeAgentError::Timeout {
                secs: opts.timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ClaudeAgentError::Exit {
            code: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ─── Command builder ──────────────────────────────────────────────────────

fn build_command(prompt: &str, opts: &PrintOptions) -> Command {
    let mut cmd = Command::new(&opts.executable);
    cmd.args(&opts.args);

    cmd.arg("--print")
        .arg(prompt)
        .arg("--output-format")
        .arg(opts.output_format.as_str());

    if let Some(model) = &opts.model {
        cmd.arg("--model").arg(model);
    }

    if !opts.allowed_tools.is_empty() {
        cmd.arg("--allowed-tools").args(&opts.allowed_tools);
    }

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutputFormat;
    use std::time::Duration;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Options that run `sh -c <script>` in place of the real CLI. The
    /// `--print …` arguments land in `$1…` and are ignored by the script.
    fn shell(script: &str) -> PrintOptions {
        PrintOptions {
            executable: "sh".into(),
            args: vec!["-c".into(), script.into(), "claude".into()],
            timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    #[test]
    fn build_command_default_args() {
        let cmd = build_command("hello", &PrintOptions::default());
        assert_eq!(cmd.as_std().get_program(), "claude");
        assert_eq!(
            args_of(&cmd),
            vec!["--print", "hello", "--output-format", "json"]
        );
    }

    #[test]
    fn build_command_leading_args_model_and_tools() {
        let opts = PrintOptions {
            executable: "npx".into(),
            args: vec!["@anthropic-ai/claude-code".into()],
            model: Some("claude-sonnet-4-6".into()),
            output_format: OutputFormat::Text,
            allowed_tools: vec!["Write".into(), "Read".into()],
            ..Default::default()
        };
        let cmd = build_command("p", &opts);
        assert_eq!(
            args_of(&cmd),
            vec![
                "@anthropic-ai/claude-code",
                "--print",
                "p",
                "--output-format",
                "text",
                "--model",
                "claude-sonnet-4-6",
                "--allowed-tools",
                "Write",
                "Read",
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_print_returns_stdout() {
        let opts = shell(r#"printf '%s' '{"type":"result","result":"hi"}'"#);
        let out = run_print("ignored", &opts).await.unwrap();
        assert_eq!(out, r#"{"type":"result","result":"hi"}"#);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_print_passes_prompt_as_argument() {
        // $1 = --print, $2 = prompt
        let opts = shell(r#"printf '%s' "$2""#);
        let out = run_print("generate an idea", &opts).await.unwrap();
        assert_eq!(out, "generate an idea");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_print_non_zero_exit_captures_stderr() {
        let opts = shell("echo 'auth required' >&2; exit 3");
        let err = run_print("p", &opts).await.unwrap_err();
        match err {
            ClaudeAgentError::Exit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "auth required");
            }
            other => panic!("expected Exit, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_print_times_out() {
        let mut opts = shell("sleep 5");
        opts.timeout = Duration::from_millis(200);
        let err = run_print("p", &opts).await.unwrap_err();
        assert!(matches!(err, ClaudeAgentError::Timeout { .. }));
    }

    #[tokio::test]
    async fn run_print_missing_executable_is_spawn_error() {
        let opts = PrintOptions {
            executable: "definitely-not-a-real-claude-binary".into(),
            ..Default::default()
        };
        let err = run_print("p", &opts).await.unwrap_err();
        assert!(matches!(err, ClaudeAgentError::Spawn { .. }));
        assert!(err.to_string().contains("definitely-not-a-real-claude-binary"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_print_removes_claudecode_and_applies_env() {
        let mut opts = shell(r#"printf '%s|%s' "${CLAUDECODE:-unset}" "$FORGE_PROBE""#);
        opts.env.insert("FORGE_PROBE".into(), "42".into());
        let out = run_print("p", &opts).await.unwrap();
        assert_eq!(out, "unset|42");
    }
}
