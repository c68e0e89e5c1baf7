use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeAgentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", exit_message(.code, .stderr))]
    Exit { code: Option<i32>, stderr: String },

    #[error("Claude Code process timed out after {secs}s")]
    Timeout { secs: u64 },
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    let head = match code {
        Some(code) => format!("Claude Code process exited with code {code}"),
        // Killed by signal (Unix)
        None => "Claude Code process terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        head
    } else {
        format!("{head}\nstderr: {stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_message_includes_stderr_when_present() {
        let err = ClaudeAgentError::Exit {
            code: Some(2),
            stderr: "not logged in".into(),
        };
        assert_eq!(
            err.to_string(),
            "Claude Code process exited with code 2\nstderr: not logged in"
        );
    }

    #[test]
    fn exit_message_for_signal() {
        let err = ClaudeAgentError::Exit {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "Claude Code process terminated by signal");
    }
}
