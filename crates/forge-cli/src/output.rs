use forge_core::GenerationReport;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Human summary of a session that produced nothing.
pub fn print_failures(report: &GenerationReport) {
    if report.stopped_early() {
        eprintln!("stopped after attempt {}: failure is not retryable", report.attempts);
    } else {
        eprintln!("no idea accepted after {} attempt(s)", report.attempts);
    }
    for f in &report.failures {
        eprintln!("  attempt {}: [{}] {}", f.attempt, f.kind, f.message);
    }
}
