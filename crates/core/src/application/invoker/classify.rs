// Outcome classification

use crate::domain::{ExecutionOutcome, ProcessOutput, ScanError, ScanReport, ScanResult};
use tracing::info;

/// Turn an execution outcome into the caller-facing result
///
/// Priority: spawn failure, deadline, non-empty stderr, then stdout parsing.
/// Exit status is not interpreted.
pub fn classify(outcome: ExecutionOutcome) -> ScanResult {
    match outcome {
        ExecutionOutcome::SpawnFailed { cause } => Err(ScanError::SpawnFailed { cause }),
        ExecutionOutcome::TimedOut => Err(ScanError::TimedOut),
        ExecutionOutcome::Completed(output) => classify_output(output),
    }
}

fn classify_output(output: ProcessOutput) -> ScanResult {
    // Any stderr content is the tool's failure signal, whatever stdout holds
    if !output.stderr.is_empty() {
        return Err(ScanError::ToolReportedError {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let raw_len = output.stdout.len();
    let stdout = String::from_utf8(output.stdout).map_err(|e| ScanError::MalformedOutput {
        diagnostic: format!("stdout is not valid UTF-8: {}", e),
        raw_len,
    })?;

    let document: serde_json::Value =
        serde_json::from_str(&stdout).map_err(|e| ScanError::MalformedOutput {
            diagnostic: e.to_string(),
            raw_len,
        })?;

    info!(output = %stdout, "onionscan output");

    Ok(ScanReport::new(document))
}
