// Process Invoker - runs the external tool once per scan request

mod classify;
mod resolve;

pub use classify::classify;
pub use resolve::resolve_executable;

use crate::application::deadline::DeadlineToken;
use crate::domain::{
    CommandSpec, ExecutableLocation, ExecutionOutcome, ScanError, ScanParams, ScanReport,
    ScanRequest, ScanResult, ToolConfig,
};
use crate::error::Result;
use crate::port::id_provider::UuidProvider;
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{ExecutableLocator, IdProvider, LaunchError, ProcessLauncher, TimeProvider};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Process Invoker
///
/// Holds no per-call state; concurrent `execute` calls each own their child process.
pub struct ProcessInvoker {
    tool: ToolConfig,
    locator: Arc<dyn ExecutableLocator>,
    launcher: Arc<dyn ProcessLauncher>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl ProcessInvoker {
    pub fn new(
        tool: ToolConfig,
        locator: Arc<dyn ExecutableLocator>,
        launcher: Arc<dyn ProcessLauncher>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            tool,
            locator,
            launcher,
            time_provider,
            id_provider,
        }
    }

    /// Invoker with system clock and UUID invocation ids
    pub fn with_defaults(
        tool: ToolConfig,
        locator: Arc<dyn ExecutableLocator>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        Self::new(
            tool,
            locator,
            launcher,
            Arc::new(SystemTimeProvider),
            Arc::new(UuidProvider),
        )
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    /// Resolve the tool binary right now
    pub fn resolve(&self) -> Option<ExecutableLocation> {
        resolve_executable(&self.tool, self.locator.as_ref())
    }

    /// Run one scan
    ///
    /// # Errors
    /// - ScanError::NotInstalled if the binary cannot be resolved (nothing is spawned)
    /// - ScanError::SpawnFailed if the OS cannot start the process or collect its output
    /// - ScanError::TimedOut if `deadline` fires while waiting (the child is killed)
    /// - ScanError::ToolReportedError if the tool wrote anything to stderr
    /// - ScanError::MalformedOutput if stdout is not a JSON document
    pub async fn execute(&self, request: &ScanRequest, deadline: DeadlineToken) -> ScanResult {
        let invocation_id = self.id_provider.generate_id();
        let span = info_span!(
            "onionscan",
            invocation_id = %invocation_id,
            target = %request.target()
        );

        self.execute_internal(request, deadline).instrument(span).await
    }

    /// Run one scan from an analyzer parameter bag
    ///
    /// # Errors
    /// - AppError::Domain if the target or the bag fails validation
    /// - AppError::Scan for any classified scan failure
    pub async fn run_analyzer(
        &self,
        target: &str,
        params: &serde_json::Value,
        deadline: DeadlineToken,
    ) -> Result<ScanReport> {
        let params = ScanParams::from_bag(params)?;
        let request = ScanRequest::new(target, &params)?;
        Ok(self.execute(&request, deadline).await?)
    }

    async fn execute_internal(&self, request: &ScanRequest, deadline: DeadlineToken) -> ScanResult {
        let Some(location) = self.resolve() else {
            error!(
                command = %self.tool.command_name,
                fallback_path = %self.tool.fallback_path.display(),
                "onionscan is not installed"
            );
            return Err(ScanError::NotInstalled {
                command_name: self.tool.command_name.clone(),
                fallback_path: self.tool.fallback_path.clone(),
            });
        };

        let command = CommandSpec::build(&location, request);
        let outcome = self.run(&command, deadline).await;
        let result = classify(outcome);

        if let Err(e) = &result {
            warn!(kind = %e.kind(), error = %e, "onionscan scan failed");
        }

        result
    }

    /// Spawn and wait, racing the deadline
    async fn run(&self, command: &CommandSpec, mut deadline: DeadlineToken) -> ExecutionOutcome {
        let start_time = self.time_provider.now_millis();

        info!(argv = ?command.argv(), "Starting onionscan");

        let mut process = match self.launcher.launch(command).await {
            Ok(process) => process,
            Err(LaunchError::SpawnFailed(cause)) => {
                return ExecutionOutcome::SpawnFailed { cause };
            }
        };

        let waited = tokio::select! {
            biased;
            _ = deadline.expired() => None,
            result = process.wait_with_output() => Some(result),
        };

        let duration_ms = self.time_provider.now_millis() - start_time;

        match waited {
            None => {
                warn!(
                    pid = ?process.id(),
                    duration_ms = %duration_ms,
                    "Deadline reached, killing onionscan"
                );
                if let Err(e) = process.kill().await {
                    warn!(error = %e, "Failed to kill onionscan process");
                }
                ExecutionOutcome::TimedOut
            }
            Some(Ok(output)) => {
                info!(
                    exit_code = ?output.exit_code,
                    duration_ms = %duration_ms,
                    stdout_bytes = output.stdout.len(),
                    stderr_bytes = output.stderr.len(),
                    "onionscan finished"
                );
                ExecutionOutcome::Completed(output)
            }
            Some(Err(e)) => ExecutionOutcome::SpawnFailed {
                cause: format!("failed to collect process output: {}", e),
            },
        }
    }
}
