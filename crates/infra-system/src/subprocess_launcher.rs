// Subprocess launcher implementation
// reason: tokio::process for async child management, cancel-safe waiting
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info};

use onionscan_core::application::constants::KILL_REAP_TIMEOUT;
use onionscan_core::domain::{CommandSpec, ProcessOutput};
use onionscan_core::port::{LaunchError, ProcessLauncher, RunningProcess};

/// Spawns real child processes with piped stdout/stderr
pub struct TokioProcessLauncher {
    env_allowlist: Option<Vec<String>>,
}

impl TokioProcessLauncher {
    /// Launcher whose children inherit the full environment
    pub fn new() -> Self {
        Self {
            env_allowlist: None,
        }
    }

    /// Launcher whose children only see the allowlisted variables
    ///
    /// # Example
    /// ```ignore
    /// let launcher = TokioProcessLauncher::with_env_allowlist(vec![
    ///     "PATH".to_string(),
    ///     "HOME".to_string(),
    /// ]);
    /// ```
    pub fn with_env_allowlist(env_allowlist: Vec<String>) -> Self {
        Self {
            env_allowlist: Some(env_allowlist),
        }
    }

    /// Filter environment variables to allowlist only
    fn filter_env(&self, env: &HashMap<String, String>) -> Option<HashMap<String, String>> {
        self.env_allowlist.as_ref().map(|allowlist| {
            env.iter()
                .filter(|(k, _)| allowlist.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }
}

impl Default for TokioProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessLauncher for TokioProcessLauncher {
    async fn launch(&self, command: &CommandSpec) -> Result<Box<dyn RunningProcess>, LaunchError> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if self.env_allowlist.is_some() {
            // Non UTF-8 variables can never match the allowlist
            let current: HashMap<String, String> = std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect();
            if let Some(filtered_env) = self.filter_env(&current) {
                cmd.env_clear().envs(&filtered_env);
            }
        }

        let child = cmd
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(e.to_string()))?;

        info!(
            pid = ?child.id(),
            program = %command.program().display(),
            "Spawned child process"
        );

        Ok(Box::new(TokioRunningProcess { child }))
    }
}

/// Handle to a tokio child process
pub struct TokioRunningProcess {
    child: Child,
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[async_trait]
impl RunningProcess for TokioRunningProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait_with_output(&mut self) -> io::Result<ProcessOutput> {
        // Drain both pipes while waiting, or a chatty child blocks on a full pipe
        let stdout = self.child.stdout.take();
        let stderr = self.child.stderr.take();

        let (stdout, stderr, status) =
            tokio::try_join!(read_stream(stdout), read_stream(stderr), self.child.wait())?;

        Ok(ProcessOutput {
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }

    async fn kill(&mut self) -> io::Result<()> {
        let pid = self.child.id();
        self.child.start_kill()?;

        match timeout(KILL_REAP_TIMEOUT, self.child.wait()).await {
            Ok(status) => {
                let status = status?;
                debug!(pid = ?pid, status = %status, "Killed child process reaped");
                Ok(())
            }
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("killed process was not reaped within {:?}", KILL_REAP_TIMEOUT),
            )),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let launcher = TokioProcessLauncher::new();

        let mut process = launcher.launch(&sh(r#"printf '{"leaks": []}'"#)).await.unwrap();
        let output = process.wait_with_output().await.unwrap();

        assert_eq!(output.stdout, br#"{"leaks": []}"#);
        assert!(output.stderr.is_empty());
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_captures_stderr_separately() {
        let launcher = TokioProcessLauncher::new();

        let mut process = launcher
            .launch(&sh("printf out; printf err >&2; exit 3"))
            .await
            .unwrap();
        let output = process.wait_with_output().await.unwrap();

        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
        assert_eq!(output.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_large_output_does_not_deadlock() {
        let launcher = TokioProcessLauncher::new();

        let mut process = launcher
            .launch(&sh("head -c 200000 /dev/zero; head -c 200000 /dev/zero >&2"))
            .await
            .unwrap();
        let output = tokio::time::timeout(Duration::from_secs(10), process.wait_with_output())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(output.stdout.len(), 200_000);
        assert_eq!(output.stderr.len(), 200_000);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let launcher = TokioProcessLauncher::new();
        let command = CommandSpec::new("/nonexistent/onionscan", vec![]);

        let result = launcher.launch(&command).await;

        assert!(matches!(result, Err(LaunchError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_kill_stops_running_process() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher.launch(&sh("sleep 30")).await.unwrap();
        assert!(process.id().is_some());

        let started = Instant::now();
        tokio_test::assert_ok!(process.kill().await);

        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_kill_after_cancelled_wait() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher.launch(&sh("sleep 30")).await.unwrap();

        let waited =
            tokio::time::timeout(Duration::from_millis(50), process.wait_with_output()).await;
        assert!(waited.is_err());

        tokio_test::assert_ok!(process.kill().await);
    }

    #[tokio::test]
    async fn test_env_allowlist_applied() {
        std::env::set_var("ONIONSCAN_TEST_BLOCKED", "secret");
        let launcher = TokioProcessLauncher::with_env_allowlist(vec!["PATH".to_string()]);

        let mut process = launcher
            .launch(&sh("printf '%s' \"${ONIONSCAN_TEST_BLOCKED:-unset}\""))
            .await
            .unwrap();
        let output = process.wait_with_output().await.unwrap();

        assert_eq!(output.stdout, b"unset");
    }

    #[test]
    fn test_env_filtering() {
        let launcher = TokioProcessLauncher::with_env_allowlist(vec!["ALLOWED_VAR".to_string()]);

        let mut env = HashMap::new();
        env.insert("ALLOWED_VAR".to_string(), "value1".to_string());
        env.insert("BLOCKED_VAR".to_string(), "value2".to_string());

        let filtered = launcher.filter_env(&env).unwrap();

        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("ALLOWED_VAR"));
        assert!(!filtered.contains_key("BLOCKED_VAR"));

        assert!(TokioProcessLauncher::new().filter_env(&env).is_none());
    }
}
