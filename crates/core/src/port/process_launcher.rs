// Process Launcher Port
// The only seam through which child processes are created

use crate::domain::{CommandSpec, ProcessOutput};
use async_trait::async_trait;
use thiserror::Error;

/// Launch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),
}

/// Handle to a spawned child process
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if the process is still known to the OS
    fn id(&self) -> Option<u32>;

    /// Wait for exit while capturing stdout and stderr
    ///
    /// Must be cancel safe: when the returned future is dropped the process stays
    /// owned by the handle and can still be killed.
    async fn wait_with_output(&mut self) -> std::io::Result<ProcessOutput>;

    /// Best-effort termination
    async fn kill(&mut self) -> std::io::Result<()>;
}

/// Process Launcher trait
///
/// Implementations:
/// - TokioProcessLauncher (infra-system): spawns a real child process
/// - MockProcessLauncher: canned output, never touches the OS
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Spawn `command` with piped stdout and stderr
    ///
    /// # Errors
    /// - LaunchError::SpawnFailed if the OS refuses to start the process
    async fn launch(&self, command: &CommandSpec) -> Result<Box<dyn RunningProcess>, LaunchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock process behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with the given output
        Complete(ProcessOutput),
        /// Refuse to spawn with message
        SpawnFail(String),
        /// Spawn, then never exit (for deadline testing)
        Hang,
        /// Spawn, then fail while collecting output
        WaitError(String),
    }

    /// Mock Process Launcher for testing
    ///
    /// The default behavior is a successful empty scan: `{}` on stdout, nothing on stderr.
    pub struct MockProcessLauncher {
        behavior: MockBehavior,
        kill_fails: bool,
        launched: Arc<Mutex<Vec<CommandSpec>>>,
        kill_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProcessLauncher {
        fn default() -> Self {
            Self::new(MockBehavior::Complete(ProcessOutput::new("{}", "", Some(0))))
        }
    }

    impl MockProcessLauncher {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                kill_fails: false,
                launched: Arc::new(Mutex::new(Vec::new())),
                kill_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn with_output(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
            Self::new(MockBehavior::Complete(ProcessOutput::new(stdout, stderr, Some(0))))
        }

        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn new_hanging() -> Self {
            Self::new(MockBehavior::Hang)
        }

        /// Make every kill attempt return an error
        pub fn with_failing_kill(mut self) -> Self {
            self.kill_fails = true;
            self
        }

        pub fn launch_count(&self) -> usize {
            self.launched.lock().unwrap().len()
        }

        pub fn launched_commands(&self) -> Vec<CommandSpec> {
            self.launched.lock().unwrap().clone()
        }

        pub fn kill_count(&self) -> usize {
            *self.kill_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProcessLauncher for MockProcessLauncher {
        async fn launch(
            &self,
            command: &CommandSpec,
        ) -> Result<Box<dyn RunningProcess>, LaunchError> {
            self.launched.lock().unwrap().push(command.clone());

            if let MockBehavior::SpawnFail(msg) = &self.behavior {
                return Err(LaunchError::SpawnFailed(msg.clone()));
            }

            Ok(Box::new(MockRunningProcess {
                behavior: self.behavior.clone(),
                kill_fails: self.kill_fails,
                kill_count: Arc::clone(&self.kill_count),
            }))
        }
    }

    /// Process handle handed out by MockProcessLauncher
    pub struct MockRunningProcess {
        behavior: MockBehavior,
        kill_fails: bool,
        kill_count: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl RunningProcess for MockRunningProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        async fn wait_with_output(&mut self) -> std::io::Result<ProcessOutput> {
            match &self.behavior {
                MockBehavior::Complete(output) => Ok(output.clone()),
                MockBehavior::WaitError(msg) => Err(std::io::Error::other(msg.clone())),
                MockBehavior::Hang | MockBehavior::SpawnFail(_) => std::future::pending().await,
            }
        }

        async fn kill(&mut self) -> std::io::Result<()> {
            *self.kill_count.lock().unwrap() += 1;

            if self.kill_fails {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock kill refused",
                ));
            }
            Ok(())
        }
    }
}
