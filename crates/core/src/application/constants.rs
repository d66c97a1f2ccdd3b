// Invocation constants (No magic values)
use std::time::Duration;

/// Soft time limit applied by the CLI driver when none is configured (60s)
pub const DEFAULT_SOFT_TIME_LIMIT: Duration = Duration::from_secs(60);

/// How long to wait for a killed child to be reaped (5s)
/// From TokioProcessLauncher
pub const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(5);
