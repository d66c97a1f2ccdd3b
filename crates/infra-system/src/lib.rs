// OnionScan Infrastructure - System Adapters
// Implements: ProcessLauncher, ExecutableLocator

pub mod search_path_locator;
pub mod subprocess_launcher;

pub use search_path_locator::SearchPathLocator;
pub use subprocess_launcher::{TokioProcessLauncher, TokioRunningProcess};
