// Port Layer - Interfaces for external dependencies

pub mod executable_locator;
pub mod id_provider; // For deterministic testing
pub mod process_launcher;
pub mod time_provider;

// Re-exports
pub use executable_locator::ExecutableLocator;
pub use id_provider::IdProvider;
pub use process_launcher::{LaunchError, ProcessLauncher, RunningProcess};
pub use time_provider::TimeProvider;
