// Domain Layer - Pure value types for a single scan invocation

pub mod command;
pub mod error;
pub mod outcome;
pub mod report;
pub mod request;

// Re-exports
pub use command::{CommandSpec, ExecutableLocation};
pub use error::DomainError;
pub use outcome::{ExecutionOutcome, ProcessOutput};
pub use report::{ErrorKind, ScanError, ScanReport, ScanResult};
pub use request::{ScanParams, ScanRequest, ToolConfig};
