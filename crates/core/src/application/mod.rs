// Application Layer - Use Cases

pub mod constants;
pub mod deadline;
pub mod invoker;

// Re-exports
pub use deadline::{deadline_channel, DeadlineSender, DeadlineToken};
pub use invoker::ProcessInvoker;
