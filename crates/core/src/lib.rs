// OnionScan Core - Domain Logic & Ports
// NO process spawning, NO filesystem access: those live behind ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
