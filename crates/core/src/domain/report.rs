// Scan Result - parsed report or one classified error

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Tool output, relayed as an opaque JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanReport(serde_json::Value);

impl ScanReport {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Failure category, one per `ScanError` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotInstalled,
    SpawnFailed,
    TimedOut,
    ToolReportedError,
    MalformedOutput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotInstalled => write!(f, "NotInstalled"),
            ErrorKind::SpawnFailed => write!(f, "SpawnFailed"),
            ErrorKind::TimedOut => write!(f, "TimedOut"),
            ErrorKind::ToolReportedError => write!(f, "ToolReportedError"),
            ErrorKind::MalformedOutput => write!(f, "MalformedOutput"),
        }
    }
}

/// Classified scan failure. Every variant is terminal for the invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("onionscan is not installed! (searched for '{command_name}' and {})", .fallback_path.display())]
    NotInstalled {
        command_name: String,
        fallback_path: PathBuf,
    },

    #[error("error spawning onionscan process: {cause}")]
    SpawnFailed { cause: String },

    #[error("onionscan did not finish before the deadline")]
    TimedOut,

    #[error("onionscan error: {stderr}")]
    ToolReportedError { stderr: String },

    #[error("error reading onionscan output json: {diagnostic} (output was {raw_len} bytes)")]
    MalformedOutput { diagnostic: String, raw_len: usize },
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::NotInstalled { .. } => ErrorKind::NotInstalled,
            ScanError::SpawnFailed { .. } => ErrorKind::SpawnFailed,
            ScanError::TimedOut => ErrorKind::TimedOut,
            ScanError::ToolReportedError { .. } => ErrorKind::ToolReportedError,
            ScanError::MalformedOutput { .. } => ErrorKind::MalformedOutput,
        }
    }
}

/// The only value handed back to the caller
pub type ScanResult = std::result::Result<ScanReport, ScanError>;
