// Scan Request Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bare command name looked up on the search path
pub const DEFAULT_COMMAND_NAME: &str = "onionscan";

/// Bundled install location used when the command is not on the search path
pub const DEFAULT_FALLBACK_PATH: &str = "/opt/deploy/bundled/onionscan";

fn default_verbose() -> bool {
    true
}

/// Analyzer parameters, deserialized from the caller's key/value bag
///
/// Keys follow the analyzer configuration format (`verbose`, `torProxyAddress`).
/// Unknown keys are ignored so a shared bag can carry other analyzers' settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanParams {
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    #[serde(default)]
    pub tor_proxy_address: Option<String>,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            verbose: default_verbose(),
            tor_proxy_address: None,
        }
    }
}

impl ScanParams {
    /// Build params from an opaque JSON bag
    ///
    /// # Errors
    /// - DomainError::InvalidParams if the bag is not an object or a value has the wrong type
    pub fn from_bag(bag: &serde_json::Value) -> Result<Self> {
        if !bag.is_object() {
            return Err(DomainError::InvalidParams(format!(
                "expected a JSON object, got {}",
                json_type_name(bag)
            )));
        }

        serde_json::from_value(bag.clone()).map_err(|e| DomainError::InvalidParams(e.to_string()))
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// A single scan to run (immutable once constructed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    target: String,
    verbose: bool,
    tor_proxy_address: Option<String>,
}

impl ScanRequest {
    /// Create a validated request
    ///
    /// An empty proxy address is normalized to "unset".
    ///
    /// # Errors
    /// - DomainError::InvalidTarget if the target is empty, contains whitespace or
    ///   control characters, or would be read as a flag by the tool
    pub fn new(target: impl Into<String>, params: &ScanParams) -> Result<Self> {
        let target = target.into();
        validate_target(&target)?;

        let tor_proxy_address = params
            .tor_proxy_address
            .as_ref()
            .filter(|addr| !addr.is_empty())
            .cloned();

        Ok(Self {
            target,
            verbose: params.verbose,
            tor_proxy_address,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Proxy address, `None` when unset or empty
    pub fn tor_proxy_address(&self) -> Option<&str> {
        self.tor_proxy_address.as_deref()
    }
}

fn validate_target(target: &str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(DomainError::InvalidTarget("target cannot be empty".to_string()));
    }

    if target.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DomainError::InvalidTarget(format!(
            "target must not contain whitespace or control characters: {:?}",
            target
        )));
    }

    if target.starts_with('-') {
        return Err(DomainError::InvalidTarget(format!(
            "target must not start with '-': {}",
            target
        )));
    }

    Ok(())
}

/// Where to look for the external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub command_name: String,
    pub fallback_path: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command_name: DEFAULT_COMMAND_NAME.to_string(),
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_PATH),
        }
    }
}

impl ToolConfig {
    /// Create a validated tool config
    ///
    /// # Errors
    /// - DomainError::InvalidToolConfig if the command name is empty or contains a path separator
    pub fn new(command_name: impl Into<String>, fallback_path: impl Into<PathBuf>) -> Result<Self> {
        let command_name = command_name.into();

        if command_name.is_empty() {
            return Err(DomainError::InvalidToolConfig(
                "command name cannot be empty".to_string(),
            ));
        }

        if command_name.contains('/') || command_name.contains('\\') {
            return Err(DomainError::InvalidToolConfig(format!(
                "command name must be a bare name, got path: {}",
                command_name
            )));
        }

        Ok(Self {
            command_name,
            fallback_path: fallback_path.into(),
        })
    }
}
