// Executable resolution (runs on every invocation, never cached)

use crate::domain::{ExecutableLocation, ToolConfig};
use crate::port::ExecutableLocator;
use tracing::debug;

/// Resolve the tool binary
///
/// 1. Bare command name on the search path wins.
/// 2. Otherwise the configured fallback path, if executable.
/// 3. Otherwise `None`.
pub fn resolve_executable(
    tool: &ToolConfig,
    locator: &dyn ExecutableLocator,
) -> Option<ExecutableLocation> {
    if let Some(resolved) = locator.find_on_search_path(&tool.command_name) {
        debug!(
            command = %tool.command_name,
            resolved = %resolved.display(),
            "Found tool on search path"
        );
        return Some(ExecutableLocation::SearchPath {
            name: tool.command_name.clone(),
            resolved,
        });
    }

    if locator.is_executable(&tool.fallback_path) {
        debug!(
            fallback_path = %tool.fallback_path.display(),
            "Using fallback tool path"
        );
        return Some(ExecutableLocation::Fallback(tool.fallback_path.clone()));
    }

    None
}
