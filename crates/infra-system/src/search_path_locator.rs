// Executable locator backed by the real filesystem
// reason: nix access(2) for the executable-permission check on unix
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use onionscan_core::port::ExecutableLocator;

/// Looks commands up on `PATH`, re-reading it on every call
pub struct SearchPathLocator {
    search_path: Option<OsString>,
}

impl SearchPathLocator {
    /// Locator using the process `PATH` at lookup time
    pub fn new() -> Self {
        Self { search_path: None }
    }

    /// Locator using a fixed search path instead of `PATH`
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn current_search_path(&self) -> Option<OsString> {
        self.search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
    }
}

impl Default for SearchPathLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutableLocator for SearchPathLocator {
    fn find_on_search_path(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.current_search_path()?;

        let found = std::env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable_file(candidate));

        debug!(name = %name, found = ?found, "Search path lookup");
        found
    }

    fn is_executable(&self, path: &Path) -> bool {
        is_executable_file(path)
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
