// Executable Locator Port (for testability)

use std::path::{Path, PathBuf};

/// Filesystem queries needed to resolve the tool binary
///
/// Implementations must not cache: the binary may be installed or removed between calls.
pub trait ExecutableLocator: Send + Sync {
    /// Look up a bare command name on the search path
    fn find_on_search_path(&self, name: &str) -> Option<PathBuf>;

    /// Check that `path` is an existing, executable file
    fn is_executable(&self, path: &Path) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock ExecutableLocator for testing
    pub struct MockExecutableLocator {
        search_path_hit: Option<PathBuf>,
        executables: Vec<PathBuf>,
        lookup_count: Arc<Mutex<usize>>,
    }

    impl MockExecutableLocator {
        /// Command is on the search path at `resolved`
        pub fn on_search_path(resolved: impl Into<PathBuf>) -> Self {
            let resolved = resolved.into();
            Self {
                search_path_hit: Some(resolved.clone()),
                executables: vec![resolved],
                lookup_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Only the given fallback path is executable
        pub fn fallback_only(path: impl Into<PathBuf>) -> Self {
            Self {
                search_path_hit: None,
                executables: vec![path.into()],
                lookup_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Nothing resolves
        pub fn not_installed() -> Self {
            Self {
                search_path_hit: None,
                executables: Vec::new(),
                lookup_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Number of search-path lookups performed so far
        pub fn lookup_count(&self) -> usize {
            *self.lookup_count.lock().unwrap()
        }
    }

    impl ExecutableLocator for MockExecutableLocator {
        fn find_on_search_path(&self, _name: &str) -> Option<PathBuf> {
            *self.lookup_count.lock().unwrap() += 1;
            self.search_path_hit.clone()
        }

        fn is_executable(&self, path: &Path) -> bool {
            self.executables.iter().any(|p| p == path)
        }
    }
}
