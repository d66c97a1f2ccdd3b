// Command Construction

use super::request::ScanRequest;
use std::fmt;
use std::path::{Path, PathBuf};

/// Flag asking the tool for a JSON report of the positional target
pub const JSON_REPORT_FLAG: &str = "--jsonReport";
pub const VERBOSE_FLAG: &str = "--verbose";
pub const TOR_PROXY_ADDRESS_FLAG: &str = "--torProxyAddress";

/// Where the executable was found for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableLocation {
    /// Found on the search path; invoked by its bare name
    SearchPath { name: String, resolved: PathBuf },
    /// Not on the search path, but the configured fallback path is executable
    Fallback(PathBuf),
}

impl ExecutableLocation {
    /// Program to hand to the launcher
    pub fn program(&self) -> &Path {
        match self {
            ExecutableLocation::SearchPath { name, .. } => Path::new(name),
            ExecutableLocation::Fallback(path) => path,
        }
    }

    /// Absolute path of the file that will run
    pub fn resolved_path(&self) -> &Path {
        match self {
            ExecutableLocation::SearchPath { resolved, .. } => resolved,
            ExecutableLocation::Fallback(path) => path,
        }
    }
}

impl fmt::Display for ExecutableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutableLocation::SearchPath { name, resolved } => {
                write!(f, "{} (search path: {})", name, resolved.display())
            }
            ExecutableLocation::Fallback(path) => write!(f, "{} (fallback)", path.display()),
        }
    }
}

/// Ordered argument vector for one tool invocation
///
/// Layout: `[program, --jsonReport, target, (--verbose), (--torProxyAddress=<addr>)]`.
/// The tool's parser needs `--jsonReport` and the target before the optional flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpec {
    /// Build the command for `request` against `location`
    pub fn build(location: &ExecutableLocation, request: &ScanRequest) -> Self {
        let mut args = vec![JSON_REPORT_FLAG.to_string(), request.target().to_string()];

        if request.verbose() {
            args.push(VERBOSE_FLAG.to_string());
        }

        if let Some(addr) = request.tor_proxy_address().filter(|a| !a.is_empty()) {
            args.push(format!("{}={}", TOR_PROXY_ADDRESS_FLAG, addr));
        }

        Self {
            program: location.program().to_path_buf(),
            args,
        }
    }

    /// Arbitrary command, used by launcher tests and diagnostics
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argv including the program (lossy for non UTF-8 paths)
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ScanParams;

    fn fallback() -> ExecutableLocation {
        ExecutableLocation::Fallback(PathBuf::from("/opt/deploy/bundled/onionscan"))
    }

    fn request(verbose: bool, proxy: Option<&str>) -> ScanRequest {
        let params = ScanParams {
            verbose,
            tor_proxy_address: proxy.map(str::to_string),
        };
        ScanRequest::new("exampleonion", &params).unwrap()
    }

    #[test]
    fn test_build_verbose_without_proxy() {
        let spec = CommandSpec::build(&fallback(), &request(true, None));

        assert_eq!(
            spec.argv(),
            vec![
                "/opt/deploy/bundled/onionscan",
                "--jsonReport",
                "exampleonion",
                "--verbose"
            ]
        );
    }

    #[test]
    fn test_build_omits_verbose_when_disabled() {
        let spec = CommandSpec::build(&fallback(), &request(false, None));

        assert_eq!(spec.args(), ["--jsonReport", "exampleonion"]);
    }

    #[test]
    fn test_build_empty_proxy_is_omitted() {
        let spec = CommandSpec::build(&fallback(), &request(true, Some("")));

        assert!(!spec
            .args()
            .iter()
            .any(|a| a.starts_with(TOR_PROXY_ADDRESS_FLAG)));
    }

    #[test]
    fn test_build_proxy_appended_last() {
        let spec = CommandSpec::build(&fallback(), &request(true, Some("127.0.0.1:9050")));

        assert_eq!(
            spec.args(),
            [
                "--jsonReport",
                "exampleonion",
                "--verbose",
                "--torProxyAddress=127.0.0.1:9050"
            ]
        );
        let proxy_flags = spec
            .args()
            .iter()
            .filter(|a| a.starts_with(TOR_PROXY_ADDRESS_FLAG))
            .count();
        assert_eq!(proxy_flags, 1);
    }

    #[test]
    fn test_search_path_location_uses_bare_name() {
        let location = ExecutableLocation::SearchPath {
            name: "onionscan".to_string(),
            resolved: PathBuf::from("/usr/local/bin/onionscan"),
        };
        let spec = CommandSpec::build(&location, &request(true, None));

        assert_eq!(spec.program(), Path::new("onionscan"));
        assert_eq!(location.resolved_path(), Path::new("/usr/local/bin/onionscan"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let req = request(true, Some("10.0.0.1:9050"));
        let first = CommandSpec::build(&fallback(), &req);
        let second = CommandSpec::build(&fallback(), &req);

        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}
